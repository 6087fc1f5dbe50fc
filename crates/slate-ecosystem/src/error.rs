//! Error types for slate-ecosystem
//!
//! Loading never fails with an error: every fetch failure is data in the
//! returned bundle. These errors cover setting a loader up.

use slate_fetch::FetchError;
use thiserror::Error;

/// Errors that can occur while configuring an [`crate::EcosystemLoader`].
#[derive(Error, Debug)]
pub enum LoaderError {
    /// Base origin is empty, unparsable, or not http(s)
    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// HTTP transport could not be set up
    #[error("transport setup failed: {0}")]
    Transport(#[from] FetchError),
}

/// Result type for loader setup.
pub type LoaderResult<T> = std::result::Result<T, LoaderError>;
