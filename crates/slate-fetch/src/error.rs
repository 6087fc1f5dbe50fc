//! Error types for slate-fetch

use thiserror::Error;

/// Message used when a transport failure carries no text of its own.
pub const GENERIC_TRANSPORT_MESSAGE: &str = "network request failed";

/// Reasons a single document fetch did not produce usable JSON.
///
/// Every variant is transient from the loader's point of view: optional
/// resources keep walking back through dates, the required resource fails.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// DNS, TLS, connect, timeout or body-read failure
    #[error("{0}")]
    Transport(String),

    /// Non-success status other than 404
    #[error("HTTP {0}")]
    Status(u16),

    /// Body was not valid JSON even after sanitization
    #[error("invalid JSON: {0}")]
    Parse(String),

    /// The HTTP client could not be constructed
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(String),
}

impl FetchError {
    /// Build a transport error, substituting a generic message for empty text.
    pub fn transport(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            FetchError::Transport(GENERIC_TRANSPORT_MESSAGE.to_string())
        } else {
            FetchError::Transport(message)
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::transport(err.to_string())
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Parse(err.to_string())
    }
}
