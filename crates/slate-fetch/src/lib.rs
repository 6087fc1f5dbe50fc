//! Slate-Fetch: document transport for the slate ecosystem loader
//!
//! This crate performs single fetch attempts against date-keyed JSON
//! documents and classifies each attempt into a [`FetchOutcome`].
//!
//! ## Layer 0 - Transport
//!
//! Focus: one request, one honest classification. No retries, no date
//! walking, no caching; those belong to the loader built on top.
//!
//! ## Key Components
//!
//! - `DocumentFetcher`: async seam the loader is written against
//! - `HttpFetcher`: reqwest implementation with caching disabled
//! - `sanitize`: `NaN` / `Infinity` token scrubbing ahead of JSON parsing
//! - `fakes::ScriptedFetcher`: in-memory implementation for tests

mod error;
pub mod fakes;
mod fetcher;
mod outcome;
pub mod sanitize;

pub use error::{FetchError, GENERIC_TRANSPORT_MESSAGE};
pub use fetcher::{DocumentFetcher, HttpFetcher, DEFAULT_REQUEST_TIMEOUT, DEFAULT_USER_AGENT};
pub use outcome::FetchOutcome;
pub use sanitize::{parse_document, sanitize_json_text};
