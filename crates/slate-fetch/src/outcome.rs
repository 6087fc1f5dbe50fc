//! Classification of a single fetch attempt.

use serde_json::Value;

use crate::error::FetchError;
use crate::sanitize::parse_document;

/// Result of exactly one raw attempt against one URL.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// Parsed document plus the `Last-Modified` header, if any.
    Success {
        data: Value,
        last_modified: Option<String>,
    },
    /// The document legitimately does not exist at this URL.
    NotFound,
    /// Non-404 error status, transport failure, or unparsable body.
    TransientError(FetchError),
}

impl FetchOutcome {
    /// Classify an HTTP status before the body is read.
    ///
    /// Returns `None` for success statuses, meaning the body should be parsed.
    pub fn from_status(status: u16) -> Option<Self> {
        match status {
            404 => Some(FetchOutcome::NotFound),
            200..=299 => None,
            other => Some(FetchOutcome::TransientError(FetchError::Status(other))),
        }
    }

    /// Build the outcome of a success response from its body.
    pub fn from_body(body: &str, last_modified: Option<String>) -> Self {
        match parse_document(body) {
            Ok(data) => FetchOutcome::Success {
                data,
                last_modified,
            },
            Err(err) => FetchOutcome::TransientError(err),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Success { .. })
    }

    /// Human-readable failure message; `None` for a success.
    pub fn failure_message(&self) -> Option<String> {
        match self {
            FetchOutcome::Success { .. } => None,
            FetchOutcome::NotFound => Some(FetchError::Status(404).to_string()),
            FetchOutcome::TransientError(err) => Some(err.to_string()),
        }
    }
}
