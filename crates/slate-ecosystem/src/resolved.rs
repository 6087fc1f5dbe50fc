//! Final state of one resource after resolution.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A fully resolved resource.
///
/// `source_url` is always set, including on failure, so callers can show
/// the last URL that was tried.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedResource {
    /// Parsed document, or `None` when absent or failed
    pub data: Option<Value>,
    /// Date the data is from; `None` only when resolution was skipped
    pub as_of_date: Option<String>,
    pub source_url: String,
    pub last_modified: Option<String>,
    /// Set when the resource ended up absent because of a failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ResolvedResource {
    /// Document found at `as_of_date`.
    pub fn found(
        data: Value,
        as_of_date: &str,
        source_url: String,
        last_modified: Option<String>,
    ) -> Self {
        Self {
            data: Some(data),
            as_of_date: Some(as_of_date.to_string()),
            source_url,
            last_modified,
            error: None,
        }
    }

    /// Nothing usable; anchored at the original target date.
    pub fn failed(target_date: &str, source_url: String, error: impl Into<String>) -> Self {
        Self {
            data: None,
            as_of_date: Some(target_date.to_string()),
            source_url,
            last_modified: None,
            error: Some(error.into()),
        }
    }

    /// Not attempted at all.
    pub fn skipped(source_url: String) -> Self {
        Self {
            data: None,
            as_of_date: None,
            source_url,
            last_modified: None,
            error: None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.data.is_some()
    }
}
