//! JSON sanitization for upstream producers that emit non-finite floats.
//!
//! Some producers serialize `NaN`, `Infinity` and `-Infinity` as bare tokens,
//! which no strict JSON parser accepts. Every standalone occurrence is
//! rewritten to `null` before parsing. Matching is word-bounded, so longer
//! identifiers such as `NaNoseconds` or `InfinityWar` are left alone.

use std::borrow::Cow;
use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use crate::error::FetchError;

fn non_finite_tokens() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"-?\bInfinity\b|\bNaN\b").expect("non-finite token pattern is valid")
    })
}

/// Replace bare `NaN` / `Infinity` / `-Infinity` tokens with `null`.
///
/// Returns the input borrowed when nothing needed replacing.
pub fn sanitize_json_text(raw: &str) -> Cow<'_, str> {
    non_finite_tokens().replace_all(raw, "null")
}

/// Sanitize and parse a document body.
pub fn parse_document(raw: &str) -> Result<Value, FetchError> {
    let cleaned = sanitize_json_text(raw);
    Ok(serde_json::from_str(&cleaned)?)
}
