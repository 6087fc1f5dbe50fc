//! `Last-Modified` parsing and the overall freshness rollup.

use chrono::{DateTime, Utc};

/// Parse a `Last-Modified` value.
///
/// Accepts the HTTP-date form (`Tue, 15 Oct 2024 18:04:11 GMT`) and, for
/// producers that emit it, RFC 3339. Anything else yields `None`.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Latest of the values that parse; `None` when none do.
///
/// Missing or unparsable values are skipped, never read as the epoch.
pub fn latest_timestamp<'a, I>(values: I) -> Option<DateTime<Utc>>
where
    I: IntoIterator<Item = &'a str>,
{
    values.into_iter().filter_map(parse_timestamp).max()
}
