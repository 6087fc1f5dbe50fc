//! Key-tolerant lookups over loosely shaped documents.
//!
//! Enrichment producers disagree on spelling: `depth_chart`, `depthChart`
//! and `Depth Chart` all name the same field. Consumers read through these
//! helpers instead of binding to one schema. Keys are compared after
//! lowercasing and dropping every non-alphanumeric character; an exact match
//! always wins over a normalized one.
//!
//! The loader never calls into this module; it is for consumers of
//! [`crate::EcosystemBundle`] data.

use serde_json::{Map, Value};

/// Lowercase `key` and keep only ASCII letters and digits.
pub fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Look up `key` in an object, exact match first, then normalized.
pub fn lookup_normalized<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    let object = value.as_object()?;
    if let Some(found) = object.get(key) {
        return Some(found);
    }
    find_normalized(object, &normalize_key(key))
}

/// Try each candidate spelling in order; first hit wins.
pub fn lookup_any<'a>(value: &'a Value, candidates: &[&str]) -> Option<&'a Value> {
    candidates
        .iter()
        .find_map(|candidate| lookup_normalized(value, candidate))
}

/// Walk nested objects, one list of alternative spellings per level.
///
/// ```
/// use serde_json::json;
/// use slate_ecosystem::lookup::lookup_path;
///
/// let doc = json!({"Teams": {"DEN": {"depth_chart": {"PG": ["Murray"]}}}});
/// let pg = lookup_path(&doc, &[&["teams"], &["DEN"], &["depthChart", "depth"], &["pg"]]);
/// assert_eq!(pg, Some(&json!(["Murray"])));
/// ```
pub fn lookup_path<'a>(value: &'a Value, path: &[&[&str]]) -> Option<&'a Value> {
    path.iter()
        .try_fold(value, |current, candidates| lookup_any(current, candidates))
}

/// String value under any of `candidates`, trimmed; numbers are rendered.
pub fn lookup_str(value: &Value, candidates: &[&str]) -> Option<String> {
    match lookup_any(value, candidates)? {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn find_normalized<'a>(object: &'a Map<String, Value>, normalized: &str) -> Option<&'a Value> {
    if normalized.is_empty() {
        return None;
    }
    object
        .iter()
        .find(|(k, _)| normalize_key(k) == normalized)
        .map(|(_, v)| v)
}
