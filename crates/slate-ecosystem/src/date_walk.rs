//! Calendar stepping over `YYYY-MM-DD` strings.
//!
//! Dates are plain calendar days anchored to UTC; there is no local time
//! zone involved, so daylight-saving transitions can never skip or repeat a
//! day. Month lengths, leap years and year boundaries come from `chrono`.

use chrono::{Days, NaiveDate};

/// Return the date `days_back` calendar days before `date`.
///
/// Malformed input is not an error here: anything that does not parse as
/// three numeric components naming a real day is returned unchanged.
/// Negative `days_back` is treated as zero.
///
/// ```
/// use slate_ecosystem::previous_date;
///
/// assert_eq!(previous_date("2024-03-01", 1), "2024-02-29");
/// assert_eq!(previous_date("2024-01-01", 1), "2023-12-31");
/// assert_eq!(previous_date("not-a-date", 3), "not-a-date");
/// ```
pub fn previous_date(date: &str, days_back: i64) -> String {
    let Some(start) = parse_date(date) else {
        return date.to_string();
    };

    let days = u64::try_from(days_back).unwrap_or(0);
    match start.checked_sub_days(Days::new(days)) {
        Some(earlier) => format_date(earlier),
        None => date.to_string(),
    }
}

/// Parse `YYYY-MM-DD` (components need not be zero-padded).
pub fn parse_date(date: &str) -> Option<NaiveDate> {
    let mut parts = date.trim().split('-');
    let year = numeric_component(parts.next()?)?;
    let month = numeric_component(parts.next()?)?;
    let day = numeric_component(parts.next()?)?;
    if parts.next().is_some() {
        return None;
    }

    NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, month, day)
}

/// Zero-padded `YYYY-MM-DD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn numeric_component(part: &str) -> Option<u32> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}
