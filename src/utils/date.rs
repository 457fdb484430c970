// Timestamp formatting for API date strings.
// The API mixes RFC 3339, naive ISO-8601, and plain dates.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local).naive_local());
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

/// Format a timestamp as `YYYY-MM-DD HH:MM` in local time.
/// Date-only values stay as they are; unparseable values pass through.
pub fn format_timestamp(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return "-".to_string();
    }
    if let Some(dt) = parse_datetime(raw) {
        return dt.format("%Y-%m-%d %H:%M").to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format("%Y-%m-%d").to_string();
    }
    raw.to_string()
}

/// Format only the date part, e.g. `2026-10-18`
pub fn format_date(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return "-".to_string();
    }
    if let Some(dt) = parse_datetime(raw) {
        return dt.format("%Y-%m-%d").to_string();
    }
    raw.to_string()
}

/// Format an optional timestamp, `-` when absent
pub fn format_opt(raw: Option<&str>) -> String {
    raw.map(format_timestamp).unwrap_or_else(|| "-".to_string())
}
