//! Lenient datetime parsing for extracted date strings.
//!
//! Sites publish dates in a handful of ISO-8601-ish shapes; extraction
//! should tolerate all of them without ever failing the document. Returns
//! `None` for anything unrecognized.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Zoned patterns tried after RFC 3339.
const ZONED_PATTERNS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%dT%H:%M:%S%z"];

/// Naive patterns, interpreted as UTC.
const NAIVE_PATTERNS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S"];

/// Parse a date string into a UTC timestamp, if it matches a known shape.
#[must_use]
pub fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    for pattern in ZONED_PATTERNS {
        if let Ok(parsed) = DateTime::parse_from_str(value, pattern) {
            return Some(parsed.with_timezone(&Utc));
        }
    }
    for pattern in NAIVE_PATTERNS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, pattern) {
            return Some(parsed.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    None
}
