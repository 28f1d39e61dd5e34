//! Timestamp parsing for the formats FMI emits: `timeformat=sql`
//! (`2025-06-18 09:00:00`), ISO-8601 with `Z` or an offset, the compact
//! `20250618T090000` form some forecast producers use, and bare dates.
//!
//! Timestamps without an offset are taken to be UTC.

use crate::parsing::error::ParseError;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

fn is_compact(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    bytes.len() == 15
        && bytes[8] == b'T'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 8 || b.is_ascii_digit())
}

/// Rewrites a raw timestamp into a form accepted by the ISO parsers.
///
/// `YYYYMMDDTHHMMSS` becomes `YYYY-MM-DDTHH:MM:SS` and a trailing `Z` becomes
/// `+00:00`. Anything else is returned trimmed but otherwise unchanged.
///
/// # Examples
///
/// ```
/// use fmi_timeseries::normalize_timestamp;
///
/// assert_eq!(normalize_timestamp("20250618T090000"), "2025-06-18T09:00:00");
/// assert_eq!(normalize_timestamp("20250618T090000Z"), "2025-06-18T09:00:00+00:00");
/// assert_eq!(normalize_timestamp("2025-06-18T09:00:00Z"), "2025-06-18T09:00:00+00:00");
/// ```
pub fn normalize_timestamp(raw: &str) -> String {
    let trimmed = raw.trim();
    let (body, utc) = match trimmed.strip_suffix(['Z', 'z']) {
        Some(body) => (body, true),
        None => (trimmed, false),
    };

    let mut normalized = if is_compact(body) {
        format!(
            "{}-{}-{}T{}:{}:{}",
            &body[0..4],
            &body[4..6],
            &body[6..8],
            &body[9..11],
            &body[11..13],
            &body[13..15]
        )
    } else {
        body.to_string()
    };
    if utc {
        normalized.push_str("+00:00");
    }
    normalized
}

/// Parses a timestamp, keeping its UTC offset. Naive timestamps get offset zero.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<FixedOffset>, ParseError> {
    let normalized = normalize_timestamp(raw);

    if let Ok(dt) = DateTime::parse_from_rfc3339(&normalized) {
        return Ok(dt);
    }
    if let Some(naive) = NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(&normalized, format).ok())
    {
        return Ok(naive.and_utc().fixed_offset());
    }
    if let Ok(date) = NaiveDate::parse_from_str(&normalized, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc().fixed_offset());
        }
    }
    Err(ParseError::MalformedTimestamp(raw.to_string()))
}

/// Parses a timestamp and converts it to naive UTC, the representation used in
/// the `timestamp` column of grid tables.
pub fn parse_utc_naive(raw: &str) -> Result<NaiveDateTime, ParseError> {
    parse_timestamp(raw).map(|dt| dt.naive_utc())
}
