//! Timestamp parsing and formatting.
//!
//! User-supplied timestamps are accepted in a small set of explicit formats
//! and always interpreted as UTC. Date-only inputs resolve to midnight.
//! Package XML uses the W3CDTF profile (`2025-01-01T10:00:00Z`), which is
//! what word processors emit for `w:date` and `dcterms` values.

use crate::common::error::{Error, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike, Utc};

/// Accepted date-and-time input formats, tried in order.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

/// Accepted date-only input formats, tried after [`DATETIME_FORMATS`].
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Parse a user-supplied timestamp string as UTC.
///
/// Returns [`Error::Timestamp`] when the input matches no accepted format.
pub fn parse_timestamp(input: &str) -> Result<DateTime<Utc>> {
    let trimmed = input.trim();
    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(naive.and_utc());
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            // midnight for date-only inputs
            return Ok(date.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc());
        }
    }
    Err(Error::Timestamp(input.to_string()))
}

/// Format a timestamp in the W3CDTF profile used inside package XML.
pub fn format_w3cdtf(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Human-readable rendering for CLI output.
pub fn format_display(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Current time truncated to whole seconds.
///
/// Fabricated timelines carry second precision only, matching what package
/// XML can represent, so sub-second noise is dropped at the source.
pub fn now_seconds() -> DateTime<Utc> {
    let now = Utc::now();
    now.with_nanosecond(0).unwrap_or(now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_full_datetime() {
        let ts = parse_timestamp("2025-01-15 14:30:00").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2025, 1, 15, 14, 30, 0).unwrap());
    }

    #[test]
    fn test_parse_iso_t_separator() {
        let ts = parse_timestamp("2025-01-15T14:30:00").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2025, 1, 15, 14, 30, 0).unwrap());
    }

    #[test]
    fn test_parse_without_seconds() {
        let ts = parse_timestamp("2025-01-15 14:30").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2025, 1, 15, 14, 30, 0).unwrap());
    }

    #[test]
    fn test_parse_date_only_is_midnight() {
        let ts = parse_timestamp("2025-01-15").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_slash_separated() {
        let ts = parse_timestamp("2025/01/15 14:30:00").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2025, 1, 15, 14, 30, 0).unwrap());
        let date = parse_timestamp("2025/01/15").unwrap();
        assert_eq!(date, Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_garbage_is_rejected() {
        let err = parse_timestamp("not a date").unwrap_err();
        assert!(matches!(err, Error::Timestamp(_)));
    }

    #[test]
    fn test_w3cdtf_format() {
        let ts = Utc.with_ymd_and_hms(2025, 1, 15, 14, 30, 0).unwrap();
        assert_eq!(format_w3cdtf(&ts), "2025-01-15T14:30:00Z");
    }

    #[test]
    fn test_now_has_no_subsecond_part() {
        assert_eq!(now_seconds().nanosecond(), 0);
    }
}
