//! Timestamp normalization.
//!
//! Every supported log format carries its timestamps as `YYYY-MM-DD HH:MM:SS`
//! text. Parsing never substitutes a fallback instant: a malformed timestamp
//! is reported as [`SiftError::InvalidTimestamp`] and the calling parser
//! skips the record.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::error::{Result, SiftError};

/// The `strftime` layout shared by every log format.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parses a `YYYY-MM-DD HH:MM:SS` timestamp, interpreted as UTC.
///
/// Surrounding whitespace is ignored; anything else outside the layout is
/// rejected.
///
/// # Errors
///
/// Returns [`SiftError::InvalidTimestamp`] if the text does not match.
pub fn parse_timestamp(text: &str) -> Result<DateTime<Utc>> {
    let trimmed = text.trim();
    NaiveDateTime::parse_from_str(trimmed, TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| SiftError::InvalidTimestamp(trimmed.to_string()))
}

/// Renders a timestamp back into the shared layout.
#[must_use]
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone, Timelike};
    use test_case::test_case;

    #[test]
    fn parses_canonical_layout() {
        let ts = parse_timestamp("2024-01-01 10:05:30").expect("valid timestamp");
        assert_eq!(ts.year(), 2024);
        assert_eq!(ts.month(), 1);
        assert_eq!(ts.day(), 1);
        assert_eq!(ts.hour(), 10);
        assert_eq!(ts.minute(), 5);
        assert_eq!(ts.second(), 30);
    }

    #[test]
    fn parse_is_utc() {
        let ts = parse_timestamp("2024-03-10 00:00:00").expect("valid timestamp");
        let expected = Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).single();
        assert_eq!(Some(ts), expected);
    }

    #[test]
    fn tolerates_surrounding_whitespace() {
        assert!(parse_timestamp("  2024-01-01 10:00:00\t").is_ok());
    }

    #[test_case("" ; "empty")]
    #[test_case("not a date" ; "garbage")]
    #[test_case("2024-01-01" ; "date only")]
    #[test_case("2024-01-01T10:00:00" ; "iso separator")]
    #[test_case("2024-13-01 10:00:00" ; "month out of range")]
    #[test_case("2024-02-30 10:00:00" ; "day out of range")]
    #[test_case("2024-01-01 25:00:00" ; "hour out of range")]
    #[test_case("2024-01-01 10:00:00 extra" ; "trailing text")]
    fn rejects_malformed(input: &str) {
        let err = parse_timestamp(input);
        assert!(matches!(err, Err(SiftError::InvalidTimestamp(_))));
    }

    #[test]
    fn format_inverts_parse() {
        let text = "2023-12-31 23:59:59";
        let ts = parse_timestamp(text).expect("valid timestamp");
        assert_eq!(format_timestamp(ts), text);
    }
}
