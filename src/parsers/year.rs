use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::error::{IndexError, Result};

/// Placeholder the tool uses for unknown year digits
const YEAR_PLACEHOLDER: char = '?';

/// Replace placeholder digits with `0` ("198?" -> "1980", "????" -> "0000")
pub fn normalize_year(raw: &str) -> String {
    raw.replace(YEAR_PLACEHOLDER, "0")
}

/// Timestamp for a raw year: January 1st, midnight UTC.
///
/// Fails if the normalized year is not an integer or is outside the calendar range.
pub fn year_timestamp(machine: &str, raw: &str) -> Result<DateTime<Utc>> {
    let invalid = || IndexError::YearParse { machine: machine.to_string(), raw: raw.to_string() };

    let year: i32 = normalize_year(raw).parse().map_err(|_| invalid())?;
    let midnight = NaiveDate::from_ymd_opt(year, 1, 1).and_then(|d| d.and_hms_opt(0, 0, 0));
    midnight.map(|dt| Utc.from_utc_datetime(&dt)).ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_year() {
        assert_eq!(normalize_year("1980"), "1980");
        assert_eq!(normalize_year("198?"), "1980");
        assert_eq!(normalize_year("19??"), "1900");
        assert_eq!(normalize_year("????"), "0000");
    }

    #[test]
    fn test_plain_year() {
        let ts = year_timestamp("pacman", "1980").unwrap();
        assert_eq!(ts.to_rfc3339(), "1980-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_partial_placeholder() {
        let ts = year_timestamp("pacman", "198?").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(1980, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_unknown_year_is_year_zero() {
        let ts = year_timestamp("mystery", "????").unwrap();
        assert_eq!(ts.format("%Y-%m-%dT%H:%M:%SZ").to_string(), "0000-01-01T00:00:00Z");
    }

    #[test]
    fn test_non_numeric_year() {
        let err = year_timestamp("broken", "19x0").unwrap_err();
        match err {
            IndexError::YearParse { machine, raw } => {
                assert_eq!(machine, "broken");
                assert_eq!(raw, "19x0");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_year() {
        assert!(year_timestamp("noyear", "").is_err());
    }

    #[test]
    fn test_year_out_of_range() {
        assert!(year_timestamp("far", "999999999").is_err());
    }
}
