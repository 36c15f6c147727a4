//! Normalization of textual dates into canonical calendar dates.
//!
//! Clients submit dates in a handful of common formats; everything is
//! normalized to a `NaiveDate` before validation and storage.

use chrono::{DateTime, NaiveDate};
use thiserror::Error;

/// Error returned for unparseable date text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid date: {0}")]
pub struct DateParseError(pub String);

/// Accepted textual formats, tried in order.
const FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%d-%m-%Y", "%B %d, %Y"];

/// Parses a textual date into a calendar date.
///
/// Accepts RFC 3339 timestamps (the date part is kept) and the formats in
/// [`FORMATS`]. Whitespace is trimmed first.
///
/// # Errors
///
/// Returns `DateParseError` when no format matches.
pub fn parse_date(input: &str) -> Result<NaiveDate, DateParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(DateParseError(input.to_string()));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.date_naive());
    }

    for format in FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Ok(date);
        }
    }

    Err(DateParseError(input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("2024-03-13", 2024, 3, 13)]
    #[case("13/03/2024", 2024, 3, 13)]
    #[case("03/13/2024", 2024, 3, 13)]
    #[case("13-03-2024", 2024, 3, 13)]
    #[case("March 13, 2024", 2024, 3, 13)]
    #[case("  2024-03-13  ", 2024, 3, 13)]
    #[case("2024-03-13T08:30:00Z", 2024, 3, 13)]
    fn test_accepted_formats(
        #[case] input: &str,
        #[case] year: i32,
        #[case] month: u32,
        #[case] day: u32,
    ) {
        let expected = NaiveDate::from_ymd_opt(year, month, day).unwrap();
        assert_eq!(parse_date(input).unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("not a date")]
    #[case("2024-13-40")]
    #[case("32/03/2024")]
    fn test_rejected_inputs(#[case] input: &str) {
        assert!(parse_date(input).is_err());
    }

    #[test]
    fn test_ambiguous_day_first_wins() {
        // 05/04/2024 parses day-first, matching the original API's behavior.
        let date = parse_date("05/04/2024").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 4, 5).unwrap());
    }
}
