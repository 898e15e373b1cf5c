//! Value Coercion Module
//! Total per-value conversions used by the loader. Every function maps any
//! input to either a typed value or `None`; none of them fail.

use chrono::{Datelike, NaiveDate, NaiveDateTime};

const DATETIME_FORMATS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

// Month-first before day-first for ambiguous slash dates
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d/%m/%Y"];

// `%Y` also matches one and two digit years
const MIN_YEAR: i32 = 1000;

/// Trim a raw value; blank values become `None`.
pub fn trim_to_option(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// Parse a date or date-time. Month-year values such as `6/2002` map to the
/// first day of that month.
pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let value = trim_to_option(raw)?;
    let plausible = |dt: &NaiveDateTime| dt.year() >= MIN_YEAR;

    let datetimes = DATETIME_FORMATS
        .iter()
        .filter_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok());
    let dates = DATE_FORMATS
        .iter()
        .filter_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .filter_map(|d| d.and_hms_opt(0, 0, 0));
    if let Some(dt) = datetimes.chain(dates).find(plausible) {
        return Some(dt);
    }

    if value.split('/').count() == 2 {
        return NaiveDate::parse_from_str(&format!("1/{}", value), "%d/%m/%Y")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .filter(plausible);
    }

    None
}

/// Milliseconds since the epoch, the unit the loader stores dates in.
pub fn parse_datetime_millis(raw: &str) -> Option<i64> {
    parse_datetime(raw).map(|dt| dt.and_utc().timestamp_millis())
}

/// Parse a finite number.
pub fn parse_number(raw: &str) -> Option<f64> {
    let value = trim_to_option(raw)?;
    value.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Upper-case the first letter of each word, lower-case the rest.
pub fn title_case(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut at_word_start = true;
    for c in raw.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

/// `Yes`/`No` flag in any casing.
pub fn parse_yes_no(raw: &str) -> Option<bool> {
    let value = trim_to_option(raw)?;
    match title_case(value).as_str() {
        "Yes" => Some(true),
        "No" => Some(false),
        _ => None,
    }
}

/// Native boolean column. Recognized tokens only; everything else is `None`.
pub fn parse_bool(raw: &str) -> Option<bool> {
    let value = trim_to_option(raw)?;
    match value.to_ascii_lowercase().as_str() {
        "true" | "t" | "yes" | "y" | "1" => Some(true),
        "false" | "f" | "no" | "n" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_datetime_layouts() {
        let dt = parse_datetime("2015-03-01 00:00:00").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2015, 3, 1));

        let dt = parse_datetime(" 2014-11-20T13:45:00 ").unwrap();
        assert_eq!((dt.hour(), dt.minute()), (13, 45));

        let dt = parse_datetime("2010/07/15").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2010, 7, 15));

        // month-first wins when ambiguous
        let dt = parse_datetime("02/03/2012").unwrap();
        assert_eq!((dt.month(), dt.day()), (2, 3));

        let dt = parse_datetime("25/03/2012").unwrap();
        assert_eq!((dt.month(), dt.day()), (3, 25));
    }

    #[test]
    fn test_parse_month_year() {
        let dt = parse_datetime("6/2002").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2002, 6, 1));
    }

    #[test]
    fn test_parse_datetime_failures() {
        assert!(parse_datetime("").is_none());
        assert!(parse_datetime("not a date").is_none());
        assert!(parse_datetime("2015-13-01").is_none());
        assert!(parse_datetime("13/2002").is_none());
        // two digit years are not read as the first century
        assert!(parse_datetime("12/03/04").is_none());
        assert!(parse_datetime("04-03-12").is_none());
        assert!(parse_datetime("6/02").is_none());
    }

    #[test]
    fn test_parse_datetime_millis() {
        assert_eq!(parse_datetime_millis("1970-01-02"), Some(86_400_000));
        assert_eq!(parse_datetime_millis("garbage"), None);
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number(" 21.93 "), Some(21.93));
        assert_eq!(parse_number("2004"), Some(2004.0));
        assert_eq!(parse_number("-5"), Some(-5.0));
        assert_eq!(parse_number("1,000"), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("   "), None);
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("yes"), "Yes");
        assert_eq!(title_case("nO"), "No");
        assert_eq!(title_case("written off"), "Written Off");
    }

    #[test]
    fn test_parse_yes_no() {
        assert_eq!(parse_yes_no("yes"), Some(true));
        assert_eq!(parse_yes_no(" No "), Some(false));
        assert_eq!(parse_yes_no("YES"), Some(true));
        assert_eq!(parse_yes_no("maybe"), None);
        assert_eq!(parse_yes_no(""), None);
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("True"), Some(true));
        assert_eq!(parse_bool("FALSE"), Some(false));
        assert_eq!(parse_bool("1"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("unknown"), None);
        assert_eq!(parse_bool(""), None);
    }
}
