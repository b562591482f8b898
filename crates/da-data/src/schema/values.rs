//! Lenient parsing of cell text into numbers and timestamps

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Parse a number after stripping every character except digits, `.` and `-`.
///
/// Reads the longest numeric prefix of what remains, so `"$1,234.50"` gives
/// `1234.5` and `"12-34"` gives `12`. Returns `None` when no digits are left.
pub fn parse_numeric(value: &str) -> Option<f64> {
    let cleaned: String = value
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    parse_number_prefix(&cleaned)
}

fn parse_number_prefix(text: &str) -> Option<f64> {
    let bytes = text.as_bytes();
    let mut end = 0;
    if bytes.first() == Some(&b'-') {
        end = 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }

    if digits == 0 {
        return None;
    }
    text[..end].parse::<f64>().ok().filter(|n| n.is_finite())
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%m/%d/%y",
    "%m-%d-%Y",
    "%d %B %Y",
    "%d %b %Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
    "%a, %d %b %Y",
];

/// Parse a calendar date or date-time in one of the common textual layouts.
///
/// Offsets (RFC 3339 / RFC 2822) are normalised to UTC. Bare numbers are
/// never read as dates.
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
        return Some(dt.naive_utc());
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }
    // Year and month only, e.g. "2021-06"
    NaiveDate::parse_from_str(&format!("{value}-01"), "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_numeric_strips_decorations() {
        assert_eq!(parse_numeric("42"), Some(42.0));
        assert_eq!(parse_numeric("$1,234.50"), Some(1234.5));
        assert_eq!(parse_numeric("-3.5 kg"), Some(-3.5));
        assert_eq!(parse_numeric("45%"), Some(45.0));
        assert_eq!(parse_numeric(".5"), Some(0.5));
        assert_eq!(parse_numeric("7."), Some(7.0));
    }

    #[test]
    fn test_parse_numeric_prefix_rules() {
        assert_eq!(parse_numeric("12-34"), Some(12.0));
        assert_eq!(parse_numeric("1.2.3"), Some(1.2));
        assert_eq!(parse_numeric("--5"), None);
        assert_eq!(parse_numeric("-"), None);
        assert_eq!(parse_numeric("."), None);
        assert_eq!(parse_numeric("n/a"), None);
        assert_eq!(parse_numeric("abc"), None);
    }

    #[test]
    fn test_parse_datetime_layouts() {
        let expected = NaiveDate::from_ymd_opt(2020, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0));
        assert_eq!(parse_datetime("2020-01-01"), expected);
        assert_eq!(parse_datetime("2020/01/01"), expected);
        assert_eq!(parse_datetime("01/01/2020"), expected);
        assert_eq!(parse_datetime("January 1, 2020"), expected);
        assert_eq!(parse_datetime("1 Jan 2020"), expected);
        assert_eq!(parse_datetime("2020-01"), expected);

        assert!(parse_datetime("2021-06-15 13:45:00").is_some());
        assert!(parse_datetime("2021-06-15T13:45:00Z").is_some());
        assert!(parse_datetime("Tue, 15 Jun 2021 13:45:00 +0000").is_some());
    }

    #[test]
    fn test_parse_datetime_rejects_non_dates() {
        assert_eq!(parse_datetime(""), None);
        assert_eq!(parse_datetime("12345"), None);
        assert_eq!(parse_datetime("3.14"), None);
        assert_eq!(parse_datetime("London"), None);
        assert_eq!(parse_datetime("2020-13-45"), None);
    }
}
