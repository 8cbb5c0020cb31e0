use crate::processing::labels::remove_label_prefix;
use chrono::{DateTime, Datelike, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;

pub const PARSED_FORMAT_CONFIDENCE: f64 = 0.9;
pub const FALLBACK_CONFIDENCE: f64 = 0.7;

const MIN_YEAR: i32 = 1800;
const MAX_YEAR: i32 = 2100;

const MONTH_NAMES: [&str; 12] = [
    "january", "february", "march", "april", "may", "june", "july", "august", "september",
    "october", "november", "december",
];

// Formats the generic fallback accepts once ordinals and abbreviation dots are gone
const FALLBACK_FORMATS: &[&str] = &[
    "%B %d, %Y",
    "%B %d %Y",
    "%d %B, %Y",
    "%A, %B %d, %Y",
    "%A %B %d %Y",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%m-%d-%Y",
    "%m.%d.%Y",
    "%m/%d/%Y",
    "%Y-%m-%d %H:%M:%S",
];

lazy_static! {
    static ref MONTH_DAY_YEAR_NUMERIC: Regex = Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{4})$").unwrap();
    static ref ISO_DATE: Regex = Regex::new(r"^(\d{4})-(\d{1,2})-(\d{1,2})$").unwrap();
    static ref MONTH_NAME_DAY_YEAR: Regex = Regex::new(r"^([A-Za-z]+)\s+(\d{1,2}),?\s+(\d{4})$").unwrap();
    static ref DAY_MONTH_NAME_YEAR: Regex = Regex::new(r"^(\d{1,2})\s+([A-Za-z]+)\s+(\d{4})$").unwrap();

    static ref ORDINAL_SUFFIX: Regex = Regex::new(r"(\d)(?:st|nd|rd|th)\b").unwrap();
    static ref ABBREVIATION_DOT: Regex = Regex::new(r"([A-Za-z])\.").unwrap();
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDate {
    pub date: NaiveDate,
    pub confidence: f64,
}

impl ParsedDate {
    /// Canonical `YYYY-MM-DD` form.
    pub fn iso(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

/// Parse a record date.
///
/// Tries `M/D/YYYY`, `YYYY-M-D`, `Month D, YYYY` and `D Month YYYY` (month
/// names prefix-matched) at 0.9 confidence, then a looser fallback at 0.7.
/// Years outside 1800..=2100 and impossible calendar dates are rejected.
pub fn parse_date(input: &str) -> Option<ParsedDate> {
    let cleaned = remove_label_prefix(input);
    if cleaned.is_empty() {
        return None;
    }

    if let Some(date) = parse_known_formats(&cleaned) {
        return Some(ParsedDate {
            date,
            confidence: PARSED_FORMAT_CONFIDENCE,
        });
    }

    parse_fallback(&cleaned).map(|date| ParsedDate {
        date,
        confidence: FALLBACK_CONFIDENCE,
    })
}

fn parse_known_formats(text: &str) -> Option<NaiveDate> {
    if let Some(caps) = MONTH_DAY_YEAR_NUMERIC.captures(text) {
        if let Some(date) = build_date(&caps[3], number(&caps[1]), &caps[2]) {
            return Some(date);
        }
    }

    if let Some(caps) = ISO_DATE.captures(text) {
        if let Some(date) = build_date(&caps[1], number(&caps[2]), &caps[3]) {
            return Some(date);
        }
    }

    if let Some(caps) = MONTH_NAME_DAY_YEAR.captures(text) {
        if let Some(month) = month_from_prefix(&caps[1]) {
            if let Some(date) = build_date(&caps[3], Some(month), &caps[2]) {
                return Some(date);
            }
        }
    }

    if let Some(caps) = DAY_MONTH_NAME_YEAR.captures(text) {
        if let Some(month) = month_from_prefix(&caps[2]) {
            if let Some(date) = build_date(&caps[3], Some(month), &caps[1]) {
                return Some(date);
            }
        }
    }

    None
}

fn number(text: &str) -> Option<u32> {
    text.parse().ok()
}

fn build_date(year: &str, month: Option<u32>, day: &str) -> Option<NaiveDate> {
    let year: i32 = year.parse().ok()?;
    let month = month?;
    let day = number(day)?;

    if !(MIN_YEAR..=MAX_YEAR).contains(&year) || !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }

    // from_ymd_opt rejects dates such as 2/30 that only pass the range check
    NaiveDate::from_ymd_opt(year, month, day)
}

/// 1-based month whose English name starts with `name` ("Sept" -> 9).
fn month_from_prefix(name: &str) -> Option<u32> {
    let name = name.to_lowercase();
    MONTH_NAMES
        .iter()
        .position(|month| month.starts_with(&name))
        .map(|idx| idx as u32 + 1)
}

fn parse_fallback(text: &str) -> Option<NaiveDate> {
    let without_ordinals = ORDINAL_SUFFIX.replace_all(text, "$1");
    let without_dots = ABBREVIATION_DOT.replace_all(&without_ordinals, "$1");
    let candidate = WHITESPACE_RUN.replace_all(without_dots.trim(), " ").to_string();

    let date = FALLBACK_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(&candidate, format).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(&candidate)
                .ok()
                .map(|datetime| datetime.date_naive())
        })?;

    if (MIN_YEAR..=MAX_YEAR).contains(&date.year()) {
        Some(date)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iso(input: &str) -> Option<(String, f64)> {
        parse_date(input).map(|parsed| (parsed.iso(), parsed.confidence))
    }

    #[test]
    fn test_numeric_formats() {
        assert_eq!(iso("5/10/1931"), Some(("1931-05-10".to_string(), 0.9)));
        assert_eq!(iso("12/31/2000"), Some(("2000-12-31".to_string(), 0.9)));
        assert_eq!(iso("1931-5-10"), Some(("1931-05-10".to_string(), 0.9)));
        assert_eq!(iso("Born: 5/10/1931"), Some(("1931-05-10".to_string(), 0.9)));
    }

    #[test]
    fn test_month_name_formats() {
        assert_eq!(iso("June 2, 1931"), Some(("1931-06-02".to_string(), 0.9)));
        assert_eq!(iso("Sept 14 1950"), Some(("1950-09-14".to_string(), 0.9)));
        assert_eq!(iso("14 February 1950"), Some(("1950-02-14".to_string(), 0.9)));
        assert_eq!(iso("2 dec 1899"), Some(("1899-12-02".to_string(), 0.9)));
    }

    #[test]
    fn test_fallback_formats() {
        assert_eq!(iso("June 2nd, 1931"), Some(("1931-06-02".to_string(), 0.7)));
        assert_eq!(iso("Jan. 5, 1931"), Some(("1931-01-05".to_string(), 0.7)));
        assert_eq!(iso("1931/05/10"), Some(("1931-05-10".to_string(), 0.7)));
    }

    #[test]
    fn test_rejected_dates() {
        assert_eq!(iso(""), None);
        assert_eq!(iso("unknown"), None);
        assert_eq!(iso("2/30/1931"), None);
        assert_eq!(iso("13/01/1931"), None);
        assert_eq!(iso("5/10/1700"), None);
        assert_eq!(iso("5/10/2101"), None);
        assert_eq!(iso("Smarch 5, 1931"), None);
    }

    #[test]
    fn numeric_round_trip_across_supported_range() {
        let mut date = NaiveDate::from_ymd_opt(1800, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2100, 12, 31).unwrap();
        while date <= end {
            let text = format!("{}/{}/{}", date.month(), date.day(), date.year());
            let parsed = parse_date(&text).unwrap();
            assert_eq!(parsed.date, date);
            assert_eq!(parsed.confidence, PARSED_FORMAT_CONFIDENCE);
            date = date + chrono::Duration::days(1);
        }
    }
}
