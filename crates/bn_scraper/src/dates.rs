use chrono::{DateTime, NaiveDate, Utc};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Date shapes seen on municipal listing pages, checked in order.
    static ref DATE_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"(?i)\b[a-z]{3,9} \d{1,2}, \d{4}\b").unwrap(),
        Regex::new(r"\b\d{1,2}/\d{1,2}/\d{4}\b").unwrap(),
        Regex::new(r"\b\d{4}-\d{2}-\d{2}\b").unwrap(),
        Regex::new(r"(?i)\b\d{1,2} [a-z]{3,9} \d{4}\b").unwrap(),
    ];
}

const DATE_FORMATS: &[&str] = &[
    "%B %d, %Y",
    "%b %d, %Y",
    "%m/%d/%Y",
    "%Y-%m-%d",
    "%d %B %Y",
    "%d %b %Y",
];

/// Scans free text for a recognizable date and parses the first hit
/// against an ordered format list. Returns `None` when nothing parses;
/// an unparsable date never fails extraction.
pub fn scan_date(text: &str) -> Option<DateTime<Utc>> {
    for pattern in DATE_PATTERNS.iter() {
        for found in pattern.find_iter(text) {
            if let Some(date) = parse_date(found.as_str()) {
                return Some(date);
            }
        }
    }
    None
}

/// Parses one date-shaped string. Page dates carry no time component,
/// so results land on midnight UTC.
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw.trim(), format).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|datetime| datetime.and_utc())
}
