//! Character-class, UUID and date/time format validators

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use std::sync::OnceLock;
use uuid::Uuid;

fn alpha_regex() -> &'static Regex {
    static ALPHA: OnceLock<Regex> = OnceLock::new();
    ALPHA.get_or_init(|| Regex::new(r"^[a-zA-Z]+$").expect("alpha pattern compiles"))
}

fn alphanumeric_regex() -> &'static Regex {
    static ALPHANUMERIC: OnceLock<Regex> = OnceLock::new();
    ALPHANUMERIC
        .get_or_init(|| Regex::new(r"^[a-zA-Z0-9]+$").expect("alphanumeric pattern compiles"))
}

/// ASCII letters only
pub fn is_alpha(value: &str) -> bool {
    alpha_regex().is_match(value)
}

/// ASCII letters and digits only
pub fn is_alphanumeric(value: &str) -> bool {
    alphanumeric_regex().is_match(value)
}

/// Hyphenated UUID of any version
pub fn is_uuid(value: &str) -> bool {
    value.len() == 36 && Uuid::parse_str(value).is_ok()
}

/// Whether `value` parses with the chrono `format`, as a date-time, a date or a time
pub fn matches_datetime(value: &str, format: &str) -> bool {
    NaiveDateTime::parse_from_str(value, format).is_ok()
        || NaiveDate::parse_from_str(value, format).is_ok()
        || NaiveTime::parse_from_str(value, format).is_ok()
}
