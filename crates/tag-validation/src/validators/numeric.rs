//! Numeric string validators

use regex::Regex;
use serde_json::{Number, Value};
use std::cmp::Ordering;
use std::fmt;
use std::sync::OnceLock;

fn numeric_regex() -> &'static Regex {
    static NUMERIC: OnceLock<Regex> = OnceLock::new();
    NUMERIC.get_or_init(|| Regex::new(r"^[-+]?[0-9]+$").expect("numeric pattern compiles"))
}

fn number_regex() -> &'static Regex {
    static NUMBER: OnceLock<Regex> = OnceLock::new();
    NUMBER.get_or_init(|| Regex::new(r"^[0-9]+$").expect("number pattern compiles"))
}

/// `numeric`: an optionally signed integer string, or any number
pub fn is_numeric(value: &Value) -> bool {
    match value {
        Value::Number(_) => true,
        Value::String(s) => numeric_regex().is_match(s),
        _ => false,
    }
}

/// `number`: digits only, or a non-negative integer
pub fn is_number(value: &Value) -> bool {
    match value {
        Value::Number(n) => n.is_u64(),
        Value::String(s) => number_regex().is_match(s),
        _ => false,
    }
}

/// A number that keeps integers exact; only floats compare through `f64`
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Num {
    Int(i128),
    Float(f64),
}

impl Num {
    pub fn from_json(number: &Number) -> Option<Self> {
        if let Some(n) = number.as_i64() {
            Some(Self::Int(n.into()))
        } else if let Some(n) = number.as_u64() {
            Some(Self::Int(n.into()))
        } else {
            number.as_f64().map(Self::Float)
        }
    }

    pub fn from_len(len: usize) -> Self {
        Self::Int(len as i128)
    }

    pub fn as_f64(&self) -> f64 {
        match self {
            Self::Int(n) => *n as f64,
            Self::Float(n) => *n,
        }
    }

    pub fn compare(&self, other: &Num) -> Option<Ordering> {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(b)),
            _ => self.as_f64().partial_cmp(&other.as_f64()),
        }
    }

    pub fn equals(&self, other: &Num) -> bool {
        self.compare(other) == Some(Ordering::Equal)
    }
}

impl fmt::Display for Num {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{}", n),
            Self::Float(n) => write!(f, "{}", n),
        }
    }
}

/// Parse a rule parameter as a number, exactly when it is an integer
pub(crate) fn parse_number(param: &str) -> Option<Num> {
    let param = param.trim();
    if let Ok(n) = param.parse::<i128>() {
        return Some(Num::Int(n));
    }
    param.parse::<f64>().ok().filter(|n| n.is_finite()).map(Num::Float)
}
