//! Size bounds for strings, numbers, sequences and maps
//!
//! Strings are measured in characters, numbers by value, sequences and maps by
//! their number of entries.

use crate::error::ConfigError;
use crate::traits::{kind_name, FieldContext};
use crate::validators::numeric::Num;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;

/// Which bound a size rule enforces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Comparison {
    Min,
    Max,
    Len,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl Comparison {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "min" => Some(Self::Min),
            "max" => Some(Self::Max),
            "len" => Some(Self::Len),
            "gt" => Some(Self::Gt),
            "gte" => Some(Self::Gte),
            "lt" => Some(Self::Lt),
            "lte" => Some(Self::Lte),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Min => "min",
            Self::Max => "max",
            Self::Len => "len",
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::Lt => "lt",
            Self::Lte => "lte",
        }
    }

    /// Whether a size ordered `ordering` against the limit satisfies the bound
    pub fn holds(&self, ordering: Ordering) -> bool {
        match self {
            Self::Min | Self::Gte => ordering != Ordering::Less,
            Self::Max | Self::Lte => ordering != Ordering::Greater,
            Self::Len => ordering == Ordering::Equal,
            Self::Gt => ordering == Ordering::Greater,
            Self::Lt => ordering == Ordering::Less,
        }
    }

    /// Check the bound against the measured size of the value.
    /// A null value has no size and fails every bound.
    pub fn check(&self, ctx: &FieldContext<'_>, limit: Num) -> Result<bool, ConfigError> {
        Ok(measure(self.name(), ctx)?
            .and_then(|actual| actual.compare(&limit))
            .map(|ordering| self.holds(ordering))
            .unwrap_or(false))
    }

    fn phrase(&self) -> &'static str {
        match self {
            Self::Min | Self::Gte => "at least",
            Self::Max | Self::Lte => "at most",
            Self::Len => "exactly",
            Self::Gt => "greater than",
            Self::Lt => "less than",
        }
    }

    /// Generate appropriate error message based on the value kind
    pub fn message(&self, ctx: &FieldContext<'_>, limit: Num) -> String {
        let name = ctx.display_name();
        match ctx.value() {
            Value::String(_) => match self {
                Self::Gt | Self::Lt => format!(
                    "{} must be {} {} characters long",
                    name,
                    if *self == Self::Gt { "longer than" } else { "shorter than" },
                    limit
                ),
                _ => format!("{} must be {} {} characters long", name, self.phrase(), limit),
            },
            Value::Array(_) | Value::Object(_) => {
                format!("{} must contain {} {} items", name, self.phrase(), limit)
            }
            _ => format!("{} must be {} {}", name, self.phrase(), limit),
        }
    }
}

/// Get the size of a value; `None` for null
fn measure(rule: &str, ctx: &FieldContext<'_>) -> Result<Option<Num>, ConfigError> {
    match ctx.value() {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(Num::from_len(s.chars().count()))), // Unicode-aware length
        Value::Number(n) => Ok(Num::from_json(n)),
        Value::Array(arr) => Ok(Some(Num::from_len(arr.len()))),
        Value::Object(obj) => Ok(Some(Num::from_len(obj.len()))),
        other @ Value::Bool(_) => Err(ConfigError::unsupported_type(
            rule,
            kind_name(other),
            ctx.path(),
        )),
    }
}
