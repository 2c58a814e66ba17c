//! Equality against parameters, allowed sets and other fields

use crate::error::ConfigError;
use crate::traits::FieldContext;
use crate::validators::numeric::{parse_number, Num};
use serde_json::Value;

/// `eq` / `ne`: compare a value with the literal parameter.
/// Strings compare by content, numbers by value, collections by length.
pub fn equals_param(rule: &str, ctx: &FieldContext<'_>, param: &str) -> Result<bool, ConfigError> {
    let number = || {
        parse_number(param).ok_or_else(|| ConfigError::invalid_parameter(rule, param, "a number"))
    };

    match ctx.value() {
        Value::Null => Ok(false),
        Value::String(s) => Ok(s == param),
        Value::Number(n) => {
            let limit = number()?;
            Ok(Num::from_json(n).map(|n| n.equals(&limit)).unwrap_or(false))
        }
        Value::Array(arr) => Ok(Num::from_len(arr.len()).equals(&number()?)),
        Value::Object(obj) => Ok(Num::from_len(obj.len()).equals(&number()?)),
        Value::Bool(b) => param
            .parse::<bool>()
            .map(|p| p == *b)
            .map_err(|_| ConfigError::invalid_parameter(rule, param, "true or false")),
    }
}

/// `oneof`: the value's text is one of the allowed values
pub fn is_one_of(value: &Value, allowed: &[String]) -> bool {
    match value {
        Value::String(s) => allowed.iter().any(|a| a == s),
        Value::Number(n) => match Num::from_json(n) {
            Some(n) => allowed
                .iter()
                .filter_map(|a| parse_number(a))
                .any(|a| a.equals(&n)),
            None => false,
        },
        _ => false,
    }
}

/// `eqfield` / `nefield`: compare with the paired value, or the named sibling field.
/// Values of different kinds are never equal.
pub fn equals_field(
    rule: &str,
    ctx: &FieldContext<'_>,
    field: Option<&str>,
) -> Result<bool, ConfigError> {
    let other = match (ctx.other(), field) {
        (Some(other), _) => other,
        (None, Some(name)) => ctx.sibling(name).ok_or_else(|| ConfigError::UnknownField {
            rule: rule.to_string(),
            field: name.to_string(),
        })?,
        (None, None) => {
            return Err(ConfigError::MissingParameter {
                rule: rule.to_string(),
            })
        }
    };

    Ok(values_equal(ctx.value(), other))
}

/// Structural equality, with numbers compared by value
pub(crate) fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => match (Num::from_json(a), Num::from_json(b)) {
            (Some(a), Some(b)) => a.equals(&b),
            _ => false,
        },
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(k, v)| b.get(k).map(|w| values_equal(v, w)).unwrap_or(false))
        }
        _ => left == right,
    }
}
