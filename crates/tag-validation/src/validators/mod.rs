//! Built-in rules for common validation scenarios

pub mod custom;
pub mod email;
pub mod equality;
pub mod length;
pub mod numeric;
pub mod pattern;
pub mod required;

pub use custom::{CustomRule, RuleFn};
pub use length::Comparison;
pub use numeric::Num;

use crate::error::ConfigError;
use crate::traits::FieldContext;

/// The closed set of rules that ship with the validator
#[derive(Debug, Clone, PartialEq)]
pub enum BuiltinRule {
    Required,
    Numeric,
    Number,
    Email,
    Alpha,
    Alphanumeric,
    Uuid,
    Datetime(String),
    Size(Comparison, Num),
    Eq(String),
    Ne(String),
    OneOf(Vec<String>),
    EqField(Option<String>),
    NeField(Option<String>),
}

impl BuiltinRule {
    /// Every built-in rule name
    pub const NAMES: &'static [&'static str] = &[
        "required", "numeric", "number", "email", "alpha", "alphanum", "uuid", "datetime",
        "min", "max", "len", "gt", "gte", "lt", "lte", "eq", "ne", "oneof", "eqfield",
        "nefield",
    ];

    pub fn is_builtin(name: &str) -> bool {
        Self::NAMES.contains(&name)
    }

    /// Resolve a rule name and its raw parameter. `None` when `name` is not built in.
    pub fn from_tag(name: &str, param: Option<&str>) -> Option<Result<Self, ConfigError>> {
        let rule = match name {
            "required" => no_param(name, param).map(|_| Self::Required),
            "numeric" => no_param(name, param).map(|_| Self::Numeric),
            "number" => no_param(name, param).map(|_| Self::Number),
            "email" => no_param(name, param).map(|_| Self::Email),
            "alpha" => no_param(name, param).map(|_| Self::Alpha),
            "alphanum" => no_param(name, param).map(|_| Self::Alphanumeric),
            "uuid" => no_param(name, param).map(|_| Self::Uuid),
            "datetime" => required_param(name, param).map(|p| Self::Datetime(p.to_string())),
            "eq" => required_param(name, param).map(|p| Self::Eq(p.to_string())),
            "ne" => required_param(name, param).map(|p| Self::Ne(p.to_string())),
            "oneof" => required_param(name, param).and_then(|p| {
                let values: Vec<String> = p.split_whitespace().map(str::to_string).collect();
                if values.is_empty() {
                    Err(ConfigError::invalid_parameter(name, p, "space separated values"))
                } else {
                    Ok(Self::OneOf(values))
                }
            }),
            "eqfield" => Ok(Self::EqField(param.map(str::to_string))),
            "nefield" => Ok(Self::NeField(param.map(str::to_string))),
            _ => {
                let comparison = Comparison::from_name(name)?;
                required_param(name, param).and_then(|p| {
                    numeric::parse_number(p)
                        .map(|limit| Self::Size(comparison, limit))
                        .ok_or_else(|| ConfigError::invalid_parameter(name, p, "a number"))
                })
            }
        };
        Some(rule)
    }

    /// Rule name as written in tags
    pub fn name(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Numeric => "numeric",
            Self::Number => "number",
            Self::Email => "email",
            Self::Alpha => "alpha",
            Self::Alphanumeric => "alphanum",
            Self::Uuid => "uuid",
            Self::Datetime(_) => "datetime",
            Self::Size(comparison, _) => comparison.name(),
            Self::Eq(_) => "eq",
            Self::Ne(_) => "ne",
            Self::OneOf(_) => "oneof",
            Self::EqField(_) => "eqfield",
            Self::NeField(_) => "nefield",
        }
    }

    /// Evaluate the rule; `Ok(false)` is a validation failure
    pub fn check(&self, ctx: &FieldContext<'_>) -> Result<bool, ConfigError> {
        match self {
            Self::Required => Ok(required::has_value(ctx.value())),
            Self::Numeric => Ok(numeric::is_numeric(ctx.value())),
            Self::Number => Ok(numeric::is_number(ctx.value())),
            Self::Email => Ok(ctx.as_str().map(email::is_email).unwrap_or(false)),
            Self::Alpha => Ok(ctx.as_str().map(pattern::is_alpha).unwrap_or(false)),
            Self::Alphanumeric => Ok(ctx.as_str().map(pattern::is_alphanumeric).unwrap_or(false)),
            Self::Uuid => Ok(ctx.as_str().map(pattern::is_uuid).unwrap_or(false)),
            Self::Datetime(format) => Ok(ctx
                .as_str()
                .map(|s| pattern::matches_datetime(s, format))
                .unwrap_or(false)),
            Self::Size(comparison, limit) => comparison.check(ctx, *limit),
            Self::Eq(param) => equality::equals_param("eq", ctx, param),
            Self::Ne(param) => equality::equals_param("ne", ctx, param).map(|eq| !eq),
            Self::OneOf(values) => Ok(equality::is_one_of(ctx.value(), values)),
            Self::EqField(field) => equality::equals_field("eqfield", ctx, field.as_deref()),
            Self::NeField(field) => {
                equality::equals_field("nefield", ctx, field.as_deref()).map(|eq| !eq)
            }
        }
    }

    /// Failure message for the field in `ctx`
    pub fn message(&self, ctx: &FieldContext<'_>) -> String {
        let name = ctx.display_name();
        match self {
            Self::Required => format!("{} is required", name),
            Self::Numeric => format!("{} must be a numeric value", name),
            Self::Number => format!("{} must contain only digits", name),
            Self::Email => format!("{} must be a valid email address", name),
            Self::Alpha => format!("{} must contain only letters", name),
            Self::Alphanumeric => format!("{} must contain only letters and digits", name),
            Self::Uuid => format!("{} must be a valid UUID", name),
            Self::Datetime(format) => {
                format!("{} must be a date/time in the format '{}'", name, format)
            }
            Self::Size(comparison, limit) => comparison.message(ctx, *limit),
            Self::Eq(param) => format!("{} must be equal to {}", name, param),
            Self::Ne(param) => format!("{} must not be equal to {}", name, param),
            Self::OneOf(values) => format!("{} must be one of: {}", name, values.join(", ")),
            Self::EqField(Some(other)) => format!("{} must be equal to {}", name, other),
            Self::EqField(None) => format!("{} must be equal to the compared value", name),
            Self::NeField(Some(other)) => format!("{} must not be equal to {}", name, other),
            Self::NeField(None) => format!("{} must not be equal to the compared value", name),
        }
    }
}

fn no_param(rule: &str, param: Option<&str>) -> Result<(), ConfigError> {
    match param {
        Some(p) => Err(ConfigError::invalid_parameter(rule, p, "no parameter")),
        None => Ok(()),
    }
}

fn required_param<'a>(rule: &str, param: Option<&'a str>) -> Result<&'a str, ConfigError> {
    match param {
        Some(p) if !p.is_empty() => Ok(p),
        _ => Err(ConfigError::MissingParameter {
            rule: rule.to_string(),
        }),
    }
}
