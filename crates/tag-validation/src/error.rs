//! Validation failures, configuration errors and the result aggregator

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub type ValidationResult<T = ()> = Result<T, ValidateError>;

/// Which part of a map entry a failure refers to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FieldTarget {
    #[default]
    Value,
    MapKey,
}

/// A single violated rule on a single field or element
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidationError {
    /// Leaf field name, including an `[index]` or `[key]` suffix for elements
    pub field: String,
    /// Full namespace rooted at the struct name, e.g. `Person.Addresses[1].Street`
    pub path: String,
    /// Name of the rule that failed; the whole group for alternations (`email|numeric`)
    pub rule: String,
    /// The rule as written in the tag, which is the alias name when expanded from one
    pub tag: String,
    /// Rule parameter, empty when the rule takes none
    pub param: String,
    /// Human-readable error message
    pub message: String,
    /// Whether the failure concerns a map key or a value
    #[serde(default)]
    pub target: FieldTarget,
    /// The offending value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
}

impl ValidationError {
    /// Create a validation error for a field and rule
    pub fn new(
        field: impl Into<String>,
        rule: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        let field = field.into();
        let rule = rule.into();
        Self {
            path: field.clone(),
            field,
            tag: rule.clone(),
            rule,
            param: String::new(),
            message: message.into(),
            target: FieldTarget::Value,
            value: None,
        }
    }

    /// Set the full namespace of the field
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Set the rule parameter
    pub fn param(mut self, param: impl Into<String>) -> Self {
        self.param = param.into();
        self
    }

    /// Set the tag as written, when it differs from the rule name
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    /// Mark the error as concerning a map key
    pub fn on_key(mut self) -> Self {
        self.target = FieldTarget::MapKey;
        self
    }

    /// Attach the offending value
    pub fn value(mut self, value: serde_json::Value) -> Self {
        self.value = Some(value);
        self
    }

    pub fn is_key_error(&self) -> bool {
        self.target == FieldTarget::MapKey
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{} (rule '{}')", self.message, self.tag)
        } else {
            write!(f, "{}: {} (rule '{}')", self.path, self.message, self.tag)
        }
    }
}

/// Ordered collection of validation errors, in visitation order
#[derive(Debug, Clone, Serialize, Deserialize, Error, PartialEq, Default)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    /// Create a new empty validation errors collection
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Add a single validation error
    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Append another collection, keeping its order
    pub fn merge(&mut self, other: ValidationErrors) {
        self.errors.extend(other.errors);
    }

    /// True when no rule failed
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Total number of recorded failures
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.errors.iter()
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Errors recorded for a field path
    pub fn field_errors(&self, path: &str) -> Vec<&ValidationError> {
        self.errors.iter().filter(|e| e.path == path).collect()
    }

    /// Check if a specific field path has errors
    pub fn has_field_errors(&self, path: &str) -> bool {
        self.errors.iter().any(|e| e.path == path)
    }

    /// Number of distinct field paths with errors
    pub fn field_count(&self) -> usize {
        let mut paths: Vec<&str> = self.errors.iter().map(|e| e.path.as_str()).collect();
        paths.sort_unstable();
        paths.dedup();
        paths.len()
    }

    /// Convert to a JSON-serializable format for API responses
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": "validation_failed",
                "message": "Validation failed",
                "fields": self.errors
            }
        })
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.errors.is_empty() {
            write!(f, "No validation errors")
        } else {
            write!(f, "Validation failed with {} error(s):", self.errors.len())?;
            for error in &self.errors {
                write!(f, "\n  {}", error)?;
            }
            Ok(())
        }
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

/// Setup mistakes: bad tags, unknown rules, faulty custom rules
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown validation rule '{rule}' in tag '{tag}'")]
    UnknownRule { rule: String, tag: String },

    #[error("Malformed tag '{tag}': {reason}")]
    MalformedTag { tag: String, reason: String },

    #[error("Rule '{rule}' requires a parameter")]
    MissingParameter { rule: String },

    #[error("Invalid parameter '{param}' for rule '{rule}'. Expected: {expected}")]
    InvalidParameter {
        rule: String,
        param: String,
        expected: String,
    },

    #[error("Alias expansion cycle: {chain}")]
    AliasCycle { chain: String },

    #[error("Rule '{name}' is already registered")]
    DuplicateRule { name: String },

    #[error("Rule '{rule}' cannot be applied to {kind} value at '{field}'")]
    UnsupportedType {
        rule: String,
        kind: String,
        field: String,
    },

    #[error("Field '{field}' referenced by rule '{rule}' does not exist")]
    UnknownField { rule: String, field: String },

    #[error("Custom rule '{rule}' panicked on '{field}': {message}")]
    RulePanicked {
        rule: String,
        field: String,
        message: String,
    },

    #[error("Value serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration parsing failed: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl ConfigError {
    /// Create a malformed tag error
    pub fn malformed(tag: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedTag {
            tag: tag.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(
        rule: impl Into<String>,
        param: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        Self::InvalidParameter {
            rule: rule.into(),
            param: param.into(),
            expected: expected.into(),
        }
    }

    /// Create an unsupported value type error
    pub fn unsupported_type(
        rule: impl Into<String>,
        kind: impl Into<String>,
        field: impl Into<String>,
    ) -> Self {
        Self::UnsupportedType {
            rule: rule.into(),
            kind: kind.into(),
            field: field.into(),
        }
    }

    /// Check if the error came from a custom rule fault
    pub fn is_rule_panic(&self) -> bool {
        matches!(self, Self::RulePanicked { .. })
    }
}

/// Outcome of a failed validation call
#[derive(Debug, Error)]
pub enum ValidateError {
    /// One or more rules failed; data-dependent and never fatal
    #[error("{0}")]
    Failed(ValidationErrors),

    /// The validator or a tag is misconfigured; the call was aborted
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ValidateError {
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// The recorded failures, if this is a validation failure
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Failed(errors) => Some(errors),
            Self::Config(_) => None,
        }
    }

    pub fn into_validation_errors(self) -> Option<ValidationErrors> {
        match self {
            Self::Failed(errors) => Some(errors),
            Self::Config(_) => None,
        }
    }

    pub fn config_error(&self) -> Option<&ConfigError> {
        match self {
            Self::Config(err) => Some(err),
            Self::Failed(_) => None,
        }
    }
}

impl From<ValidationErrors> for ValidateError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Failed(errors)
    }
}

impl From<serde_json::Error> for ValidateError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(ConfigError::Serialization(err))
    }
}
