//! Core traits and the per-field context handed to rules

use crate::schema::StructSchema;
use serde::Serialize;
use serde_json::{Map, Value};

/// Types that declare tag-based validation for their fields.
///
/// Field names in the schema refer to the serialized (serde) names, so
/// `#[serde(rename)]` and `rename_all` are honored.
pub trait Validate: Serialize + 'static {
    /// The field tags of this type
    fn schema() -> StructSchema;
}

/// Everything a rule can inspect about the value under validation
#[derive(Debug, Clone, Copy)]
pub struct FieldContext<'a> {
    pub(crate) value: &'a Value,
    pub(crate) param: Option<&'a str>,
    pub(crate) field: &'a str,
    pub(crate) path: &'a str,
    pub(crate) parent: Option<&'a Map<String, Value>>,
    pub(crate) other: Option<&'a Value>,
}

impl<'a> FieldContext<'a> {
    /// Context for a standalone value with no parent struct
    pub fn new(value: &'a Value) -> Self {
        Self {
            value,
            param: None,
            field: "",
            path: "",
            parent: None,
            other: None,
        }
    }

    pub fn with_param(mut self, param: Option<&'a str>) -> Self {
        self.param = param;
        self
    }

    pub fn with_parent(mut self, parent: &'a Map<String, Value>) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_other(mut self, other: &'a Value) -> Self {
        self.other = Some(other);
        self
    }

    pub fn with_field(mut self, field: &'a str, path: &'a str) -> Self {
        self.field = field;
        self.path = path;
        self
    }

    /// The value being validated
    pub fn value(&self) -> &'a Value {
        self.value
    }

    /// The rule parameter (`5` in `pin=5`)
    pub fn param(&self) -> Option<&'a str> {
        self.param
    }

    /// Leaf field name; empty for standalone values
    pub fn field(&self) -> &'a str {
        self.field
    }

    /// Full namespace of the field
    pub fn path(&self) -> &'a str {
        self.path
    }

    /// Fields of the struct that contains this field
    pub fn parent(&self) -> Option<&'a Map<String, Value>> {
        self.parent
    }

    /// The second value of a pair validation
    pub fn other(&self) -> Option<&'a Value> {
        self.other
    }

    /// Look up a sibling field, following dots into nested structs
    pub fn sibling(&self, name: &str) -> Option<&'a Value> {
        let mut segments = name.split('.');
        let mut current = self.parent?.get(segments.next()?)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    /// The value as a string slice, if it is one
    pub fn as_str(&self) -> Option<&'a str> {
        self.value.as_str()
    }

    /// Name used in messages
    pub fn display_name(&self) -> &'a str {
        if self.field.is_empty() {
            "value"
        } else {
            self.field
        }
    }
}

/// Name of a JSON value kind, for error messages
pub(crate) fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
