//! Struct walking and rule evaluation

use crate::error::{ConfigError, FieldTarget, ValidationError, ValidationErrors};
use crate::schema::{CompiledSchema, NestedSchema};
use crate::tags::{DiveSpec, FieldTagSet, RuleGroup};
use crate::traits::{kind_name, FieldContext};
use crate::validator::Validator;
use crate::validators::numeric::Num;
use crate::validators::required::is_zero;
use serde_json::{Map, Value};
use std::cmp::Ordering;

static NULL: Value = Value::Null;

/// Where a value sits in the structure being validated
#[derive(Debug, Clone, Default)]
pub(crate) struct Position {
    field: String,
    path: String,
}

impl Position {
    /// Root of a struct walk, named after the struct
    pub fn root(name: &str) -> Self {
        Self {
            field: name.to_string(),
            path: name.to_string(),
        }
    }

    fn child(&self, name: &str) -> Self {
        let path = if self.path.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", self.path, name)
        };
        Self {
            field: name.to_string(),
            path,
        }
    }

    fn element(&self, index: impl std::fmt::Display) -> Self {
        Self {
            field: format!("{}[{}]", self.field, index),
            path: format!("{}[{}]", self.path, index),
        }
    }
}

/// Values visible to cross-field rules, and how the field's map keys were serialized
#[derive(Clone, Copy, Default)]
pub(crate) struct Scope<'a> {
    parent: Option<&'a Map<String, Value>>,
    other: Option<&'a Value>,
    numeric_keys: bool,
}

impl<'a> Scope<'a> {
    pub fn paired(other: &'a Value) -> Self {
        Self {
            other: Some(other),
            ..Self::default()
        }
    }
}

/// Walks one value, accumulating failures in visitation order
pub(crate) struct Walker<'v> {
    validator: &'v Validator,
    errors: ValidationErrors,
}

impl<'v> Walker<'v> {
    pub fn new(validator: &'v Validator) -> Self {
        Self {
            validator,
            errors: ValidationErrors::new(),
        }
    }

    pub fn finish(self) -> ValidationErrors {
        self.errors
    }

    /// Validate every field of a struct value against its schema
    pub fn walk_struct(
        &mut self,
        schema: &CompiledSchema,
        value: &Value,
        pos: &Position,
    ) -> Result<(), ConfigError> {
        let object = match value {
            Value::Object(object) => object,
            Value::Null => return Ok(()),
            other => {
                return Err(ConfigError::unsupported_type(
                    schema.name.as_str(),
                    kind_name(other),
                    pos.path.as_str(),
                ))
            }
        };

        for field in &schema.fields {
            let field_value = object.get(&field.name).unwrap_or_else(|| {
                tracing::debug!(
                    "Field {} not present in serialized {}, validating as null",
                    field.name,
                    schema.name
                );
                &NULL
            });
            let scope = Scope {
                parent: Some(object),
                other: None,
                numeric_keys: field.numeric_keys,
            };
            self.eval_field(
                &field.tags,
                field_value,
                &pos.child(&field.name),
                scope,
                field.nested.as_ref(),
                FieldTarget::Value,
            )?;
        }
        Ok(())
    }

    /// Apply a tag set to one value, then dive or recurse into a nested schema
    pub fn eval_field(
        &mut self,
        tags: &FieldTagSet,
        value: &Value,
        pos: &Position,
        scope: Scope<'_>,
        nested: Option<&NestedSchema>,
        target: FieldTarget,
    ) -> Result<(), ConfigError> {
        if tags.skip || (tags.omit_empty && is_zero(value)) {
            return Ok(());
        }

        let validator = self.validator;
        let config = validator.config();
        for group in &tags.groups {
            if self.eval_group(group, value, pos, scope, target)? {
                continue;
            }
            if (group.is_required() && config.required_short_circuit) || config.first_error_per_field {
                return Ok(());
            }
        }

        match (&tags.dive, nested, value) {
            (Some(dive), _, _) => self.dive(dive, value, pos, scope, nested),
            (None, Some(nested), Value::Object(_)) => {
                let schema = validator.compiled_schema(nested)?;
                self.walk_struct(&schema, value, pos)
            }
            _ => Ok(()),
        }
    }

    /// Returns whether the group passed; records a failure otherwise
    fn eval_group(
        &mut self,
        group: &RuleGroup,
        value: &Value,
        pos: &Position,
        scope: Scope<'_>,
        target: FieldTarget,
    ) -> Result<bool, ConfigError> {
        let base = FieldContext {
            value,
            param: None,
            field: &pos.field,
            path: &pos.path,
            parent: scope.parent,
            other: scope.other,
        };

        for spec in &group.alternatives {
            let ctx = base.with_param(spec.param.as_deref());
            if spec.rule.check(&ctx)? {
                return Ok(true);
            }
        }

        let error = match group.alternatives.as_slice() {
            [spec] => {
                let ctx = base.with_param(spec.param.as_deref());
                ValidationError::new(pos.field.as_str(), spec.name.as_str(), spec.rule.message(&ctx))
                    .tag(spec.tag())
                    .param(spec.param.clone().unwrap_or_default())
            }
            alternatives => {
                let tag = alternatives
                    .first()
                    .and_then(|spec| spec.alias.clone())
                    .unwrap_or_else(|| group.text.clone());
                ValidationError::new(
                    pos.field.as_str(),
                    group.text.as_str(),
                    format!("{} must satisfy one of '{}'", base.display_name(), group.text),
                )
                .tag(tag)
            }
        };

        let error = error.path(pos.path.as_str()).value(value.clone());
        let error = match target {
            FieldTarget::MapKey => error.on_key(),
            FieldTarget::Value => error,
        };

        tracing::trace!(path = %error.path, rule = %error.rule, "Validation failed");
        self.errors.add(error);
        Ok(false)
    }

    fn dive(
        &mut self,
        dive: &DiveSpec,
        value: &Value,
        pos: &Position,
        scope: Scope<'_>,
        nested: Option<&NestedSchema>,
    ) -> Result<(), ConfigError> {
        match value {
            Value::Null => Ok(()),
            Value::Array(items) => {
                if dive.keys.is_some() {
                    return Err(ConfigError::unsupported_type("keys", "array", pos.path.as_str()));
                }
                for (index, item) in items.iter().enumerate() {
                    self.eval_field(
                        &dive.elements,
                        item,
                        &pos.element(index),
                        scope,
                        nested,
                        FieldTarget::Value,
                    )?;
                }
                Ok(())
            }
            Value::Object(entries) => {
                let mut entries = entries
                    .iter()
                    .map(|(key, entry)| Ok((map_key(key, scope.numeric_keys, pos)?, key, entry)))
                    .collect::<Result<Vec<_>, ConfigError>>()?;
                entries.sort_by(|a, b| key_order(&a.0, &b.0).then_with(|| a.1.cmp(b.1)));

                for (key_value, key, entry) in entries {
                    let entry_pos = pos.element(key);
                    if let Some(keys) = &dive.keys {
                        self.eval_field(keys, &key_value, &entry_pos, scope, None, FieldTarget::MapKey)?;
                    }
                    self.eval_field(
                        &dive.elements,
                        entry,
                        &entry_pos,
                        scope,
                        nested,
                        FieldTarget::Value,
                    )?;
                }
                Ok(())
            }
            other => Err(ConfigError::unsupported_type("dive", kind_name(other), pos.path.as_str())),
        }
    }
}

/// Rebuild a map key as the value it was serialized from
fn map_key(key: &str, numeric: bool, pos: &Position) -> Result<Value, ConfigError> {
    if !numeric {
        return Ok(Value::String(key.to_string()));
    }
    key.parse::<i64>()
        .map(Value::from)
        .or_else(|_| key.parse::<u64>().map(Value::from))
        .map_err(|_| {
            ConfigError::unsupported_type("keys", "non-integer key", pos.element(key).path.as_str())
        })
}

/// Integer keys in numeric order, text keys in byte order
fn key_order(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => Num::from_json(a)
            .zip(Num::from_json(b))
            .and_then(|(a, b)| a.compare(&b))
            .unwrap_or(Ordering::Equal),
        _ => Ordering::Equal,
    }
}
