//! The validator context: registry, configuration and compiled caches

use crate::config::ValidatorConfig;
use crate::error::{ConfigError, FieldTarget, ValidateError, ValidationResult};
use crate::registry::RuleRegistry;
use crate::schema::{CompiledField, CompiledSchema, NestedSchema, StructSchema};
use crate::tags::{parse_tag, FieldTagSet};
use crate::traits::{FieldContext, Validate};
use crate::validators::CustomRule;
use crate::walker::{Position, Scope, Walker};
use serde::Serialize;
use serde_json::Value;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Validates values, value pairs and schema-described structs.
///
/// Rules and aliases are registered through `&mut self` before the validator
/// is shared. Validation only needs `&self`, so a configured validator can be
/// placed behind an `Arc` and used from many threads at once.
///
/// ```ignore
/// let mut validator = Validator::new();
/// validator.register_alias("varchar", "min=5")?;
///
/// validator.validate_value(&"joeybloggs", "required,varchar")?;
/// ```
#[derive(Debug, Default)]
pub struct Validator {
    registry: RuleRegistry,
    config: ValidatorConfig,
    tag_cache: RwLock<HashMap<String, Arc<FieldTagSet>>>,
    schema_cache: RwLock<HashMap<TypeId, Arc<CompiledSchema>>>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a validator and register the aliases listed in `config`
    pub fn with_config(config: ValidatorConfig) -> Result<Self, ConfigError> {
        let mut registry = RuleRegistry::new();
        for (name, expansion) in &config.aliases {
            registry.register_alias(name.as_str(), expansion.as_str())?;
        }

        Ok(Self {
            registry,
            config,
            tag_cache: RwLock::default(),
            schema_cache: RwLock::default(),
        })
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Register a custom rule under a new name
    pub fn register_rule<F>(&mut self, name: impl Into<String>, func: F) -> Result<(), ConfigError>
    where
        F: Fn(&FieldContext<'_>) -> bool + Send + Sync + 'static,
    {
        self.registry.register(CustomRule::new(name, func))?;
        self.clear_caches();
        Ok(())
    }

    /// Register a custom rule, replacing a built-in or custom rule of the same name
    pub fn register_rule_override<F>(
        &mut self,
        name: impl Into<String>,
        func: F,
    ) -> Result<(), ConfigError>
    where
        F: Fn(&FieldContext<'_>) -> bool + Send + Sync + 'static,
    {
        self.registry.register_override(CustomRule::new(name, func))?;
        self.clear_caches();
        Ok(())
    }

    /// Register an alias that expands to a tag fragment
    pub fn register_alias(
        &mut self,
        name: impl Into<String>,
        expansion: impl Into<String>,
    ) -> Result<(), ConfigError> {
        self.registry.register_alias(name, expansion)?;
        self.clear_caches();
        Ok(())
    }

    /// Check if a rule name resolves, built-in or custom
    pub fn has_rule(&self, name: &str) -> bool {
        self.registry.has_rule(name)
    }

    /// Parse a tag string without validating anything
    pub fn check_tag(&self, tags: &str) -> Result<(), ConfigError> {
        self.tag_set(tags).map(|_| ())
    }

    /// Validate a single value against a tag string
    pub fn validate_value<T: Serialize + ?Sized>(&self, value: &T, tags: &str) -> ValidationResult {
        let value = serde_json::to_value(value)?;
        self.run_field(&value, tags, Scope::default())
    }

    /// Validate `value` against a tag string where cross-value rules such as
    /// `eqfield` compare with `other`
    pub fn validate_value_pair<A, B>(&self, value: &A, other: &B, tags: &str) -> ValidationResult
    where
        A: Serialize + ?Sized,
        B: Serialize + ?Sized,
    {
        let value = serde_json::to_value(value)?;
        let other = serde_json::to_value(other)?;
        self.run_field(&value, tags, Scope::paired(&other))
    }

    /// Validate a struct against the schema its type declares
    pub fn validate_struct<T: Validate>(&self, value: &T) -> ValidationResult {
        let json = serde_json::to_value(value)?;
        let schema = self.compiled_schema(&NestedSchema::of::<T>())?;
        self.run_struct(&schema, &json)
    }

    /// Validate a JSON object against a schema built at runtime
    pub fn validate_json(&self, value: &Value, schema: &StructSchema) -> ValidationResult {
        let schema = self.compile(schema)?;
        self.run_struct(&schema, value)
    }

    fn run_field(&self, value: &Value, tags: &str, scope: Scope<'_>) -> ValidationResult {
        let tags = self.tag_set(tags)?;
        let mut walker = Walker::new(self);
        walker.eval_field(&tags, value, &Position::default(), scope, None, FieldTarget::Value)?;
        finish(walker)
    }

    fn run_struct(&self, schema: &CompiledSchema, value: &Value) -> ValidationResult {
        let mut walker = Walker::new(self);
        walker.walk_struct(schema, value, &Position::root(&schema.name))?;
        finish(walker)
    }

    /// Parsed tag set for a tag string, cached by its text
    pub(crate) fn tag_set(&self, tags: &str) -> Result<Arc<FieldTagSet>, ConfigError> {
        if let Some(cached) = self
            .tag_cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(tags)
        {
            return Ok(Arc::clone(cached));
        }

        let parsed = Arc::new(parse_tag(tags, &self.registry, self.config.max_alias_depth)?);
        self.tag_cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(tags.to_string(), Arc::clone(&parsed));
        Ok(parsed)
    }

    /// Compiled schema of a nested type, cached by its type id
    pub(crate) fn compiled_schema(&self, nested: &NestedSchema) -> Result<Arc<CompiledSchema>, ConfigError> {
        if let Some(cached) = self
            .schema_cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&nested.type_id())
        {
            return Ok(Arc::clone(cached));
        }

        let compiled = Arc::new(self.compile(&nested.build())?);
        tracing::debug!(
            "Compiled validation schema for {} ({} fields)",
            nested.type_name(),
            compiled.fields.len()
        );
        self.schema_cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(nested.type_id(), Arc::clone(&compiled));
        Ok(compiled)
    }

    fn compile(&self, schema: &StructSchema) -> Result<CompiledSchema, ConfigError> {
        let fields = schema
            .fields()
            .iter()
            .map(|field| {
                Ok(CompiledField {
                    name: field.name.clone(),
                    tags: self.tag_set(&field.tags)?,
                    nested: field.nested,
                    numeric_keys: field.numeric_keys,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(CompiledSchema {
            name: schema.name().to_string(),
            fields,
        })
    }

    fn clear_caches(&mut self) {
        self.tag_cache
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.schema_cache
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

fn finish(walker: Walker<'_>) -> ValidationResult {
    let errors = walker.finish();
    if errors.is_valid() {
        Ok(())
    } else {
        Err(ValidateError::Failed(errors))
    }
}
