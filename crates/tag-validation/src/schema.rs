//! Statically declared field schemas for composite types

use crate::tags::FieldTagSet;
use crate::traits::Validate;
use std::any::TypeId;
use std::sync::Arc;

/// Field tags of one composite type, declared once per type
#[derive(Debug, Clone)]
pub struct StructSchema {
    name: String,
    fields: Vec<FieldSpec>,
}

impl StructSchema {
    /// Create an empty schema; `name` roots every error path
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Add a field validated by `tags`. `name` is the serialized name; a name
    /// missing from the serialized value is validated as null.
    pub fn field(mut self, name: impl Into<String>, tags: impl Into<String>) -> Self {
        self.fields.push(FieldSpec::new(name, tags));
        self
    }

    /// Add a field holding `T`, a collection of `T` (with `dive`) or a map of `T`
    /// (with `dive,keys,...,endkeys`). `T`'s own schema is applied to each struct
    /// value reached after the dives.
    pub fn nested<T: Validate>(mut self, name: impl Into<String>, tags: impl Into<String>) -> Self {
        self.fields
            .push(FieldSpec::new(name, tags).with_nested(NestedSchema::of::<T>()));
        self
    }

    /// Add a map field whose keys serialize from integers. Key rules such as
    /// `gt` or `oneof` then see each key as a number instead of its text.
    pub fn integer_keyed(mut self, name: impl Into<String>, tags: impl Into<String>) -> Self {
        self.fields.push(FieldSpec::new(name, tags).with_numeric_keys());
        self
    }

    /// Add a prepared field spec
    pub fn add_field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Get field by name
    pub fn get_field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// One field of a schema
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: String,
    pub tags: String,
    pub nested: Option<NestedSchema>,
    /// Map keys are integers rendered as text by serialization
    pub numeric_keys: bool,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, tags: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tags: tags.into(),
            nested: None,
            numeric_keys: false,
        }
    }

    pub fn with_numeric_keys(mut self) -> Self {
        self.numeric_keys = true;
        self
    }

    pub fn with_nested(mut self, nested: NestedSchema) -> Self {
        self.nested = Some(nested);
        self
    }
}

/// Lazy reference to another type's schema, so recursive types work
#[derive(Clone, Copy)]
pub struct NestedSchema {
    type_id: TypeId,
    type_name: &'static str,
    build: fn() -> StructSchema,
}

impl NestedSchema {
    pub fn of<T: Validate>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            build: T::schema,
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn build(&self) -> StructSchema {
        (self.build)()
    }
}

impl std::fmt::Debug for NestedSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NestedSchema")
            .field("type_name", &self.type_name)
            .finish()
    }
}

/// A schema with every field's tags parsed against a registry
#[derive(Debug)]
pub(crate) struct CompiledSchema {
    pub name: String,
    pub fields: Vec<CompiledField>,
}

#[derive(Debug)]
pub(crate) struct CompiledField {
    pub name: String,
    pub tags: Arc<FieldTagSet>,
    pub nested: Option<NestedSchema>,
    pub numeric_keys: bool,
}
