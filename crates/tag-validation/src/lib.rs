//! # tag-validation
//!
//! Declarative validation driven by tag strings such as `"required,min=5"`.
//! Single values, value pairs and structs with a declared schema are checked
//! against built-in rules, custom rules and aliases.

pub mod config;
pub mod error;
pub mod registry;
pub mod schema;
pub mod tags;
pub mod traits;
pub mod validator;
pub mod validators;
mod walker;

// Re-exports for easy access
pub use config::{ValidatorConfig, ValidatorConfigBuilder};
pub use error::{
    ConfigError, FieldTarget, ValidateError, ValidationError, ValidationErrors, ValidationResult,
};
pub use schema::{FieldSpec, NestedSchema, StructSchema};
pub use traits::{FieldContext, Validate};
pub use validator::Validator;
pub use validators::{BuiltinRule, CustomRule, RuleFn};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
