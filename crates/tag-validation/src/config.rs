//! Validator configuration types and builders

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use service_builder::builder;
use std::collections::BTreeMap;

/// Evaluation policy and predefined aliases for a [`crate::Validator`]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
#[builder]
pub struct ValidatorConfig {
    /// Stop checking a field once its `required` rule fails
    #[builder(default = "true", getter)]
    pub required_short_circuit: bool,

    /// Record at most one failure per field, element or map key
    #[builder(default = "false", getter)]
    pub first_error_per_field: bool,

    /// Maximum nesting of alias expansions
    #[builder(default = "16", getter)]
    pub max_alias_depth: usize,

    /// Aliases registered when the validator is created
    #[builder(default)]
    pub aliases: BTreeMap<String, String>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            required_short_circuit: true,
            first_error_per_field: false,
            max_alias_depth: 16,
            aliases: BTreeMap::new(),
        }
    }
}

impl ValidatorConfig {
    /// Load configuration from YAML
    pub fn from_yaml(source: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(source)?)
    }

    /// Load configuration from JSON
    pub fn from_json(source: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(source)?)
    }
}

impl ValidatorConfigBuilder {
    /// Report only the first failure of each field, like most tag validators do
    pub fn first_error() -> Self {
        ValidatorConfigBuilder::new()
            .required_short_circuit(true)
            .first_error_per_field(true)
    }

    /// Keep evaluating every rule, even after `required` fails
    pub fn report_all() -> Self {
        ValidatorConfigBuilder::new()
            .required_short_circuit(false)
            .first_error_per_field(false)
    }

    /// Add an alias
    pub fn add_alias(self, name: impl Into<String>, expansion: impl Into<String>) -> Self {
        let mut aliases = self.aliases.clone().unwrap_or_default();
        aliases.insert(name.into(), expansion.into());
        self.aliases(aliases)
    }
}
