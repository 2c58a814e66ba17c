//! Rule and alias registry

use crate::error::ConfigError;
use crate::tags::DIRECTIVES;
use crate::traits::FieldContext;
use crate::validators::{BuiltinRule, CustomRule};
use std::collections::HashMap;

/// A resolved rule, ready to evaluate
#[derive(Debug, Clone)]
pub enum Rule {
    Builtin(BuiltinRule),
    Custom(CustomRule),
}

impl Rule {
    pub fn check(&self, ctx: &FieldContext<'_>) -> Result<bool, ConfigError> {
        match self {
            Self::Builtin(rule) => rule.check(ctx),
            Self::Custom(rule) => rule.check(ctx),
        }
    }

    pub fn message(&self, ctx: &FieldContext<'_>) -> String {
        match self {
            Self::Builtin(rule) => rule.message(ctx),
            Self::Custom(rule) => rule.message(ctx),
        }
    }

    pub fn is_required(&self) -> bool {
        matches!(self, Self::Builtin(BuiltinRule::Required))
    }
}

/// Custom rules and aliases layered over the built-in rule set
#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    custom: HashMap<String, CustomRule>,
    aliases: HashMap<String, String>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a custom rule. Fails if the name is taken by a built-in,
    /// a directive, an alias or another custom rule.
    pub fn register(&mut self, rule: CustomRule) -> Result<(), ConfigError> {
        let name = rule.name();
        check_name(name)?;
        if BuiltinRule::is_builtin(name) || self.custom.contains_key(name) || self.aliases.contains_key(name) {
            return Err(ConfigError::DuplicateRule {
                name: name.to_string(),
            });
        }

        tracing::debug!("Registering validation rule: {}", name);
        self.custom.insert(name.to_string(), rule);
        Ok(())
    }

    /// Register a custom rule, replacing any built-in or custom rule of the same name
    pub fn register_override(&mut self, rule: CustomRule) -> Result<(), ConfigError> {
        let name = rule.name();
        check_name(name)?;
        if self.aliases.contains_key(name) {
            return Err(ConfigError::DuplicateRule {
                name: name.to_string(),
            });
        }
        if BuiltinRule::is_builtin(name) || self.custom.contains_key(name) {
            tracing::warn!("Overriding validation rule: {}", name);
        }

        self.custom.insert(name.to_string(), rule);
        Ok(())
    }

    /// Register an alias expanding to `expansion`. Cycles are detected at parse time.
    pub fn register_alias(
        &mut self,
        name: impl Into<String>,
        expansion: impl Into<String>,
    ) -> Result<(), ConfigError> {
        let name = name.into();
        let expansion = expansion.into();
        check_name(&name)?;
        if BuiltinRule::is_builtin(&name) || self.custom.contains_key(&name) {
            return Err(ConfigError::DuplicateRule { name });
        }
        if expansion.is_empty() {
            return Err(ConfigError::malformed(&name, "alias expansion is empty"));
        }

        tracing::debug!("Registering validation alias: {} => {}", name, expansion);
        self.aliases.insert(name, expansion);
        Ok(())
    }

    /// Expansion of an alias
    pub fn alias(&self, name: &str) -> Option<&str> {
        self.aliases.get(name).map(String::as_str)
    }

    /// Check if a rule name resolves, built-in or custom
    pub fn has_rule(&self, name: &str) -> bool {
        self.custom.contains_key(name) || BuiltinRule::is_builtin(name)
    }

    /// Resolve a rule name with its parameter. Custom rules shadow built-ins.
    pub fn resolve(&self, name: &str, param: Option<&str>, tag: &str) -> Result<Rule, ConfigError> {
        if let Some(custom) = self.custom.get(name) {
            return Ok(Rule::Custom(custom.clone()));
        }

        match BuiltinRule::from_tag(name, param) {
            Some(rule) => rule.map(Rule::Builtin),
            None => Err(ConfigError::UnknownRule {
                rule: name.to_string(),
                tag: tag.to_string(),
            }),
        }
    }

    pub fn custom_rule_count(&self) -> usize {
        self.custom.len()
    }

    pub fn alias_count(&self) -> usize {
        self.aliases.len()
    }
}

fn check_name(name: &str) -> Result<(), ConfigError> {
    if name.is_empty() || name.contains([',', '|', '=']) || name.chars().any(char::is_whitespace) {
        return Err(ConfigError::malformed(name, "rule names cannot be empty or contain ',', '|', '=' or whitespace"));
    }
    if DIRECTIVES.contains(&name) {
        return Err(ConfigError::malformed(name, "name is reserved for a tag directive"));
    }
    Ok(())
}
