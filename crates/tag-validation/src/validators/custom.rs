//! User-registered validation functions

use crate::error::ConfigError;
use crate::traits::FieldContext;
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

/// Signature of a custom rule: `true` when the value passes
pub type RuleFn = Arc<dyn Fn(&FieldContext<'_>) -> bool + Send + Sync>;

/// A named custom rule
#[derive(Clone)]
pub struct CustomRule {
    name: String,
    func: RuleFn,
}

impl CustomRule {
    /// Create a new custom rule from a closure or function
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&FieldContext<'_>) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    /// Get the rule name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the rule. A panic inside the function is reported as a
    /// configuration error instead of unwinding through the validator.
    pub fn check(&self, ctx: &FieldContext<'_>) -> Result<bool, ConfigError> {
        catch_unwind(AssertUnwindSafe(|| (self.func)(ctx))).map_err(|payload| {
            let message = panic_message(payload.as_ref());
            tracing::error!(
                rule = %self.name,
                field = %ctx.path(),
                "Custom validation rule panicked: {}",
                message
            );
            ConfigError::RulePanicked {
                rule: self.name.clone(),
                field: ctx.path().to_string(),
                message,
            }
        })
    }

    /// Failure message for the field in `ctx`
    pub fn message(&self, ctx: &FieldContext<'_>) -> String {
        format!("{} failed the '{}' rule", ctx.display_name(), self.name)
    }
}

impl std::fmt::Debug for CustomRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomRule")
            .field("name", &self.name)
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
