//! Integration tests for custom rules, aliases, configuration and shared use

use std::sync::Arc;
use std::thread;

use serde::Serialize;
use tag_validation::{
    ConfigError, FieldContext, StructSchema, Validate, ValidateError, ValidationErrors, Validator,
    ValidatorConfig, ValidatorConfigBuilder,
};

fn failures(result: Result<(), ValidateError>) -> ValidationErrors {
    match result {
        Err(ValidateError::Failed(errors)) => errors,
        Err(other) => panic!("expected validation failures, got {}", other),
        Ok(()) => panic!("expected validation failures, got Ok"),
    }
}

/// Uppercase and at least five characters; non-strings pass
fn must_be_username(ctx: &FieldContext<'_>) -> bool {
    match ctx.as_str() {
        Some(value) => value == value.to_uppercase() && value.chars().count() >= 5,
        None => true,
    }
}

/// Digits only, exactly as many as the parameter says
fn must_be_pin(ctx: &FieldContext<'_>) -> bool {
    let len: usize = ctx
        .param()
        .unwrap_or_default()
        .parse()
        .expect("pin length must be an integer");
    let value = ctx.as_str().unwrap_or_default();
    value.chars().all(|c| c.is_ascii_digit()) && value.len() == len
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct Profile {
    id: String,
    name: String,
    email: String,
}

impl Validate for Profile {
    fn schema() -> StructSchema {
        StructSchema::new("Profile")
            .field("Id", "varchar")
            .field("Name", "varchar")
            .field("Email", "varchar")
    }
}

fn profile(id: &str, name: &str, email: &str) -> Profile {
    Profile {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
    }
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct User {
    username: String,
    password: String,
}

impl Validate for User {
    fn schema() -> StructSchema {
        StructSchema::new("User")
            .field("Username", "username")
            .field("Password", "required")
    }
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct PinForm {
    pin: String,
    username: String,
}

impl Validate for PinForm {
    fn schema() -> StructSchema {
        StructSchema::new("PinForm")
            .field("Pin", "pin=5")
            .field("Username", "required")
    }
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct BrokenPinForm {
    pin: String,
}

impl Validate for BrokenPinForm {
    fn schema() -> StructSchema {
        StructSchema::new("BrokenPinForm").field("Pin", "pin=five")
    }
}

#[test]
fn test_alias_expands_on_struct_fields() {
    let mut validator = Validator::new();
    validator.register_alias("varchar", "min=5").unwrap();

    assert!(validator
        .validate_struct(&profile("dsasdff", "iasdfsd", "fifaowefj"))
        .is_ok());

    let errors = failures(validator.validate_struct(&profile("dsaf", "iasd", "fifaowefj")));
    assert_eq!(errors.len(), 2);
    assert!(errors.has_field_errors("Profile.Id"));
    assert!(errors.has_field_errors("Profile.Name"));

    let error = &errors.errors()[0];
    assert_eq!(error.rule, "min");
    assert_eq!(error.tag, "varchar");
    assert_eq!(error.param, "5");
}

#[test]
fn test_alias_of_aliases_and_cycles() {
    let mut validator = Validator::new();
    validator.register_alias("short", "min=2,max=4").unwrap();
    validator.register_alias("code", "required,short").unwrap();

    assert!(validator.validate_value("abc", "code").is_ok());
    let errors = failures(validator.validate_value("abcdef", "code"));
    assert_eq!(errors.errors()[0].rule, "max");
    assert_eq!(errors.errors()[0].tag, "code");

    validator.register_alias("ping", "pong").unwrap();
    validator.register_alias("pong", "ping").unwrap();
    let err = validator.validate_value("x", "ping").unwrap_err();
    match err.config_error() {
        Some(ConfigError::AliasCycle { chain }) => assert_eq!(chain, "ping -> pong -> ping"),
        other => panic!("expected an alias cycle, got {:?}", other),
    }
}

#[test]
fn test_custom_rule_function() {
    let mut validator = Validator::new();
    validator.register_rule("username", must_be_username).unwrap();

    let valid = User {
        username: "DJFSD".to_string(),
        password: "faweijwa".to_string(),
    };
    assert!(validator.validate_struct(&valid).is_ok());

    let invalid = User {
        username: "asfasSDF".to_string(),
        password: "faweijwa".to_string(),
    };
    let errors = failures(validator.validate_struct(&invalid));
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.errors()[0].path, "User.Username");
    assert_eq!(errors.errors()[0].message, "Username failed the 'username' rule");
}

#[test]
fn test_custom_rule_with_parameter() {
    let mut validator = Validator::new();
    validator.register_rule("pin", must_be_pin).unwrap();

    let form = |pin: &str| PinForm {
        pin: pin.to_string(),
        username: "asdfasd".to_string(),
    };
    assert!(validator.validate_struct(&form("32423")).is_ok());

    let errors = failures(validator.validate_struct(&form("3243")));
    assert_eq!(errors.errors()[0].rule, "pin");
    assert_eq!(errors.errors()[0].param, "5");

    assert!(validator.validate_struct(&form("32a23")).is_err());
}

#[test]
fn test_custom_rule_panic_becomes_config_error() {
    let mut validator = Validator::new();
    validator.register_rule("pin", must_be_pin).unwrap();

    let err = validator
        .validate_struct(&BrokenPinForm {
            pin: "12345".to_string(),
        })
        .unwrap_err();

    match err.config_error() {
        Some(ConfigError::RulePanicked { rule, field, message }) => {
            assert_eq!(rule, "pin");
            assert_eq!(field, "BrokenPinForm.Pin");
            assert!(message.contains("pin length must be an integer"));
        }
        other => panic!("expected a rule panic, got {:?}", other),
    }

    // The validator stays usable after a rule panicked
    assert!(validator.validate_value("12345", "pin=5").is_ok());
}

#[test]
fn test_custom_rule_reads_parent() {
    let mut validator = Validator::new();
    validator
        .register_rule("after_start", |ctx: &FieldContext<'_>| {
            let start = ctx.sibling("Start").and_then(|v| v.as_i64());
            match (start, ctx.value().as_i64()) {
                (Some(start), Some(end)) => end > start,
                _ => false,
            }
        })
        .unwrap();

    let schema = StructSchema::new("Range")
        .field("Start", "required")
        .field("End", "required,after_start");

    let value = serde_json::json!({ "Start": 5, "End": 9 });
    assert!(validator.validate_json(&value, &schema).is_ok());

    let value = serde_json::json!({ "Start": 5, "End": 2 });
    let errors = failures(validator.validate_json(&value, &schema));
    assert_eq!(errors.errors()[0].path, "Range.End");
}

#[test]
fn test_duplicate_registration_rejected() {
    let mut validator = Validator::new();
    validator.register_rule("username", must_be_username).unwrap();

    assert!(matches!(
        validator.register_rule("username", must_be_username),
        Err(ConfigError::DuplicateRule { .. })
    ));
    assert!(matches!(
        validator.register_rule("email", must_be_username),
        Err(ConfigError::DuplicateRule { .. })
    ));
    assert!(validator.register_alias("username", "min=5").is_err());
    assert!(validator.register_alias("dive", "min=5").is_err());
}

#[test]
fn test_override_builtin_rule() {
    let mut validator = Validator::new();
    assert!(validator.validate_value("not-an-email", "email").is_err());

    validator
        .register_rule_override("email", |ctx: &FieldContext<'_>| {
            ctx.as_str().map(|s| s.contains('@') || s.contains('-')).unwrap_or(false)
        })
        .unwrap();
    assert!(validator.validate_value("not-an-email", "email").is_ok());
}

#[test]
fn test_required_short_circuit_policy() {
    let validator = Validator::new();
    let errors = failures(validator.validate_value("", "required,min=3"));
    assert_eq!(errors.len(), 1);

    let config = ValidatorConfigBuilder::report_all()
        .build()
        .expect("Failed to build config");
    let validator = Validator::with_config(config).unwrap();
    let errors = failures(validator.validate_value("", "required,min=3"));
    let rules: Vec<&str> = errors.iter().map(|e| e.rule.as_str()).collect();
    assert_eq!(rules, vec!["required", "min"]);
}

#[test]
fn test_first_error_per_field_policy() {
    let validator = Validator::new();
    let errors = failures(validator.validate_value("ab", "min=3,numeric"));
    assert_eq!(errors.len(), 2);

    let config = ValidatorConfigBuilder::first_error()
        .build()
        .expect("Failed to build config");
    let validator = Validator::with_config(config).unwrap();
    let errors = failures(validator.validate_value("ab", "min=3,numeric"));
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.errors()[0].rule, "min");
}

#[test]
fn test_config_from_yaml() {
    let config = ValidatorConfig::from_yaml(
        "max_alias_depth: 1\naliases:\n  varchar: min=5\n  title: required,varchar\n",
    )
    .unwrap();
    let validator = Validator::with_config(config).unwrap();

    assert!(validator.validate_value("abcdef", "varchar").is_ok());
    // `title` needs two levels of expansion
    let err = validator.validate_value("abcdef", "title").unwrap_err();
    assert!(matches!(err.config_error(), Some(ConfigError::MalformedTag { .. })));
}

#[test]
fn test_shared_validator_across_threads() {
    let mut validator = Validator::new();
    validator.register_alias("varchar", "min=5").unwrap();
    validator.register_rule("username", must_be_username).unwrap();
    let validator = Arc::new(validator);

    thread::scope(|scope| {
        for i in 0..8 {
            let validator = Arc::clone(&validator);
            scope.spawn(move || {
                for _ in 0..50 {
                    assert!(validator
                        .validate_struct(&profile("dsasdff", "iasdfsd", "fifaowefj"))
                        .is_ok());

                    let user = User {
                        username: if i % 2 == 0 { "DJFSD" } else { "lower" }.to_string(),
                        password: "secret".to_string(),
                    };
                    assert_eq!(validator.validate_struct(&user).is_ok(), i % 2 == 0);
                }
            });
        }
    });
}
