//! Validation demo: single values, structs, collections, maps and custom rules

use serde::Serialize;
use std::collections::BTreeMap;
use tag_validation::{FieldContext, StructSchema, Validate, ValidateError, Validator};

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct Address {
    street: String,
    city: String,
}

impl Validate for Address {
    fn schema() -> StructSchema {
        StructSchema::new("Address")
            .field("Street", "required")
            .field("City", "required")
    }
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct Person {
    username: String,
    email: String,
    addresses: Vec<Address>,
    hobbies: Vec<String>,
    scores: BTreeMap<String, i64>,
}

impl Validate for Person {
    fn schema() -> StructSchema {
        StructSchema::new("Person")
            .field("Username", "required,username")
            .field("Email", "required,email")
            .nested::<Address>("Addresses", "required,dive")
            .field("Hobbies", "required,dive,required,varchar")
            .field("Scores", "dive,keys,required,alpha,endkeys,gt=100")
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("🦀 tag-validation Demo");
    println!("======================\n");

    let mut validator = Validator::new();
    validator.register_alias("varchar", "min=4")?;
    validator.register_rule("username", |ctx: &FieldContext<'_>| {
        ctx.as_str()
            .map(|s| s == s.to_uppercase() && s.chars().count() >= 5)
            .unwrap_or(true)
    })?;

    demo_values(&validator)?;
    demo_structs(&validator)?;

    println!("✅ All validation demos completed successfully!");
    Ok(())
}

fn demo_values(validator: &Validator) -> Result<(), Box<dyn std::error::Error>> {
    println!("📝 Demo 1: Single values");
    println!("------------------------");

    for (value, tags) in [
        ("", "required"),
        ("12423", "required,numeric"),
        ("1213", "required,numeric,min=5,max=20"),
        ("user@example.com", "email|numeric"),
    ] {
        report(&format!("{:?} against '{}'", value, tags), validator.validate_value(value, tags))?;
    }

    report(
        "\"secret\" eqfield \"notsame\"",
        validator.validate_value_pair("secret", "notsame", "eqfield"),
    )?;
    println!();
    Ok(())
}

fn demo_structs(validator: &Validator) -> Result<(), Box<dyn std::error::Error>> {
    println!("🏗️ Demo 2: Structs, collections and maps");
    println!("----------------------------------------");

    let person = Person {
        username: "joeybloggs".to_string(),
        email: "joey.bloggs".to_string(),
        addresses: vec![
            Address {
                street: "Jln Djuanda".to_string(),
                city: "Jakarta Selatan".to_string(),
            },
            Address {
                street: String::new(),
                city: "Jakarta Pusat".to_string(),
            },
        ],
        hobbies: vec!["reading".to_string(), "go".to_string()],
        scores: [("math".to_string(), 140), ("art1".to_string(), 90)]
            .into_iter()
            .collect(),
    };

    let result = validator.validate_struct(&person);
    if let Err(ValidateError::Failed(errors)) = &result {
        println!("{}", serde_json::to_string_pretty(&errors.to_json())?);
    }
    report("Person", result)?;
    println!();
    Ok(())
}

/// Print the outcome; configuration errors abort the demo
fn report(label: &str, result: Result<(), ValidateError>) -> Result<(), ValidateError> {
    match result {
        Ok(()) => println!("  ✅ {} is valid", label),
        Err(ValidateError::Failed(errors)) => {
            println!("  ❌ {}:", label);
            for error in &errors {
                println!("     - {}", error);
            }
        }
        Err(err) => return Err(err),
    }
    Ok(())
}
