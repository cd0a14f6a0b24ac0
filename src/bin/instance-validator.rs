//! # Instance Validator
//!
//! A command-line utility that checks a JSON instance against a JSON template
//! definition, printing the coerced instance and every validation failure.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin instance-validator contact.schema.json person.json
//! cargo run --bin instance-validator contact.schema.json people.json --create-missing
//! ```
//!
//! An instance file holding a JSON array is validated element by element.
//!
//! ## Output Examples
//!
//! ### Successful Validation
//!
//! ```text
//! Loaded template: contact (7 fields)
//! Validating instance: person.json
//! ✓ Instance is valid!
//!
//! Coerced instance:
//! {
//!   "id": 23,
//!   "firstName": "John",
//!   "birthDate": "1997-11-18T00:00:00.000Z"
//! }
//! ```
//!
//! ### Failed Validation
//!
//! ```text
//! Validating instance: person.json
//! ❌ Instance validation failed: 1 invalid value(s): {age: Invalid type}
//!
//! Errors:
//! {
//!   "age": "Invalid type"
//! }
//! ```
//!
//! ## Exit Codes
//!
//! - `0`: The instance is valid
//! - `1`: Validation failed, or the schema/instance could not be loaded

use serde_json::Value;
use std::env;
use std::fs;
use std::path::Path;
use std::process;
use xjot::{CheckOptions, Template, ValidationError};

fn main() {
    let args: Vec<String> = env::args().collect();
    let create_missing = args.iter().any(|arg| arg == "--create-missing");
    let paths: Vec<&String> = args
        .iter()
        .skip(1)
        .filter(|arg| !arg.starts_with("--"))
        .collect();

    if paths.len() != 2 {
        eprintln!(
            "Usage: {} <schema.json> <instance.json> [--create-missing]",
            args[0]
        );
        eprintln!();
        eprintln!("Examples:");
        eprintln!("  {} contact.schema.json person.json", args[0]);
        eprintln!("  {} contact.schema.json people.json --create-missing", args[0]);
        process::exit(1);
    }

    let template = match Template::from_file(paths[0]) {
        Ok(template) => template,
        Err(e) => {
            eprintln!("❌ Failed to load template: {}", e);
            process::exit(1);
        }
    };
    print_template_summary(&template);

    let options = CheckOptions::new().create_missing_fields(create_missing);
    match validate_instance_file(&template, Path::new(paths[1]), options) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("❌ Failed to read instance: {}", e);
            process::exit(1);
        }
    }
}

fn validate_instance_file(
    template: &Template,
    path: &Path,
    options: CheckOptions,
) -> Result<bool, Box<dyn std::error::Error>> {
    println!("Validating instance: {}", path.display());

    let content = fs::read_to_string(path)?;
    let mut instance: Value = serde_json::from_str(&content)?;

    let outcome = match &mut instance {
        Value::Array(records) => {
            let mut invalid = 0;
            for (index, record) in records.iter_mut().enumerate() {
                if let Some(error) = template.validate_with(record, options) {
                    report_failure(&format!("Record {}", index), &error)?;
                    invalid += 1;
                }
            }
            println!("\nValidation Summary:");
            println!("  Valid records: {}", records.len() - invalid);
            println!("  Invalid records: {}", invalid);
            invalid == 0
        }
        record => match template.validate_with(record, options) {
            Some(error) => {
                report_failure("Instance", &error)?;
                false
            }
            None => {
                println!("✓ Instance is valid!");
                true
            }
        },
    };

    println!("\nCoerced instance:");
    println!("{}", serde_json::to_string_pretty(&instance)?);
    Ok(outcome)
}

fn report_failure(context: &str, error: &ValidationError) -> Result<(), serde_json::Error> {
    eprintln!("❌ {} validation failed: {}", context, error);
    println!("\nErrors:");
    println!("{}", serde_json::to_string_pretty(error)?);
    Ok(())
}

fn print_template_summary(template: &Template) {
    let fields: Vec<_> = template.fields().collect();
    println!(
        "Loaded template: {} ({} fields)",
        template.table().unwrap_or("<no table>"),
        fields.len()
    );

    let required: Vec<&str> = fields
        .iter()
        .filter(|(_, descriptor)| descriptor.rules().required())
        .map(|(name, _)| *name)
        .collect();
    if !required.is_empty() {
        println!("  Required fields: {}", required.join(", "));
    }

    let keys: Vec<&str> = template.primary_key_fields().collect();
    if !keys.is_empty() {
        println!("  Primary key: {}", keys.join(", "));
    }
}
