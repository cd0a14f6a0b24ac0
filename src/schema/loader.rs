//! Building descriptors from JSON schema definitions.
//!
//! A field definition is a JSON object with a `type` and any [`RuleSet`] keys:
//!
//! ```json
//! {
//!     "table": "contact",
//!     "fields": {
//!         "id":        { "type": "int", "primaryKey": true, "autoIncrement": true },
//!         "firstName": { "type": "string", "maxLength": 40 },
//!         "birthDate": { "type": "date" },
//!         "tags":      { "type": "array", "items": { "type": "string" } },
//!         "phones":    { "type": "array", "fields": { "number": { "type": "string" } } }
//!     }
//! }
//! ```
//!
//! Field order follows the document.

use super::rules::RuleSet;
use super::template::Template;
use super::types::{ArrayDescriptor, Descriptor, ObjectDescriptor};
use crate::error::{SchemaError, SchemaResult};
use log::debug;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// Name reported for the root of a definition.
const ROOT: &str = "$root";

impl Descriptor {
    /// Build a descriptor from a JSON field definition.
    pub fn from_json_str(content: &str) -> SchemaResult<Self> {
        let definition: Value = serde_json::from_str(content)?;
        Self::from_definition(&definition)
    }

    /// Build a descriptor from an already parsed field definition.
    pub fn from_definition(definition: &Value) -> SchemaResult<Self> {
        load_descriptor(ROOT, definition)
    }
}

impl Template {
    /// Load a template from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> SchemaResult<Self> {
        let content = fs::read_to_string(&path)?;
        debug!("Loading template from {}", path.as_ref().display());
        Self::from_json_str(&content)
    }

    /// Load a template from a JSON string.
    pub fn from_json_str(content: &str) -> SchemaResult<Self> {
        let definition: Value = serde_json::from_str(content)?;
        Self::from_definition(&definition)
    }

    /// Load a template from a parsed definition: an object with `fields` and
    /// optional rule keys such as `table`. A `type` key, if present, must be
    /// `object`.
    pub fn from_definition(definition: &Value) -> SchemaResult<Self> {
        match definition.get("type").and_then(Value::as_str) {
            None | Some("object") => {}
            Some(other) => {
                return Err(SchemaError::invalid_definition(
                    ROOT,
                    format!("template root must be an object, got '{}'", other),
                ));
            }
        }
        let object = load_object(ROOT, definition)?;
        debug!("Loaded template with {} field(s)", object.len());
        Ok(Self::new(object))
    }
}

fn load_descriptor(name: &str, definition: &Value) -> SchemaResult<Descriptor> {
    if !definition.is_object() {
        return Err(SchemaError::invalid_definition(
            name,
            "field definition must be a JSON object",
        ));
    }

    let type_name = definition
        .get("type")
        .ok_or_else(|| SchemaError::MissingType {
            field: name.to_string(),
        })?
        .as_str()
        .ok_or_else(|| SchemaError::invalid_definition(name, "'type' must be a string"))?;

    let descriptor = match type_name {
        "int" | "integer" => Descriptor::integer(load_rules(definition)?),
        "number" | "float" => Descriptor::number(load_rules(definition)?),
        "boolean" | "bool" => Descriptor::boolean(load_rules(definition)?),
        "string" => Descriptor::string(load_rules(definition)?),
        "date" => Descriptor::date(load_rules(definition)?),
        "object" => Descriptor::Object(load_object(name, definition)?),
        "array" => Descriptor::Array(load_array(name, definition)?),
        other => {
            return Err(SchemaError::UnknownType {
                field: name.to_string(),
                type_name: other.to_string(),
            });
        }
    };
    Ok(descriptor)
}

fn load_rules(definition: &Value) -> SchemaResult<RuleSet> {
    Ok(RuleSet::deserialize(definition)?)
}

fn load_fields(name: &str, fields: &Value) -> SchemaResult<Vec<(String, Descriptor)>> {
    let fields: &Map<String, Value> = fields
        .as_object()
        .ok_or_else(|| SchemaError::invalid_definition(name, "'fields' must be a JSON object"))?;

    fields
        .iter()
        .map(|(field, definition)| {
            let path = format!("{}.{}", name, field);
            load_descriptor(&path, definition).map(|descriptor| (field.clone(), descriptor))
        })
        .collect()
}

fn load_object(name: &str, definition: &Value) -> SchemaResult<ObjectDescriptor> {
    let fields = definition
        .get("fields")
        .ok_or_else(|| SchemaError::invalid_definition(name, "object needs 'fields'"))?;
    Ok(ObjectDescriptor::with_fields(
        load_fields(name, fields)?,
        load_rules(definition)?,
    ))
}

fn load_array(name: &str, definition: &Value) -> SchemaResult<ArrayDescriptor> {
    let rules = load_rules(definition)?;
    match (definition.get("items"), definition.get("fields")) {
        (Some(items), None) => {
            let element = load_descriptor(&format!("{}[]", name), items)?;
            Ok(ArrayDescriptor::new(element, rules))
        }
        (None, Some(fields)) => Ok(ArrayDescriptor::of_fields(load_fields(name, fields)?, rules)),
        (Some(_), Some(_)) => Err(SchemaError::invalid_definition(
            name,
            "array takes either 'items' or 'fields', not both",
        )),
        (None, None) => Err(SchemaError::invalid_definition(
            name,
            "array needs 'items' or 'fields'",
        )),
    }
}
