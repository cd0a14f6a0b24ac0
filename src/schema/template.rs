//! Schema entry point for record-shaped data.
//!
//! A [`Template`] is an object descriptor with a name for its backing table.
//! The table name and the per-field `dbField`, `primaryKey` and
//! `autoIncrement` attributes are exposed for persistence layers; validation
//! itself ignores them.

use super::rules::{RuleSet, Rules};
use super::types::{CheckOptions, Descriptor, ObjectDescriptor};
use crate::error::{ValidationError, ValidationResult};
use serde_json::Value;

/// Root schema for a record.
#[derive(Debug, Clone)]
pub struct Template {
    root: ObjectDescriptor,
}

impl Template {
    pub fn new(root: ObjectDescriptor) -> Self {
        Self { root }
    }

    /// Build a template from an ordered field list.
    ///
    /// ```rust
    /// use serde_json::json;
    /// use xjot::{Descriptor, RuleSet, Template};
    ///
    /// let contact = Template::from_fields(
    ///     [
    ///         ("id", Descriptor::integer(RuleSet::new().primary_key(true).auto_increment(true))),
    ///         ("firstName", Descriptor::string(RuleSet::new())),
    ///     ],
    ///     RuleSet::new().table("contact"),
    /// );
    ///
    /// let mut person = json!({ "id": "23", "firstName": "John" });
    /// assert!(contact.validate(&mut person).is_none());
    /// assert_eq!(person["id"], json!(23));
    /// assert_eq!(contact.table(), Some("contact"));
    /// ```
    pub fn from_fields<I, S>(fields: I, rules: RuleSet) -> Self
    where
        I: IntoIterator<Item = (S, Descriptor)>,
        S: Into<String>,
    {
        Self::new(ObjectDescriptor::with_fields(fields, rules))
    }

    /// Table the record maps to, if declared.
    pub fn table(&self) -> Option<&str> {
        self.root.rules().table()
    }

    pub fn rules(&self) -> &Rules {
        self.root.rules()
    }

    pub fn root(&self) -> &ObjectDescriptor {
        &self.root
    }

    /// Declared fields in schema order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Descriptor)> {
        self.root.fields()
    }

    pub fn field(&self, name: &str) -> Option<&Descriptor> {
        self.root.get(name)
    }

    /// Fields flagged as primary key, in schema order.
    pub fn primary_key_fields(&self) -> impl Iterator<Item = &str> {
        self.fields()
            .filter(|(_, descriptor)| descriptor.rules().primary_key() == Some(true))
            .map(|(name, _)| name)
    }

    pub fn check_type(&self, instance: &mut Value) -> ValidationResult<()> {
        self.root.check_type(instance)
    }

    pub fn check_type_with(&self, instance: &mut Value, options: CheckOptions) -> ValidationResult<()> {
        self.root.check_type_with(instance, options)
    }

    /// Validate a record, returning the error tree instead of failing.
    pub fn validate(&self, instance: &mut Value) -> Option<ValidationError> {
        self.root.validate(instance)
    }

    pub fn validate_with(&self, instance: &mut Value, options: CheckOptions) -> Option<ValidationError> {
        self.root.validate_with(instance, options)
    }
}

impl From<ObjectDescriptor> for Template {
    fn from(root: ObjectDescriptor) -> Self {
        Self::new(root)
    }
}

impl From<Template> for Descriptor {
    fn from(template: Template) -> Self {
        Descriptor::Object(template.root)
    }
}
