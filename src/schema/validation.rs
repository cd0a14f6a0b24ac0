//! Validation and coercion of instances against descriptor trees.
//!
//! Instances are checked in place: coerced values replace the raw ones as soon
//! as they are accepted. Object and array descriptors never stop at the first
//! failing child; they collect every failure into one [`ErrorTree`] so a single
//! pass reports all problems in the instance.

use super::scalar;
use super::rules::Rules;
use super::types::{ArrayDescriptor, CheckOptions, Descriptor, ObjectDescriptor};
use crate::error::{ErrorKind, ErrorTree, FieldKey, ValidationError, ValidationResult};
use log::{debug, trace};
use serde_json::Value;

/// Common entry checks for a present value.
///
/// Returns `false` when the value is an accepted null and nothing is left to
/// check.
fn admit(rules: &Rules, value: &Value) -> ValidationResult<bool> {
    rules.check_definition()?;
    if value.is_null() {
        if rules.accept_null() {
            return Ok(false);
        }
        return Err(ErrorKind::NullNotAllowed.into());
    }
    Ok(true)
}

fn absent(rules: &Rules) -> ValidationResult<Option<Value>> {
    rules.check_definition()?;
    rules.resolve_absent()
}

/// An empty or null hook result counts as success.
fn is_hook_failure(result: &Value) -> bool {
    match result {
        Value::Null => false,
        Value::String(text) => !text.is_empty(),
        _ => true,
    }
}

impl Descriptor {
    /// Check and coerce a present value in place.
    ///
    /// On success `value` holds the coerced form. On failure scalar values are
    /// left untouched; composite values keep whatever children were coerced
    /// before the failure was reported.
    pub fn check_type(&self, value: &mut Value) -> ValidationResult<()> {
        self.check_type_with(value, CheckOptions::default())
    }

    /// [`Descriptor::check_type`] with explicit options.
    pub fn check_type_with(&self, value: &mut Value, options: CheckOptions) -> ValidationResult<()> {
        match self {
            Self::Object(object) => object.check_type_with(value, options),
            Self::Array(array) => array.check_type_with(value, options),
            scalar_descriptor => {
                let rules = scalar_descriptor.rules();
                if !admit(rules, value)? {
                    return Ok(());
                }
                *value = scalar_descriptor.coerce_scalar(value)?;
                Ok(())
            }
        }
    }

    /// Resolve a value that was not provided at all.
    ///
    /// Returns the default when one is configured, `None` when the value
    /// should stay absent, or `Missing` when it is required.
    pub fn check_absent(&self) -> ValidationResult<Option<Value>> {
        absent(self.rules())
    }

    /// Value-in, value-out form of [`Descriptor::check_type`].
    ///
    /// ```rust
    /// use serde_json::json;
    /// use xjot::{Descriptor, RuleSet};
    ///
    /// let age = Descriptor::integer(RuleSet::new().min(0.0));
    /// assert_eq!(age.coerce(Some(json!("23"))).unwrap(), Some(json!(23)));
    /// assert_eq!(age.coerce(None).unwrap(), None);
    /// ```
    pub fn coerce(&self, value: Option<Value>) -> ValidationResult<Option<Value>> {
        match value {
            Some(mut value) => {
                self.check_type(&mut value)?;
                Ok(Some(value))
            }
            None => self.check_absent(),
        }
    }

    /// Check a value, returning the failure instead of propagating it.
    ///
    /// `None` means the value is valid.
    pub fn validate(&self, value: &mut Value) -> Option<ValidationError> {
        self.validate_with(value, CheckOptions::default())
    }

    pub fn validate_with(&self, value: &mut Value, options: CheckOptions) -> Option<ValidationError> {
        self.check_type_with(value, options).err()
    }

    fn coerce_scalar(&self, value: &Value) -> ValidationResult<Value> {
        match self {
            Self::Integer(rules) => scalar::coerce_integer(value, rules),
            Self::Number(rules) => scalar::coerce_number(value, rules),
            Self::Boolean(_) => scalar::coerce_boolean(value),
            Self::String(rules) => scalar::coerce_string(value, rules),
            Self::Date(_) => scalar::coerce_date(value),
            Self::Object(_) | Self::Array(_) => Err(ErrorKind::InvalidDefinition.into()),
        }
    }
}

impl ObjectDescriptor {
    pub fn check_type(&self, value: &mut Value) -> ValidationResult<()> {
        self.check_type_with(value, CheckOptions::default())
    }

    /// Check every declared field, coercing in place.
    ///
    /// Absent fields are only written back when `create_missing_fields` is
    /// set and the field resolves to a value. Undeclared fields are left
    /// alone. The hook runs only once every field has passed.
    pub fn check_type_with(&self, value: &mut Value, options: CheckOptions) -> ValidationResult<()> {
        if !admit(self.rules(), value)? {
            return Ok(());
        }
        let Some(object) = value.as_object_mut() else {
            return Err(ErrorKind::InvalidType.into());
        };

        let mut errors = ErrorTree::new();
        for (name, descriptor) in self.fields() {
            let outcome = match object.get_mut(name) {
                Some(field) => descriptor.check_type_with(field, options),
                None => descriptor.check_absent().map(|filled| {
                    if let Some(filled) = filled {
                        if options.create_missing_fields {
                            object.insert(name.to_string(), filled);
                        }
                    }
                }),
            };

            if let Err(error) = outcome {
                trace!("Field '{}' failed {} check: {}", name, descriptor.kind_name(), error);
                errors.insert(FieldKey::from(name), error);
            }
        }

        if !errors.is_empty() {
            debug!("Object validation found {} invalid field(s)", errors.len());
            return Err(ValidationError::Fields(errors));
        }

        if let Some(hook) = self.hook() {
            if let Some(result) = hook.call(object) {
                if is_hook_failure(&result) {
                    debug!("Object hook rejected instance: {}", result);
                    return Err(ValidationError::Custom(result));
                }
            }
        }

        Ok(())
    }

    pub fn check_absent(&self) -> ValidationResult<Option<Value>> {
        absent(self.rules())
    }

    pub fn validate(&self, value: &mut Value) -> Option<ValidationError> {
        self.validate_with(value, CheckOptions::default())
    }

    pub fn validate_with(&self, value: &mut Value, options: CheckOptions) -> Option<ValidationError> {
        self.check_type_with(value, options).err()
    }
}

impl ArrayDescriptor {
    pub fn check_type(&self, value: &mut Value) -> ValidationResult<()> {
        self.check_type_with(value, CheckOptions::default())
    }

    /// Check the length bounds, then every element in place.
    ///
    /// Length failures are reported on their own; element failures are keyed
    /// by index.
    pub fn check_type_with(&self, value: &mut Value, options: CheckOptions) -> ValidationResult<()> {
        let rules = self.rules();
        if !admit(rules, value)? {
            return Ok(());
        }
        let Some(items) = value.as_array_mut() else {
            return Err(ErrorKind::InvalidType.into());
        };

        if rules.min_length().is_some_and(|min| items.len() < min) {
            return Err(ErrorKind::ArrayTooSmall.into());
        }
        if rules.length_limit().is_some_and(|max| items.len() > max) {
            return Err(ErrorKind::ArrayTooLarge.into());
        }

        let element = self.element();
        let mut errors = ErrorTree::new();
        for (index, item) in items.iter_mut().enumerate() {
            if let Err(error) = element.check_type_with(item, options) {
                trace!("Element {} failed {} check: {}", index, element.kind_name(), error);
                errors.insert(FieldKey::Index(index), error);
            }
        }

        if !errors.is_empty() {
            debug!(
                "Array validation found {} invalid element(s) out of {}",
                errors.len(),
                items.len()
            );
            return Err(ValidationError::Fields(errors));
        }
        Ok(())
    }

    pub fn check_absent(&self) -> ValidationResult<Option<Value>> {
        absent(self.rules())
    }

    pub fn validate(&self, value: &mut Value) -> Option<ValidationError> {
        self.validate_with(value, CheckOptions::default())
    }

    pub fn validate_with(&self, value: &mut Value, options: CheckOptions) -> Option<ValidationError> {
        self.check_type_with(value, options).err()
    }
}
