//! Descriptor configuration and its normalization.
//!
//! A [`RuleSet`] is the partial configuration an author writes, either through
//! the builder methods or as the JSON keys of a schema definition. Every
//! descriptor normalizes it once into an immutable [`Rules`] value; nothing
//! downstream ever sees or mutates the partial form.

use crate::error::{ErrorKind, ValidationResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Partial descriptor configuration.
///
/// Unset entries take their defaults on [`RuleSet::normalize`]. Not every key
/// applies to every descriptor kind; keys a kind does not use are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RuleSet {
    pub required: Option<bool>,
    pub accept_null: Option<bool>,
    /// Value returned for an absent, optional field
    #[serde(rename = "default")]
    pub default_value: Option<Value>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// Enumerated string values
    pub values: Option<Vec<String>>,
    /// String length (characters) or array length; 0 means unlimited
    pub max_length: Option<usize>,
    pub min_length: Option<usize>,
    pub auto_truncate: Option<bool>,
    pub auto_trim_spaces: Option<bool>,

    // Persistence attributes, carried but never interpreted here
    pub db_field: Option<String>,
    pub primary_key: Option<bool>,
    pub auto_increment: Option<bool>,
    pub table: Option<String>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    pub fn accept_null(mut self, accept_null: bool) -> Self {
        self.accept_null = Some(accept_null);
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    pub fn min_length(mut self, min_length: usize) -> Self {
        self.min_length = Some(min_length);
        self
    }

    pub fn auto_truncate(mut self, auto_truncate: bool) -> Self {
        self.auto_truncate = Some(auto_truncate);
        self
    }

    pub fn auto_trim_spaces(mut self, auto_trim_spaces: bool) -> Self {
        self.auto_trim_spaces = Some(auto_trim_spaces);
        self
    }

    pub fn db_field(mut self, db_field: impl Into<String>) -> Self {
        self.db_field = Some(db_field.into());
        self
    }

    pub fn primary_key(mut self, primary_key: bool) -> Self {
        self.primary_key = Some(primary_key);
        self
    }

    pub fn auto_increment(mut self, auto_increment: bool) -> Self {
        self.auto_increment = Some(auto_increment);
        self
    }

    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Produce the immutable configuration with defaults applied.
    ///
    /// `required` and `acceptNull` default to `false`, `autoTruncate` to
    /// `true`, `autoTrimSpaces` to `false`; bounds stay unset.
    pub fn normalize(&self) -> Rules {
        Rules {
            required: self.required.unwrap_or(false),
            accept_null: self.accept_null.unwrap_or(false),
            default_value: self.default_value.clone(),
            min: self.min,
            max: self.max,
            values: self.values.clone(),
            max_length: self.max_length,
            min_length: self.min_length,
            auto_truncate: self.auto_truncate.unwrap_or(true),
            auto_trim_spaces: self.auto_trim_spaces.unwrap_or(false),
            db_field: self.db_field.clone(),
            primary_key: self.primary_key,
            auto_increment: self.auto_increment,
            table: self.table.clone(),
        }
    }
}

impl From<&Rules> for RuleSet {
    fn from(rules: &Rules) -> Self {
        Self {
            required: Some(rules.required),
            accept_null: Some(rules.accept_null),
            default_value: rules.default_value.clone(),
            min: rules.min,
            max: rules.max,
            values: rules.values.clone(),
            max_length: rules.max_length,
            min_length: rules.min_length,
            auto_truncate: Some(rules.auto_truncate),
            auto_trim_spaces: Some(rules.auto_trim_spaces),
            db_field: rules.db_field.clone(),
            primary_key: rules.primary_key,
            auto_increment: rules.auto_increment,
            table: rules.table.clone(),
        }
    }
}

/// Normalized, immutable descriptor configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Rules {
    required: bool,
    accept_null: bool,
    default_value: Option<Value>,
    min: Option<f64>,
    max: Option<f64>,
    values: Option<Vec<String>>,
    max_length: Option<usize>,
    min_length: Option<usize>,
    auto_truncate: bool,
    auto_trim_spaces: bool,
    db_field: Option<String>,
    primary_key: Option<bool>,
    auto_increment: Option<bool>,
    table: Option<String>,
}

impl Default for Rules {
    fn default() -> Self {
        RuleSet::default().normalize()
    }
}

impl Rules {
    pub fn required(&self) -> bool {
        self.required
    }

    pub fn accept_null(&self) -> bool {
        self.accept_null
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default_value.as_ref()
    }

    pub fn min(&self) -> Option<f64> {
        self.min
    }

    pub fn max(&self) -> Option<f64> {
        self.max
    }

    pub fn values(&self) -> Option<&[String]> {
        self.values.as_deref()
    }

    pub fn max_length(&self) -> Option<usize> {
        self.max_length
    }

    pub fn min_length(&self) -> Option<usize> {
        self.min_length
    }

    /// Effective `max_length`: unset and 0 both mean unlimited.
    pub fn length_limit(&self) -> Option<usize> {
        self.max_length.filter(|max| *max > 0)
    }

    pub fn auto_truncate(&self) -> bool {
        self.auto_truncate
    }

    pub fn auto_trim_spaces(&self) -> bool {
        self.auto_trim_spaces
    }

    /// Column name used by persistence layers, if different from the field name
    pub fn db_field(&self) -> Option<&str> {
        self.db_field.as_deref()
    }

    pub fn primary_key(&self) -> Option<bool> {
        self.primary_key
    }

    pub fn auto_increment(&self) -> Option<bool> {
        self.auto_increment
    }

    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    /// Reject configurations that no value could ever satisfy.
    pub fn check_definition(&self) -> ValidationResult<()> {
        let nan_bound = self.min.is_some_and(f64::is_nan) || self.max.is_some_and(f64::is_nan);
        let inverted_bounds = matches!((self.min, self.max), (Some(min), Some(max)) if min > max);
        let inverted_lengths =
            matches!((self.min_length, self.length_limit()), (Some(min), Some(max)) if min > max);
        let empty_values = self.values.as_ref().is_some_and(Vec::is_empty);

        if nan_bound || inverted_bounds || inverted_lengths || empty_values {
            return Err(ErrorKind::InvalidDefinition.into());
        }
        Ok(())
    }

    /// Check a numeric value against the optional `[min, max]` bounds.
    pub(crate) fn check_range(&self, value: f64) -> ValidationResult<()> {
        if self.min.is_some_and(|min| value < min) || self.max.is_some_and(|max| value > max) {
            return Err(ErrorKind::OutOfRange.into());
        }
        Ok(())
    }

    /// Resolve an absent value: `Missing` when required, else the default.
    pub(crate) fn resolve_absent(&self) -> ValidationResult<Option<Value>> {
        if self.required {
            return Err(ErrorKind::Missing.into());
        }
        Ok(self.default_value.clone())
    }
}
