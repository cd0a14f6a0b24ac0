//! Error types for schema validation and schema loading.
//!
//! Validation never stops at the first problem: scalar descriptors fail with
//! exactly one [`ErrorKind`], while object and array descriptors collect the
//! failures of every child into an [`ErrorTree`] keyed by field name or array
//! index. The whole tree is carried by [`ValidationError`].

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use std::fmt;

/// Closed set of leaf validation failures.
///
/// Each scalar check fails with exactly one of these. The messages are the
/// strings reported when an error tree is rendered as JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum ErrorKind {
    /// A required value is absent
    #[error("Missing required field")]
    Missing,

    /// Null supplied where `acceptNull` is off
    #[error("Null value not allowed")]
    NullNotAllowed,

    /// Value has a JSON type the descriptor cannot coerce
    #[error("Invalid type")]
    InvalidType,

    /// Numeric bound or enumerated string value violated
    #[error("Value out of range")]
    OutOfRange,

    /// String longer than `maxLength` with truncation disabled
    #[error("String size exceeds max length")]
    StringTooLong,

    /// Array shorter than `minLength`
    #[error("Array size is below min length")]
    ArrayTooSmall,

    /// Array longer than `maxLength`
    #[error("Array size exceeds max length")]
    ArrayTooLarge,

    /// String that cannot be read as a date
    #[error("Invalid date format")]
    InvalidDateFormat,

    /// The descriptor's own configuration can never be satisfied
    #[error("Invalid type definition")]
    InvalidDefinition,
}

/// A validation failure, possibly aggregating nested failures.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// Single leaf failure
    #[error(transparent)]
    Kind(#[from] ErrorKind),

    /// Failures of an object's fields or an array's elements
    #[error("{count} invalid value(s): {0}", count = .0.len())]
    Fields(ErrorTree),

    /// Opaque result returned by a whole-object validation hook
    #[error("Custom validation failed: {0}")]
    Custom(Value),
}

impl ValidationError {
    /// The leaf kind, if this is a single failure.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Kind(kind) => Some(*kind),
            _ => None,
        }
    }

    /// The nested failures, if this error aggregates children.
    pub fn fields(&self) -> Option<&ErrorTree> {
        match self {
            Self::Fields(tree) => Some(tree),
            _ => None,
        }
    }

    /// Whether this is the given leaf kind.
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind() == Some(kind)
    }

    /// Follow a path of field names / index strings through nested trees.
    ///
    /// ```rust
    /// use xjot::error::{ErrorKind, ErrorTree, FieldKey, ValidationError};
    ///
    /// let mut inner = ErrorTree::new();
    /// inner.insert(FieldKey::from("f1"), ErrorKind::InvalidType.into());
    /// let mut rows = ErrorTree::new();
    /// rows.insert(FieldKey::Index(1), ValidationError::Fields(inner));
    /// let error = ValidationError::Fields(rows);
    ///
    /// assert!(error.at(&["1", "f1"]).unwrap().is(ErrorKind::InvalidType));
    /// ```
    pub fn at(&self, path: &[&str]) -> Option<&ValidationError> {
        path.iter()
            .try_fold(self, |error, key| error.fields().and_then(|tree| tree.get(key)))
    }

    /// Render the error as the JSON error-tree shape.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Kind(kind) => Value::String(kind.to_string()),
            Self::Fields(tree) => Value::Object(
                tree.iter()
                    .map(|(key, error)| (key.to_string(), error.to_json()))
                    .collect(),
            ),
            Self::Custom(value) => value.clone(),
        }
    }
}

impl Serialize for ValidationError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Kind(kind) => serializer.collect_str(kind),
            Self::Fields(tree) => tree.serialize(serializer),
            Self::Custom(value) => value.serialize(serializer),
        }
    }
}

/// Key of an entry in an [`ErrorTree`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldKey {
    /// Object field name
    Name(String),
    /// Array element index
    Index(usize),
}

impl FieldKey {
    /// Compare against a field name or a decimal index string.
    pub fn matches(&self, key: &str) -> bool {
        match self {
            Self::Name(name) => name == key,
            Self::Index(index) => key.parse::<usize>().is_ok_and(|k| k == *index),
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.write_str(name),
            Self::Index(index) => write!(f, "{}", index),
        }
    }
}

impl From<&str> for FieldKey {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for FieldKey {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<usize> for FieldKey {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// Ordered collection of child failures.
///
/// Entries keep the order in which they were found, which is the declared
/// field order for objects and ascending index order for arrays.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorTree {
    entries: Vec<(FieldKey, ValidationError)>,
}

impl ErrorTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a child failure.
    pub fn insert(&mut self, key: FieldKey, error: ValidationError) {
        self.entries.push((key, error));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Look up a failure by field name or index string.
    pub fn get(&self, key: &str) -> Option<&ValidationError> {
        self.entries
            .iter()
            .find(|(k, _)| k.matches(key))
            .map(|(_, error)| error)
    }

    /// Look up an array element failure.
    pub fn at_index(&self, index: usize) -> Option<&ValidationError> {
        self.entries
            .iter()
            .find(|(k, _)| *k == FieldKey::Index(index))
            .map(|(_, error)| error)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &FieldKey> {
        self.entries.iter().map(|(key, _)| key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldKey, &ValidationError)> {
        self.entries.iter().map(|(key, error)| (key, error))
    }
}

impl fmt::Display for ErrorTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (position, (key, error)) in self.entries.iter().enumerate() {
            if position > 0 {
                f.write_str(", ")?;
            }
            match error {
                ValidationError::Fields(tree) => write!(f, "{}: {}", key, tree)?,
                other => write!(f, "{}: {}", key, other)?,
            }
        }
        f.write_str("}")
    }
}

impl Serialize for ErrorTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, error) in &self.entries {
            map.serialize_entry(&key.to_string(), error)?;
        }
        map.end()
    }
}

/// Errors raised while building descriptors from a schema definition.
///
/// These are configuration mistakes and surface when the schema is loaded,
/// never during validation of an instance.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// JSON syntax or shape errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Schema file could not be read
    #[error("Failed to read schema definition: {0}")]
    Io(#[from] std::io::Error),

    /// Field definition without a `type`
    #[error("Field '{field}' has no 'type'")]
    MissingType { field: String },

    /// Field definition with an unsupported `type`
    #[error("Field '{field}' has unknown type '{type_name}'")]
    UnknownType { field: String, type_name: String },

    /// Structurally invalid definition
    #[error("Invalid definition for '{field}': {message}")]
    InvalidDefinition { field: String, message: String },
}

impl SchemaError {
    /// Create an invalid definition error
    pub fn invalid_definition(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidDefinition {
            field: field.into(),
            message: message.into(),
        }
    }
}

// Result type aliases for convenience
pub type ValidationResult<T> = Result<T, ValidationError>;
pub type SchemaResult<T> = Result<T, SchemaError>;
