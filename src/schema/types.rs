//! Descriptor type definitions.
//!
//! A schema is a tree of [`Descriptor`] values. Scalar descriptors own a
//! [`Rules`] value; composite descriptors additionally own their children.
//! Every configuration is normalized at construction and only read afterwards,
//! so a built tree can be shared freely between validation calls and threads.

use super::rules::{RuleSet, Rules};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// A schema node describing the expected type and rules for a value.
#[derive(Debug, Clone)]
pub enum Descriptor {
    /// Integer, truncated toward zero
    Integer(Rules),
    /// Floating point number
    Number(Rules),
    /// Boolean, also read from `Y`/`N`/`1`/`0` strings
    Boolean(Rules),
    /// String with optional enumeration and length rules
    String(Rules),
    /// Date, canonicalized to an RFC 3339 UTC string
    Date(Rules),
    /// Nested object with named fields
    Object(ObjectDescriptor),
    /// Sequence of values sharing one element descriptor
    Array(ArrayDescriptor),
}

impl Descriptor {
    pub fn integer(rules: RuleSet) -> Self {
        Self::Integer(rules.normalize())
    }

    pub fn number(rules: RuleSet) -> Self {
        Self::Number(rules.normalize())
    }

    pub fn boolean(rules: RuleSet) -> Self {
        Self::Boolean(rules.normalize())
    }

    pub fn string(rules: RuleSet) -> Self {
        Self::String(rules.normalize())
    }

    pub fn date(rules: RuleSet) -> Self {
        Self::Date(rules.normalize())
    }

    pub fn object(object: ObjectDescriptor) -> Self {
        Self::Object(object)
    }

    pub fn array(element: Descriptor, rules: RuleSet) -> Self {
        Self::Array(ArrayDescriptor::new(element, rules))
    }

    /// The configuration of this node.
    pub fn rules(&self) -> &Rules {
        match self {
            Self::Integer(rules)
            | Self::Number(rules)
            | Self::Boolean(rules)
            | Self::String(rules)
            | Self::Date(rules) => rules,
            Self::Object(object) => object.rules(),
            Self::Array(array) => array.rules(),
        }
    }

    /// Short name of the descriptor kind, as used in schema definitions.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Integer(_) => "int",
            Self::Number(_) => "number",
            Self::Boolean(_) => "boolean",
            Self::String(_) => "string",
            Self::Date(_) => "date",
            Self::Object(_) => "object",
            Self::Array(_) => "array",
        }
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, Self::Object(_) | Self::Array(_))
    }
}

impl From<ObjectDescriptor> for Descriptor {
    fn from(object: ObjectDescriptor) -> Self {
        Self::Object(object)
    }
}

impl From<ArrayDescriptor> for Descriptor {
    fn from(array: ArrayDescriptor) -> Self {
        Self::Array(array)
    }
}

/// Whole-object check run after every field of an object passed.
///
/// It receives the coerced object and returns `Some(error)` to reject it. The
/// error value is opaque to the engine and reported as-is.
#[derive(Clone)]
pub struct ObjectHook(Arc<dyn Fn(&Map<String, Value>) -> Option<Value> + Send + Sync>);

impl ObjectHook {
    pub fn new<F>(hook: F) -> Self
    where
        F: Fn(&Map<String, Value>) -> Option<Value> + Send + Sync + 'static,
    {
        Self(Arc::new(hook))
    }

    pub(crate) fn call(&self, object: &Map<String, Value>) -> Option<Value> {
        (self.0)(object)
    }
}

impl fmt::Debug for ObjectHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ObjectHook(..)")
    }
}

/// Object node: an ordered list of named child descriptors.
#[derive(Debug, Clone, Default)]
pub struct ObjectDescriptor {
    fields: Vec<(String, Descriptor)>,
    rules: Rules,
    hook: Option<ObjectHook>,
}

impl ObjectDescriptor {
    pub fn new(rules: RuleSet) -> Self {
        Self {
            fields: Vec::new(),
            rules: rules.normalize(),
            hook: None,
        }
    }

    /// Build from an already ordered field list.
    pub fn with_fields<I, S>(fields: I, rules: RuleSet) -> Self
    where
        I: IntoIterator<Item = (S, Descriptor)>,
        S: Into<String>,
    {
        fields
            .into_iter()
            .fold(Self::new(rules), |object, (name, descriptor)| {
                object.field(name, descriptor)
            })
    }

    /// Declare a field. Declaration order is validation and reporting order;
    /// redeclaring a name replaces the earlier descriptor in place.
    pub fn field(mut self, name: impl Into<String>, descriptor: impl Into<Descriptor>) -> Self {
        let name = name.into();
        let descriptor = descriptor.into();
        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = descriptor,
            None => self.fields.push((name, descriptor)),
        }
        self
    }

    /// Attach a whole-object check.
    pub fn with_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Map<String, Value>) -> Option<Value> + Send + Sync + 'static,
    {
        self.hook = Some(ObjectHook::new(hook));
        self
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn hook(&self) -> Option<&ObjectHook> {
        self.hook.as_ref()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Descriptor)> {
        self.fields
            .iter()
            .map(|(name, descriptor)| (name.as_str(), descriptor))
    }

    pub fn get(&self, name: &str) -> Option<&Descriptor> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, descriptor)| descriptor)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Array node: one element descriptor applied to every item.
#[derive(Debug, Clone)]
pub struct ArrayDescriptor {
    element: Box<Descriptor>,
    rules: Rules,
}

impl ArrayDescriptor {
    pub fn new(element: impl Into<Descriptor>, rules: RuleSet) -> Self {
        Self {
            element: Box::new(element.into()),
            rules: rules.normalize(),
        }
    }

    /// Shorthand for an array of objects: the field list becomes an object
    /// element descriptor with default rules.
    pub fn of_fields<I, S>(fields: I, rules: RuleSet) -> Self
    where
        I: IntoIterator<Item = (S, Descriptor)>,
        S: Into<String>,
    {
        Self::new(ObjectDescriptor::with_fields(fields, RuleSet::new()), rules)
    }

    pub fn element(&self) -> &Descriptor {
        &self.element
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }
}

/// Per-call validation switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckOptions {
    /// Write defaults of absent fields into the instance
    pub create_missing_fields: bool,
}

impl CheckOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_missing_fields(mut self, create: bool) -> Self {
        self.create_missing_fields = create;
        self
    }
}
