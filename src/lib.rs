//! Runtime schema validation and value coercion for untyped JSON data.
//!
//! Schemas are composed from typed descriptors (integers, numbers, booleans,
//! strings, dates, nested objects and arrays). Checking an instance coerces
//! accepted values into their canonical form in place and reports every
//! violation at once as a tree keyed by field name or array index.
//!
//! # Core Components
//!
//! - [`Descriptor`] - Schema node, scalar or composite
//! - [`Template`] - Record schema with table metadata for persistence layers
//! - [`ValidationError`] - Leaf error kind, error tree, or custom hook result
//!
//! # Quick Start
//!
//! ```rust
//! use serde_json::json;
//! use xjot::{ArrayDescriptor, Descriptor, RuleSet, Template};
//!
//! let template = Template::from_fields(
//!     [
//!         ("intField", Descriptor::integer(RuleSet::new().required(true))),
//!         ("longstr", Descriptor::string(RuleSet::new().max_length(8))),
//!         ("dateStr", Descriptor::date(RuleSet::new())),
//!         (
//!             "rows",
//!             Descriptor::from(ArrayDescriptor::of_fields(
//!                 [("f1", Descriptor::integer(RuleSet::new()))],
//!                 RuleSet::new(),
//!             )),
//!         ),
//!     ],
//!     RuleSet::new(),
//! );
//!
//! let mut instance = json!({
//!     "intField": 12.5,
//!     "longstr": "This is a test",
//!     "dateStr": "2020-10-25",
//!     "rows": [{ "f1": 1 }, { "f1": "fail" }]
//! });
//!
//! let error = template.validate(&mut instance).expect("row 1 is invalid");
//! assert_eq!(error.to_json(), json!({ "rows": { "1": { "f1": "Invalid type" } } }));
//! assert_eq!(instance["intField"], json!(12));
//! assert_eq!(instance["longstr"], json!("This is "));
//! assert_eq!(instance["dateStr"], json!("2020-10-25T00:00:00.000Z"));
//! ```

pub mod error;
pub mod schema;

// Re-export commonly used types for convenience
pub use error::{
    ErrorKind, ErrorTree, FieldKey, SchemaError, SchemaResult, ValidationError, ValidationResult,
};
pub use schema::{
    ArrayDescriptor, CheckOptions, Descriptor, ObjectDescriptor, ObjectHook, RuleSet, Rules,
    Template,
};
