//! Descriptor trees and the validation engine.
//!
//! A schema is composed once from [`Descriptor`] values and then reused for
//! any number of validation calls. Instances are checked and coerced in place.
//!
//! # Key Types
//!
//! - [`Descriptor`] - Scalar or composite schema node
//! - [`ObjectDescriptor`] / [`ArrayDescriptor`] - Composite nodes
//! - [`Template`] - Schema entry point for records
//! - [`RuleSet`] / [`Rules`] - Partial and normalized node configuration
//!
//! # Examples
//!
//! ```rust
//! use serde_json::json;
//! use xjot::schema::{Descriptor, ObjectDescriptor, RuleSet};
//!
//! let schema = ObjectDescriptor::new(RuleSet::new())
//!     .field("age", Descriptor::integer(RuleSet::new().required(true).min(0.0)))
//!     .field("status", Descriptor::string(RuleSet::new().values(["Active", "Deleted"])));
//!
//! let mut record = json!({ "age": "41.7", "status": "Unknown" });
//! let error = schema.validate(&mut record).expect("status is not allowed");
//!
//! assert_eq!(record["age"], json!(41));
//! assert_eq!(error.to_json(), json!({ "status": "Value out of range" }));
//! ```

pub mod loader;
pub mod rules;
pub mod scalar;
pub mod template;
pub mod types;
pub mod validation;


// Re-export the main types for convenience
pub use rules::{RuleSet, Rules};
pub use scalar::parse_date;
pub use template::Template;
pub use types::{ArrayDescriptor, CheckOptions, Descriptor, ObjectDescriptor, ObjectHook};
