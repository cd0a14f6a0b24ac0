//! Validation tests module.
//!
//! Tests are grouped by descriptor category.

pub mod composites;

// Re-export commonly used test utilities
pub use crate::common::{
    fixture_path, fixtures::{contact, reference}, init_logging, load_fixture, modify_json,
};

// Re-export assertion macros
pub use crate::{
    assert_error_kind, assert_error_message_contains, assert_field_error,
    assert_validation_success,
};
