//! Object and array descriptor tests.
//!
//! Covers error aggregation, in-place coercion, default write-back, hooks and
//! array length bounds.

use super::*;
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use xjot::{
    ArrayDescriptor, CheckOptions, Descriptor, ErrorKind, FieldKey, ObjectDescriptor, RuleSet,
    ValidationError,
};

fn address() -> ObjectDescriptor {
    ObjectDescriptor::new(RuleSet::new())
        .field("street", Descriptor::string(RuleSet::new().required(true)))
        .field("zip", Descriptor::integer(RuleSet::new()))
        .field("country", Descriptor::string(RuleSet::new().default_value("NZ")))
}

#[test]
fn test_object_collects_every_failure() {
    init_logging();
    let schema = ObjectDescriptor::new(RuleSet::new())
        .field("a", Descriptor::integer(RuleSet::new()))
        .field("b", Descriptor::integer(RuleSet::new().required(true)))
        .field("c", Descriptor::boolean(RuleSet::new()))
        .field("d", Descriptor::date(RuleSet::new()));

    let mut record = json!({ "a": "x", "c": "maybe", "d": "2020-10-25" });
    let error = schema.validate(&mut record).expect("three fields fail");

    let tree = error.fields().expect("object failures form a tree");
    let keys: Vec<String> = tree.keys().map(FieldKey::to_string).collect();
    assert_eq!(keys, vec!["a", "b", "c"]);
    assert_field_error!(error, ["a"], ErrorKind::InvalidType);
    assert_field_error!(error, ["b"], ErrorKind::Missing);
    assert_field_error!(error, ["c"], ErrorKind::InvalidType);

    // Passing siblings are still coerced
    assert_eq!(record["d"], json!("2020-10-25T00:00:00.000Z"));
    assert_eq!(record["a"], json!("x"));
}

#[test]
fn test_object_rejects_non_objects() {
    let schema = address();
    for raw in [json!("titi"), json!(3), json!([{ "street": "x" }])] {
        assert_error_kind!(schema.check_type(&mut raw.clone()), ErrorKind::InvalidType);
    }
}

#[test]
fn test_object_null_and_absent() {
    let required = Descriptor::object(
        ObjectDescriptor::new(RuleSet::new().required(true))
            .field("street", Descriptor::string(RuleSet::new())),
    );
    assert_error_kind!(required.check_absent(), ErrorKind::Missing);
    assert_error_kind!(required.check_type(&mut Value::Null), ErrorKind::NullNotAllowed);

    let nullable = Descriptor::object(
        ObjectDescriptor::new(RuleSet::new().accept_null(true))
            .field("street", Descriptor::string(RuleSet::new().required(true))),
    );
    assert_validation_success!(nullable.check_type(&mut Value::Null));
    assert_eq!(nullable.check_absent().unwrap(), None);
}

#[test]
fn test_nested_object_errors() {
    let schema = ObjectDescriptor::new(RuleSet::new())
        .field("name", Descriptor::string(RuleSet::new()))
        .field("address", address());

    let mut record = json!({ "name": "Jane", "address": { "zip": "abc" } });
    let error = schema.validate(&mut record).expect("address is invalid");

    assert_eq!(
        error.to_json(),
        json!({ "address": { "street": "Missing required field", "zip": "Invalid type" } })
    );
}

#[test]
fn test_create_missing_fields() {
    let schema = address();

    let mut record = json!({ "street": "1 Main St", "zip": "6011" });
    assert_validation_success!(schema.check_type(&mut record));
    assert_eq!(record, json!({ "street": "1 Main St", "zip": 6011 }));

    let mut record = json!({ "street": "1 Main St" });
    let options = CheckOptions::new().create_missing_fields(true);
    assert_validation_success!(schema.check_type_with(&mut record, options));
    assert_eq!(record, json!({ "street": "1 Main St", "country": "NZ" }));
}

#[test]
fn test_present_null_is_not_replaced_by_default() {
    let schema = ObjectDescriptor::new(RuleSet::new()).field(
        "country",
        Descriptor::string(RuleSet::new().default_value("NZ").accept_null(true)),
    );
    let mut record = json!({ "country": null });
    let options = CheckOptions::new().create_missing_fields(true);
    assert_validation_success!(schema.check_type_with(&mut record, options));
    assert_eq!(record, json!({ "country": null }));
}

#[test]
fn test_undeclared_fields_are_untouched() {
    let schema = address();
    let mut record = json!({ "street": "x", "notes": [1, "two", null], "extra": "  keep  " });
    assert_validation_success!(schema.check_type(&mut record));
    assert_eq!(record["notes"], json!([1, "two", null]));
    assert_eq!(record["extra"], json!("  keep  "));
}

#[test]
fn test_redeclared_field_replaces_descriptor() {
    let schema = ObjectDescriptor::new(RuleSet::new())
        .field("a", Descriptor::integer(RuleSet::new()))
        .field("b", Descriptor::integer(RuleSet::new()))
        .field("a", Descriptor::string(RuleSet::new()));

    let names: Vec<&str> = schema.fields().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["a", "b"]);
    assert!(matches!(schema.get("a"), Some(Descriptor::String(_))));
}

#[test]
fn test_hook_sees_coerced_object() {
    let schema = ObjectDescriptor::new(RuleSet::new())
        .field("f1", Descriptor::integer(RuleSet::new()))
        .field("f2", Descriptor::string(RuleSet::new()))
        .with_hook(|object| {
            let f1 = object.get("f1").and_then(Value::as_i64)?;
            (f1 < 40).then(|| json!("f2 is too small"))
        });

    let mut small = json!({ "f1": "23", "f2": "A string" });
    match schema.check_type(&mut small) {
        Err(ValidationError::Custom(value)) => assert_eq!(value, json!("f2 is too small")),
        other => panic!("Expected a custom hook error, got {:?}", other),
    }
    assert_eq!(small["f1"], json!(23));

    let mut large = json!({ "f1": "41", "f2": "A string" });
    assert_validation_success!(schema.check_type(&mut large));
}

#[test]
fn test_hook_skipped_when_fields_fail() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let schema = ObjectDescriptor::new(RuleSet::new())
        .field("f1", Descriptor::integer(RuleSet::new()))
        .with_hook(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Some(json!({ "reason": "always" }))
        });

    let error = schema.validate(&mut json!({ "f1": "fail" })).unwrap();
    assert_field_error!(error, ["f1"], ErrorKind::InvalidType);
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let error = schema.validate(&mut json!({ "f1": 1 })).unwrap();
    assert_eq!(error.to_json(), json!({ "reason": "always" }));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_empty_hook_result_is_success() {
    let empty = ObjectDescriptor::new(RuleSet::new()).with_hook(|_| Some(json!("")));
    assert_validation_success!(empty.check_type(&mut json!({})));

    let null = ObjectDescriptor::new(RuleSet::new()).with_hook(|_| Some(Value::Null));
    assert_validation_success!(null.check_type(&mut json!({})));

    let falsy = ObjectDescriptor::new(RuleSet::new()).with_hook(|_| Some(json!(false)));
    assert!(falsy.validate(&mut json!({})).is_some());
}

#[test]
fn test_array_element_errors_keyed_by_index() {
    let numbers = Descriptor::array(Descriptor::integer(RuleSet::new()), RuleSet::new());

    let mut values = json!([1, "2", 3.7, "this one fails", null]);
    let error = numbers.validate(&mut values).expect("two elements fail");

    assert_eq!(
        error.to_json(),
        json!({ "3": "Invalid type", "4": "Null value not allowed" })
    );
    let tree = error.fields().unwrap();
    assert!(tree.at_index(3).unwrap().is(ErrorKind::InvalidType));
    assert!(tree.at_index(0).is_none());
    assert_eq!(values, json!([1, 2, 3, "this one fails", null]));
}

#[test]
fn test_array_length_bounds() {
    let bounded = Descriptor::array(
        Descriptor::integer(RuleSet::new()),
        RuleSet::new().min_length(2).max_length(3),
    );

    assert_error_kind!(bounded.check_type(&mut json!([1])), ErrorKind::ArrayTooSmall);
    assert_error_kind!(bounded.check_type(&mut json!([1, 2, 3, 4])), ErrorKind::ArrayTooLarge);
    assert_validation_success!(bounded.check_type(&mut json!([1, 2])));
    assert_validation_success!(bounded.check_type(&mut json!([1, 2, 3])));

    // Length failures are reported without element checks
    assert_error_kind!(bounded.check_type(&mut json!(["x"])), ErrorKind::ArrayTooSmall);
}

#[test]
fn test_array_zero_max_length_is_unlimited() {
    let unlimited = Descriptor::array(
        Descriptor::integer(RuleSet::new()),
        RuleSet::new().min_length(1).max_length(0),
    );

    assert_validation_success!(unlimited.check_type(&mut json!([1])));
    assert_validation_success!(unlimited.check_type(&mut json!((0..50).collect::<Vec<i64>>())));
    assert_error_kind!(unlimited.check_type(&mut json!([])), ErrorKind::ArrayTooSmall);
}

#[test]
fn test_array_type_and_null() {
    let list = Descriptor::array(Descriptor::string(RuleSet::new()), RuleSet::new());
    assert_error_kind!(list.check_type(&mut json!("a,b")), ErrorKind::InvalidType);
    assert_error_kind!(list.check_type(&mut json!({ "0": "a" })), ErrorKind::InvalidType);
    assert_error_kind!(list.check_type(&mut Value::Null), ErrorKind::NullNotAllowed);
    assert_validation_success!(list.check_type(&mut json!([])));

    let inverted = Descriptor::array(
        Descriptor::string(RuleSet::new()),
        RuleSet::new().min_length(3).max_length(1),
    );
    assert_error_kind!(inverted.check_type(&mut json!([])), ErrorKind::InvalidDefinition);
}

#[test]
fn test_array_of_objects_passes_options_down() {
    let rows = Descriptor::from(ArrayDescriptor::of_fields(
        [
            ("f1", Descriptor::integer(RuleSet::new())),
            ("f2", Descriptor::string(RuleSet::new().default_value("n/a"))),
        ],
        RuleSet::new(),
    ));

    let mut value = json!([{ "f1": "1" }, { "f1": 2, "f2": "set" }]);
    let options = CheckOptions::new().create_missing_fields(true);
    assert_validation_success!(rows.check_type_with(&mut value, options));
    assert_eq!(
        value,
        json!([{ "f1": 1, "f2": "n/a" }, { "f1": 2, "f2": "set" }])
    );
}

#[test]
fn test_nested_array_paths() {
    let directory = contact::directory();
    let mut value = json!([
        { "firstName": "Jane", "phones": [{ "kind": "mobile", "number": "555-0100" }] },
        { "firstName": "Joe", "age": "x", "phones": [{ "kind": "fax", "number": "1" }, { "kind": "home" }] }
    ]);

    let error = directory.validate(&mut value).expect("second entry fails");
    assert!(error.at(&["0"]).is_none());
    assert_field_error!(error, ["1", "age"], ErrorKind::InvalidType);
    assert_field_error!(error, ["1", "phones", "0", "kind"], ErrorKind::OutOfRange);
    assert_field_error!(error, ["1", "phones", "1", "number"], ErrorKind::Missing);
}
