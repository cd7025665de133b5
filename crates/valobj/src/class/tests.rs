#![allow(clippy::unwrap_used, reason = "tests unwrap freely")]

use super::*;
use crate::value::{ByteValue, NumberValue, Point, Rect, StructValue};
use crate::ScalarKind;
use pretty_assertions::assert_eq;

fn person(name: &str) -> Arc<ValueClass> {
    ValueClass::builder(name)
        .field(FieldDescriptor::object("name"))
        .field(FieldDescriptor::scalar("age", ScalarKind::I64))
        .build()
        .unwrap()
}

#[test]
fn test_build_indexes_fields_and_accessors() {
    let class = ValueClass::builder("ClassIndexed")
        .field(FieldDescriptor::object("name"))
        .field(FieldDescriptor::scalar("enabled", ScalarKind::Bool).with_getter("isEnabled"))
        .build()
        .unwrap();

    assert_eq!(class.name().as_str(), "ClassIndexed");
    assert_eq!(class.fields().len(), 2);
    assert_eq!(class.index_of("name"), Some(0));
    assert_eq!(class.index_of("enabled"), Some(1));
    assert_eq!(class.index_of("missing"), None);
    assert_eq!(class.index_for_getter("isEnabled"), Some(1));
    assert_eq!(class.index_for_getter("enabled"), None);
    assert_eq!(
        class
            .field_for_setter(Symbol::intern("setEnabled"))
            .map(|f| f.name.as_str()),
        Some("enabled")
    );
    assert!(class.has_stable_hash());
}

#[test]
fn test_opaque_field_fails_validation() {
    let err = ValueClass::builder("ClassWithPointer")
        .field(FieldDescriptor::new("handle", TypeTag::Opaque(Symbol::intern("*void"))))
        .build()
        .unwrap_err();
    assert!(matches!(err, ValueError::UncomparableField { field, .. } if field.as_str() == "handle"));
}

#[test]
fn test_weak_non_object_field_fails_validation() {
    let err = ValueClass::builder("ClassWeakScalar")
        .field(FieldDescriptor::scalar("count", ScalarKind::I32).weak())
        .build()
        .unwrap_err();
    assert_eq!(
        err,
        ValueError::WeakNonObjectField {
            class: Symbol::intern("ClassWeakScalar"),
            field: Symbol::intern("count"),
            tag: TypeTag::Scalar(ScalarKind::I32),
        }
    );

    let err = ValueClass::builder("ClassWeakStruct")
        .field(FieldDescriptor::structural::<Point>("origin").weak())
        .build()
        .unwrap_err();
    assert!(matches!(err, ValueError::WeakNonObjectField { field, .. } if field.as_str() == "origin"));
}

#[test]
fn test_duplicate_field_fails_validation() {
    let err = ValueClass::builder("ClassWithDuplicate")
        .field(FieldDescriptor::object("name"))
        .field(FieldDescriptor::object("name"))
        .build()
        .unwrap_err();
    assert_eq!(
        err,
        ValueError::DuplicateField {
            class: Symbol::intern("ClassWithDuplicate"),
            field: Symbol::intern("name"),
        }
    );
}

#[test]
fn test_colliding_setter_fails_validation() {
    let err = ValueClass::builder("ClassWithSetterClash")
        .field(FieldDescriptor::object("title"))
        .field(FieldDescriptor::object("caption").with_setter("setTitle"))
        .build()
        .unwrap_err();
    assert!(matches!(err, ValueError::DuplicateField { field, .. } if field.as_str() == "setTitle"));
}

#[test]
fn test_weak_object_field_disables_stable_hash() {
    let class = ValueClass::builder("ClassWithDelegate")
        .field(FieldDescriptor::object("delegate").weak())
        .build()
        .unwrap();
    assert!(!class.has_stable_hash());

    let forced = ValueClass::builder("ClassWithForcedHash")
        .field(FieldDescriptor::object("delegate").weak())
        .stable_hash(true)
        .build()
        .unwrap();
    assert!(forced.has_stable_hash());
}

#[test]
fn test_construct_defaults_missing_fields() {
    let class = ValueClass::builder("ClassDefaults")
        .field(FieldDescriptor::object("name"))
        .field(FieldDescriptor::scalar("count", ScalarKind::U32))
        .field(FieldDescriptor::structural::<Point>("origin"))
        .build()
        .unwrap();

    let object = class.construct(&FieldValues::new()).unwrap();
    assert!(object.get("name").unwrap().is_nil());
    assert_eq!(
        object.get("count").unwrap().as_number(),
        Some(NumberValue::U32(0))
    );
    assert_eq!(object.get_as::<Point>("origin"), Some(Point::new(0.0, 0.0)));
}

#[test]
fn test_construct_ignores_unknown_keys() {
    let class = person("ClassIgnoresUnknown");
    let values = FieldValues::new()
        .with("name", "Ada")
        .with("age", 36_i64)
        .with("favouriteColour", "green");
    let object = class.construct(&values).unwrap();
    assert_eq!(object.get_as::<String>("name"), Some("Ada".to_owned()));
    assert_eq!(object.get("favouriteColour"), None);
}

#[test]
fn test_construct_casts_numbers_to_declared_width() {
    let class = person("ClassCastsNumbers");
    let object = class.construct_pairs([("age", 36_i32)]).unwrap();
    assert_eq!(
        object.get("age").unwrap().as_number(),
        Some(NumberValue::I64(36))
    );
}

#[test]
fn test_construct_rejects_mismatched_struct() {
    let class = ValueClass::builder("ClassRejectsStruct")
        .field(FieldDescriptor::structural::<Point>("origin"))
        .build()
        .unwrap();
    let err = class
        .construct_pairs([("origin", FieldValue::from_struct(&Rect::new(0.0, 0.0, 1.0, 1.0)))])
        .unwrap_err();
    assert!(matches!(err, ValueError::FieldTypeMismatch { field, .. } if field.as_str() == "origin"));
}

#[test]
fn test_construct_rejects_struct_bytes_of_wrong_length() {
    let class = ValueClass::builder("ClassRejectsShortBytes")
        .field(FieldDescriptor::structural::<Point>("origin"))
        .build()
        .unwrap();
    let short = ByteValue::new(Point::tag(), vec![0u8; Point::SIZE - 1]);
    let err = class.construct_pairs([("origin", short)]).unwrap_err();
    assert!(matches!(err, ValueError::FieldTypeMismatch { field, .. } if field.as_str() == "origin"));
}

#[test]
fn test_construct_pairs_later_pair_wins() {
    let class = person("ClassLaterPairWins");
    let object = class
        .construct_pairs([("age", FieldValue::from(1_i64)), ("age", FieldValue::from(2_i64))])
        .unwrap();
    assert_eq!(object.get_as::<i64>("age"), Some(2));
}

#[test]
fn test_construct_forms_agree() {
    let class = person("ClassFormsAgree");
    let from_map = class
        .construct(&FieldValues::new().with("name", "Ada").with("age", 36_i64))
        .unwrap();
    let from_pairs = class
        .construct_pairs([("name", FieldValue::from("Ada")), ("age", FieldValue::from(36_i64))])
        .unwrap();
    assert!(ValueObject::ptr_eq(&from_map, &from_pairs));
}

#[test]
fn test_class_ids_are_distinct() {
    let a = person("ClassIdA");
    let b = person("ClassIdB");
    assert_ne!(a.id(), b.id());
}

#[test]
fn test_field_values_from_iter() {
    let values: FieldValues = [("a", 1_i64), ("b", 2_i64)].into_iter().collect();
    assert_eq!(values.len(), 2);
    assert_eq!(values.get("a"), Some(&FieldValue::from(1_i64)));
    assert!(!values.is_empty());
}

struct NestedInner;

impl Introspect for NestedInner {
    const CLASS_NAME: &'static str = "ClassNestedInner";

    fn fields() -> Vec<FieldDescriptor> {
        vec![FieldDescriptor::scalar("depth", ScalarKind::U8)]
    }
}

struct NestedOuter;

impl Introspect for NestedOuter {
    const CLASS_NAME: &'static str = "ClassNestedOuter";

    fn fields() -> Vec<FieldDescriptor> {
        let inner = ValueClass::of::<NestedInner>().unwrap();
        let mut fields = vec![FieldDescriptor::object("label")];
        fields.extend(inner.fields().iter().cloned());
        fields
    }
}

#[test]
fn test_introspection_may_introspect_other_types() {
    let outer = ValueClass::of::<NestedOuter>().unwrap();
    let names: Vec<&str> = outer.fields().iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["label", "depth"]);

    assert!(Arc::ptr_eq(&outer, &ValueClass::of::<NestedOuter>().unwrap()));
    assert_eq!(
        ValueClass::of::<NestedInner>().unwrap().name().as_str(),
        "ClassNestedInner"
    );
}
