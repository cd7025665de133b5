use super::*;
use crate::value::{NumberValue, ObjectRef, Point};

struct Probe {
    class: ClassId,
    fields: Vec<FieldValue>,
    cached: Option<u64>,
}

impl Probe {
    fn new(class: ClassId, fields: Vec<FieldValue>) -> Self {
        Probe {
            class,
            fields,
            cached: None,
        }
    }
}

impl ValueInstance for Probe {
    fn class_id(&self) -> ClassId {
        self.class
    }

    fn class_name(&self) -> Symbol {
        Symbol::intern("Probe")
    }

    fn field_values(&self) -> &[FieldValue] {
        &self.fields
    }

    fn cached_hash(&self) -> Option<u64> {
        self.cached
    }
}

fn ada(class: ClassId, age: i64) -> Probe {
    Probe::new(class, vec![FieldValue::from("Ada"), FieldValue::from(age)])
}

#[test]
fn test_equal_fields_are_equal() {
    let class = ClassId::fresh();
    assert!(equals(&ada(class, 36), &ada(class, 36)));
    assert!(!equals(&ada(class, 36), &ada(class, 37)));
}

#[test]
fn test_different_classes_are_never_equal() {
    let (a, b) = (ClassId::fresh(), ClassId::fresh());
    assert!(!equals(&ada(a, 36), &ada(b, 36)));
}

#[test]
fn test_identity_is_equal() {
    let probe = ada(ClassId::fresh(), 36);
    assert!(equals(&probe, &probe));
}

#[test]
fn test_nested_objects_compare_by_value() {
    let class = ClassId::fresh();
    let inner = |n: i64| FieldValue::Object(ObjectRef::new(NumberValue::from(n)));
    let a = Probe::new(class, vec![inner(1)]);
    let b = Probe::new(class, vec![inner(1)]);
    let c = Probe::new(class, vec![inner(2)]);
    assert!(equals(&a, &b));
    assert!(!equals(&a, &c));
}

#[test]
fn test_hash_agrees_with_equality() {
    let class = ClassId::fresh();
    assert_eq!(hash_of(&ada(class, 36)), hash_of(&ada(class, 36)));
    assert_ne!(hash_of(&ada(class, 36)), hash_of(&ada(class, 37)));
}

#[test]
fn test_hash_is_order_sensitive() {
    let class = ClassId::fresh();
    let x = FieldValue::from(1_i64);
    let y = FieldValue::from(2_i64);
    assert_ne!(
        structural_hash(class, &[x.clone(), y.clone()]),
        structural_hash(class, &[y, x]),
    );
}

#[test]
fn test_hash_depends_on_class() {
    let fields = [FieldValue::from_struct(&Point::new(1.0, 2.0))];
    assert_ne!(
        structural_hash(ClassId::fresh(), &fields),
        structural_hash(ClassId::fresh(), &fields),
    );
}

#[test]
fn test_cached_hash_is_returned() {
    let mut probe = ada(ClassId::fresh(), 36);
    probe.cached = Some(7);
    assert_eq!(hash_of(&probe), 7);
}

#[test]
fn test_mix_is_not_commutative() {
    assert_ne!(mix(mix(0, 1), 2), mix(mix(0, 2), 1));
}

#[test]
fn test_empty_instances() {
    let class = ClassId::fresh();
    let a = Probe::new(class, Vec::new());
    let b = Probe::new(class, Vec::new());
    assert!(equals(&a, &b));
    assert_eq!(hash_of(&a), hash_of(&b));
}
