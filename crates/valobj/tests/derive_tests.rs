//! Tests for `#[derive(Introspect)]`.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use pretty_assertions::assert_eq;
use valobj::{
    FieldDescriptor, FieldValue, Introspect, MutableClass, ObjectRef, Point, Rect, ScalarKind, Storage,
    StructValue, TypeTag, ValueClass, ValueObject,
};

#[derive(Introspect)]
struct Person {
    name: String,
    age: i64,
}

#[derive(Introspect)]
#[value(name = "DeriveWidget")]
struct Widget {
    title: Option<String>,
    #[value(structural)]
    frame: Rect,
    #[value(getter = "isVisible", setter = "setIsVisible")]
    visible: bool,
    count: usize,
    ratio: f32,
    #[value(skip)]
    #[allow(dead_code)]
    scratch: Vec<u8>,
}

#[derive(Introspect)]
#[value(name = "DeriveObserver")]
struct Observer {
    #[value(weak)]
    delegate: Option<ObjectRef>,
    #[value(structural)]
    anchor: Point,
}

#[derive(Introspect)]
#[value(name = "DeriveOwned")]
struct Owned {
    owner: ObjectRef,
    backup: Option<ObjectRef>,
}

#[derive(Introspect)]
#[value(name = "DeriveUnstable", stable_hash = false)]
struct Unstable {
    value: u8,
}

#[test]
fn test_class_name_defaults_to_struct_name() {
    assert_eq!(Person::CLASS_NAME, "Person");
    assert_eq!(Widget::CLASS_NAME, "DeriveWidget");
}

#[test]
fn test_field_descriptors() {
    assert_eq!(
        Person::fields(),
        vec![
            FieldDescriptor::object("name"),
            FieldDescriptor::scalar("age", ScalarKind::I64),
        ]
    );

    let fields = Widget::fields();
    let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["title", "frame", "visible", "count", "ratio"]);
    assert_eq!(fields[0].tag, TypeTag::Object);
    assert_eq!(fields[1].tag, TypeTag::Struct(Rect::tag()));
    assert_eq!(fields[2].getter_name().as_str(), "isVisible");
    assert_eq!(fields[2].setter_name().as_str(), "setIsVisible");
    assert_eq!(fields[3].tag, TypeTag::Scalar(ScalarKind::U64));
    assert_eq!(fields[4].tag, TypeTag::Scalar(ScalarKind::F32));
}

#[test]
fn test_weak_and_stable_hash_attributes() {
    let fields = Observer::fields();
    assert_eq!(fields[0].storage, Storage::Weak);
    assert_eq!(Observer::stable_hash(), None);
    assert!(!ValueClass::of::<Observer>().unwrap().has_stable_hash());

    assert_eq!(Unstable::stable_hash(), Some(false));
    assert!(!ValueClass::of::<Unstable>().unwrap().has_stable_hash());
}

#[test]
fn test_introspection_is_cached() {
    let a = ValueClass::of::<Person>().unwrap();
    let b = ValueClass::of::<Person>().unwrap();
    assert!(std::sync::Arc::ptr_eq(&a, &b));
}

#[test]
fn test_into_value_object_uniques() {
    let a = Person {
        name: "Ada".to_owned(),
        age: 36,
    }
    .into_value_object()
    .unwrap();
    let b = Person {
        name: "Ada".to_owned(),
        age: 36,
    }
    .into_value_object()
    .unwrap();
    assert!(ValueObject::ptr_eq(&a, &b));
    assert_eq!(a.get_as::<String>("name"), Some("Ada".to_owned()));
    assert_eq!(a.get_as::<i64>("age"), Some(36));
}

#[test]
fn test_into_value_object_boxes_every_kind() {
    let widget = Widget {
        title: None,
        frame: Rect::new(0.0, 0.0, 10.0, 20.0),
        visible: true,
        count: 3,
        ratio: 0.5,
        scratch: vec![1, 2, 3],
    }
    .into_value_object()
    .unwrap();

    assert!(widget.get("title").unwrap().is_nil());
    assert_eq!(
        widget.get_as::<Rect>("frame"),
        Some(Rect::new(0.0, 0.0, 10.0, 20.0))
    );
    assert_eq!(widget.value_for_getter("isVisible"), Some(FieldValue::from(true)));
    assert_eq!(widget.get_as::<u64>("count"), Some(3));
    assert_eq!(widget.get_as::<f32>("ratio"), Some(0.5));
    assert_eq!(widget.get("scratch"), None);
}

#[test]
fn test_derived_class_gets_mutable_variant() {
    let class = ValueClass::of::<Widget>().unwrap();
    MutableClass::builder(&class, "DeriveMutableWidget")
        .all_setters()
        .build()
        .unwrap();

    let widget = Widget {
        title: Some("Inbox".to_owned()),
        frame: Rect::default(),
        visible: false,
        count: 0,
        ratio: 1.0,
        scratch: Vec::new(),
    }
    .into_value_object()
    .unwrap();

    let mut draft = widget.mutable_copy().unwrap();
    draft.invoke("setIsVisible", true).unwrap();
    draft.invoke("setCount", 12_u64).unwrap();
    draft.invoke("setFrame", Rect::new(1.0, 1.0, 2.0, 2.0)).unwrap();
    let shown = draft.freeze().unwrap();

    assert_eq!(shown.get_as::<String>("title"), Some("Inbox".to_owned()));
    assert_eq!(shown.get_as::<bool>("visible"), Some(true));
    assert_eq!(shown.get_as::<u64>("count"), Some(12));
    assert_eq!(
        shown.get_as::<Rect>("frame"),
        Some(Rect::new(1.0, 1.0, 2.0, 2.0))
    );
}

#[test]
fn test_weak_field_does_not_retain() {
    let delegate = ObjectRef::new(String::from("controller"));
    let observer = Observer {
        delegate: Some(delegate.clone()),
        anchor: Point::new(1.0, 1.0),
    }
    .into_value_object()
    .unwrap();

    assert_eq!(observer.get("delegate").unwrap().as_object(), Some(delegate.clone()));
    drop(delegate);
    assert!(observer.get("delegate").unwrap().is_nil());
}

#[test]
fn test_object_ref_fields_are_stored_unwrapped() {
    let class = ValueClass::of::<Owned>().unwrap();
    MutableClass::builder(&class, "DeriveMutableOwned")
        .all_setters()
        .build()
        .unwrap();
    let owner = ObjectRef::new(String::from("Ada"));

    let derived = Owned {
        owner: owner.clone(),
        backup: Some(ObjectRef::new(String::from("Grace"))),
    }
    .into_value_object()
    .unwrap();
    let manual = class
        .construct_pairs([
            ("owner", FieldValue::from(owner.clone())),
            ("backup", FieldValue::from("Grace")),
        ])
        .unwrap();
    assert_eq!(derived, manual);
    assert!(ValueObject::ptr_eq(&derived, &manual));
    assert_eq!(derived.get_as::<String>("owner"), Some("Ada".to_owned()));
    assert_eq!(derived.get_as::<String>("backup"), Some("Grace".to_owned()));

    let mut draft = class
        .construct_pairs([("backup", "Grace")])
        .unwrap()
        .mutable_copy()
        .unwrap();
    draft.invoke("setOwner", owner).unwrap();
    assert!(ValueObject::ptr_eq(&draft.freeze().unwrap(), &derived));

    let orphan = Owned {
        owner: ObjectRef::new(String::from("Ada")),
        backup: None,
    }
    .into_value_object()
    .unwrap();
    assert!(orphan.get("backup").unwrap().is_nil());
}
