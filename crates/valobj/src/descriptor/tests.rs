use super::*;
use crate::value::Rect;

#[test]
fn test_conventional_setter() {
    assert_eq!(conventional_setter("age"), "setAge");
    assert_eq!(conventional_setter("dateOfBirth"), "setDateOfBirth");
    assert_eq!(conventional_setter("x"), "setX");
    assert_eq!(conventional_setter(""), "set");
    assert_eq!(conventional_setter("élan"), "setÉlan");
}

#[test]
fn test_accessor_names_default_to_convention() {
    let field = FieldDescriptor::scalar("arf", ScalarKind::I64);
    assert_eq!(field.getter_name().as_str(), "arf");
    assert_eq!(field.setter_name().as_str(), "setArf");
    assert_eq!(field.explicit_getter(), None);
    assert_eq!(field.explicit_setter(), None);
}

#[test]
fn test_explicit_accessor_names_win() {
    let field = FieldDescriptor::scalar("enabled", ScalarKind::Bool)
        .with_getter("isEnabled")
        .with_setter("setIsEnabled");
    assert_eq!(field.getter_name().as_str(), "isEnabled");
    assert_eq!(field.setter_name().as_str(), "setIsEnabled");
}

#[test]
fn test_structural_descriptor_uses_struct_tag() {
    let field = FieldDescriptor::structural::<Rect>("frame");
    assert_eq!(field.tag, TypeTag::Struct(Rect::tag()));
    assert!(!field.is_weak());
    assert!(FieldDescriptor::object("delegate").weak().is_weak());
}
