//! Field values.
//!
//! Every field slot of every instance holds a [`FieldValue`]. The variant
//! mirrors the field's [`TypeTag`]: `Object` fields hold shared objects,
//! scalar fields hold a [`NumberValue`], and structural fields hold a
//! [`ByteValue`].
//!
//! # Equality
//!
//! - Objects compare by value through [`ObjectValue::dyn_eq`].
//! - Numbers compare bitwise within a kind.
//! - Structural values compare tag and bytes.
//! - A weak reference compares as its target, or as `Nil` once released.

mod bytes;
mod geometry;
mod number;
mod object;
mod raw;

use std::fmt;
use std::hash::{Hash, Hasher};

pub use bytes::{ByteValue, StructValue};
pub use geometry::{AffineTransform, Point, Range, Rect, Size, Transform3D};
pub use number::NumberValue;
pub use object::{ObjectRef, ObjectValue, WeakObject};
pub use raw::RawValue;

use crate::{ScalarKind, TypeTag};

/// The value held in one field slot.
#[derive(Clone, Default)]
pub enum FieldValue {
    #[default]
    Nil,
    Object(ObjectRef),
    Weak(WeakObject),
    Number(NumberValue),
    Bytes(ByteValue),
}

impl FieldValue {
    /// Store `value` as a shared object.
    pub fn object<T: ObjectValue>(value: T) -> Self {
        FieldValue::Object(ObjectRef::new(value))
    }

    pub fn from_struct<T: StructValue>(value: &T) -> Self {
        FieldValue::Bytes(ByteValue::of(value))
    }

    /// The value an unset field of `tag` holds.
    pub fn default_for(tag: TypeTag) -> Self {
        match tag {
            TypeTag::Object | TypeTag::Opaque(_) => FieldValue::Nil,
            TypeTag::Scalar(kind) => FieldValue::Number(NumberValue::zero(kind)),
            TypeTag::Struct(st) => FieldValue::Bytes(ByteValue::zeroed(st)),
        }
    }

    /// Short description of the value's kind, for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            FieldValue::Nil => "nil",
            FieldValue::Object(_) => "object",
            FieldValue::Weak(_) => "weak object",
            FieldValue::Number(n) => n.kind().as_str(),
            FieldValue::Bytes(_) => "struct",
        }
    }

    /// `Nil`, or a weak reference whose target is gone.
    pub fn is_nil(&self) -> bool {
        match self {
            FieldValue::Nil => true,
            FieldValue::Weak(weak) => weak.upgrade().is_none(),
            _ => false,
        }
    }

    /// The object held, upgrading a weak reference.
    pub fn as_object(&self) -> Option<ObjectRef> {
        match self {
            FieldValue::Object(object) => Some(object.clone()),
            FieldValue::Weak(weak) => weak.upgrade(),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<NumberValue> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&ByteValue> {
        match self {
            FieldValue::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Replace a weak reference by its target (or `Nil`).
    #[must_use]
    pub fn resolve(&self) -> FieldValue {
        match self {
            FieldValue::Weak(weak) => weak.upgrade().map_or(FieldValue::Nil, FieldValue::Object),
            other => other.clone(),
        }
    }

    /// Hold an object weakly; other values are unchanged.
    #[must_use]
    pub fn downgrade(self) -> FieldValue {
        match self {
            FieldValue::Object(object) => FieldValue::Weak(object.downgrade()),
            other => other,
        }
    }

    /// Fit the value to a field declared as `tag`.
    ///
    /// Numbers are cast to the declared width and `Nil` becomes the
    /// declared default. Returns the value unchanged on mismatch.
    pub(crate) fn coerce(self, tag: TypeTag) -> Result<FieldValue, FieldValue> {
        match (tag, self) {
            (TypeTag::Object, value) => Ok(value),
            (TypeTag::Scalar(kind), FieldValue::Number(n)) => Ok(FieldValue::Number(n.cast(kind))),
            (TypeTag::Struct(st), FieldValue::Bytes(b))
                if b.tag() == st && b.bytes().len() == st.size =>
            {
                Ok(FieldValue::Bytes(b))
            }
            (TypeTag::Scalar(_) | TypeTag::Struct(_), value) if value.is_nil() => {
                Ok(FieldValue::default_for(tag))
            }
            (_, value) => Err(value),
        }
    }
}

impl PartialEq for FieldValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FieldValue::Number(a), FieldValue::Number(b)) => a == b,
            (FieldValue::Bytes(a), FieldValue::Bytes(b)) => a == b,
            (FieldValue::Object(a), FieldValue::Object(b)) => a == b,
            (
                FieldValue::Nil | FieldValue::Object(_) | FieldValue::Weak(_),
                FieldValue::Nil | FieldValue::Object(_) | FieldValue::Weak(_),
            ) => self.as_object() == other.as_object(),
            _ => false,
        }
    }
}

impl Eq for FieldValue {}

impl Hash for FieldValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            FieldValue::Number(n) => {
                2u8.hash(state);
                n.hash(state);
            }
            FieldValue::Bytes(b) => {
                3u8.hash(state);
                b.hash(state);
            }
            FieldValue::Nil | FieldValue::Object(_) | FieldValue::Weak(_) => {
                match self.as_object() {
                    Some(object) => {
                        1u8.hash(state);
                        object.hash(state);
                    }
                    None => 0u8.hash(state),
                }
            }
        }
    }
}

impl fmt::Debug for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Nil => f.write_str("nil"),
            FieldValue::Object(object) => fmt::Debug::fmt(object, f),
            FieldValue::Weak(weak) => fmt::Debug::fmt(weak, f),
            FieldValue::Number(n) => fmt::Debug::fmt(n, f),
            FieldValue::Bytes(b) => fmt::Debug::fmt(b, f),
        }
    }
}

impl From<NumberValue> for FieldValue {
    fn from(n: NumberValue) -> Self {
        FieldValue::Number(n)
    }
}

impl From<ByteValue> for FieldValue {
    fn from(b: ByteValue) -> Self {
        FieldValue::Bytes(b)
    }
}

impl From<ObjectRef> for FieldValue {
    fn from(object: ObjectRef) -> Self {
        FieldValue::Object(object)
    }
}

impl From<Option<ObjectRef>> for FieldValue {
    fn from(object: Option<ObjectRef>) -> Self {
        object.map_or(FieldValue::Nil, FieldValue::Object)
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::object(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::object(s.to_owned())
    }
}

impl From<RawValue> for FieldValue {
    fn from(raw: RawValue) -> Self {
        if let Some(n) = raw.to_number() {
            return FieldValue::Number(n);
        }
        match raw {
            RawValue::Object(object) => FieldValue::Object(object),
            RawValue::Struct { tag, bytes } => FieldValue::Bytes(ByteValue::new(tag, bytes)),
            _ => FieldValue::Nil,
        }
    }
}

/// Reads a typed value back out of a field.
pub trait FromFieldValue: Sized {
    fn from_field_value(value: &FieldValue) -> Option<Self>;
}

macro_rules! scalar_conversions {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for FieldValue {
                #[inline]
                fn from(v: $ty) -> Self {
                    FieldValue::Number(NumberValue::from(v))
                }
            }

            impl FromFieldValue for $ty {
                fn from_field_value(value: &FieldValue) -> Option<Self> {
                    match value.as_number()?.cast(ScalarKind::$variant) {
                        NumberValue::$variant(v) => Some(v),
                        _ => None,
                    }
                }
            }
        )*
    };
}

scalar_conversions! {
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
}

impl From<isize> for FieldValue {
    fn from(v: isize) -> Self {
        FieldValue::Number(NumberValue::from(v))
    }
}

impl From<usize> for FieldValue {
    fn from(v: usize) -> Self {
        FieldValue::Number(NumberValue::from(v))
    }
}

macro_rules! struct_conversions {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for FieldValue {
                fn from(v: $ty) -> Self {
                    FieldValue::from_struct(&v)
                }
            }

            impl From<$ty> for RawValue {
                fn from(v: $ty) -> Self {
                    RawValue::from_struct(&v)
                }
            }

            impl FromFieldValue for $ty {
                fn from_field_value(value: &FieldValue) -> Option<Self> {
                    value.as_bytes()?.decode::<$ty>()
                }
            }
        )*
    };
}

struct_conversions!(Point, Size, Rect, Range, AffineTransform, Transform3D);

impl FromFieldValue for String {
    fn from_field_value(value: &FieldValue) -> Option<Self> {
        value.as_object()?.downcast_ref::<String>().cloned()
    }
}

impl FromFieldValue for ObjectRef {
    fn from_field_value(value: &FieldValue) -> Option<Self> {
        value.as_object()
    }
}

impl FromFieldValue for NumberValue {
    fn from_field_value(value: &FieldValue) -> Option<Self> {
        value.as_number()
    }
}

impl FromFieldValue for ByteValue {
    fn from_field_value(value: &FieldValue) -> Option<Self> {
        value.as_bytes().cloned()
    }
}

impl FromFieldValue for FieldValue {
    fn from_field_value(value: &FieldValue) -> Option<Self> {
        Some(value.resolve())
    }
}
