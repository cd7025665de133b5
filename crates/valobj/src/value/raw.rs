//! Unwrapped setter arguments.

use super::{ByteValue, NumberValue, ObjectRef, StructValue};
use crate::StructTag;

/// The raw argument passed to a setter, before it is boxed for storage.
///
/// Scalar arguments arrive as bare numbers and struct arguments as bare
/// bytes; the synthesized setter for the target field wraps them in a
/// [`NumberValue`] or [`ByteValue`].
#[derive(Clone, Debug)]
pub enum RawValue {
    Nil,
    Object(ObjectRef),
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    Struct { tag: StructTag, bytes: Vec<u8> },
}

impl RawValue {
    pub fn from_struct<T: StructValue>(value: &T) -> Self {
        RawValue::Struct {
            tag: T::tag(),
            bytes: value.to_bytes(),
        }
    }

    /// Box a scalar argument.
    pub fn to_number(&self) -> Option<NumberValue> {
        Some(match *self {
            RawValue::Bool(v) => NumberValue::Bool(v),
            RawValue::I8(v) => NumberValue::I8(v),
            RawValue::I16(v) => NumberValue::I16(v),
            RawValue::I32(v) => NumberValue::I32(v),
            RawValue::I64(v) => NumberValue::I64(v),
            RawValue::U8(v) => NumberValue::U8(v),
            RawValue::U16(v) => NumberValue::U16(v),
            RawValue::U32(v) => NumberValue::U32(v),
            RawValue::U64(v) => NumberValue::U64(v),
            RawValue::F32(v) => NumberValue::F32(v),
            RawValue::F64(v) => NumberValue::F64(v),
            RawValue::Nil | RawValue::Object(_) | RawValue::Struct { .. } => return None,
        })
    }

    /// Wrap a struct argument if it carries `tag`.
    pub fn into_bytes(self, tag: StructTag) -> Result<ByteValue, Self> {
        match self {
            RawValue::Struct { tag: found, bytes } if found == tag && bytes.len() == tag.size => {
                Ok(ByteValue::new(tag, bytes))
            }
            other => Err(other),
        }
    }

    /// Short description of the argument's kind, for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            RawValue::Nil => "nil",
            RawValue::Object(_) => "object",
            RawValue::Struct { .. } => "struct",
            other => other.to_number().map_or("value", |n| n.kind().as_str()),
        }
    }
}

impl From<NumberValue> for RawValue {
    fn from(n: NumberValue) -> Self {
        match n {
            NumberValue::Bool(v) => RawValue::Bool(v),
            NumberValue::I8(v) => RawValue::I8(v),
            NumberValue::I16(v) => RawValue::I16(v),
            NumberValue::I32(v) => RawValue::I32(v),
            NumberValue::I64(v) => RawValue::I64(v),
            NumberValue::U8(v) => RawValue::U8(v),
            NumberValue::U16(v) => RawValue::U16(v),
            NumberValue::U32(v) => RawValue::U32(v),
            NumberValue::U64(v) => RawValue::U64(v),
            NumberValue::F32(v) => RawValue::F32(v),
            NumberValue::F64(v) => RawValue::F64(v),
        }
    }
}

macro_rules! raw_scalar_conversions {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for RawValue {
                #[inline]
                fn from(v: $ty) -> Self {
                    RawValue::from(NumberValue::from(v))
                }
            }
        )*
    };
}

raw_scalar_conversions!(bool, i8, i16, i32, i64, u8, u16, u32, u64, f32, f64, isize, usize);

impl From<ObjectRef> for RawValue {
    fn from(object: ObjectRef) -> Self {
        RawValue::Object(object)
    }
}

impl From<Option<ObjectRef>> for RawValue {
    fn from(object: Option<ObjectRef>) -> Self {
        object.map_or(RawValue::Nil, RawValue::Object)
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::Object(ObjectRef::new(s))
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::from(s.to_owned())
    }
}
