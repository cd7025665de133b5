//! Generic numeric wrapper for scalar fields.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::ScalarKind;

/// A boxed scalar of a specific width.
///
/// Equality and hashing are bitwise within a kind: `F64(NaN)` equals itself,
/// `0.0` and `-0.0` differ, and values of different kinds are never equal.
#[derive(Copy, Clone)]
pub enum NumberValue {
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
}

impl NumberValue {
    pub const fn kind(self) -> ScalarKind {
        match self {
            NumberValue::Bool(_) => ScalarKind::Bool,
            NumberValue::I8(_) => ScalarKind::I8,
            NumberValue::I16(_) => ScalarKind::I16,
            NumberValue::I32(_) => ScalarKind::I32,
            NumberValue::I64(_) => ScalarKind::I64,
            NumberValue::U8(_) => ScalarKind::U8,
            NumberValue::U16(_) => ScalarKind::U16,
            NumberValue::U32(_) => ScalarKind::U32,
            NumberValue::U64(_) => ScalarKind::U64,
            NumberValue::F32(_) => ScalarKind::F32,
            NumberValue::F64(_) => ScalarKind::F64,
        }
    }

    /// The default value of a scalar field.
    pub const fn zero(kind: ScalarKind) -> Self {
        match kind {
            ScalarKind::Bool => NumberValue::Bool(false),
            ScalarKind::I8 => NumberValue::I8(0),
            ScalarKind::I16 => NumberValue::I16(0),
            ScalarKind::I32 => NumberValue::I32(0),
            ScalarKind::I64 => NumberValue::I64(0),
            ScalarKind::U8 => NumberValue::U8(0),
            ScalarKind::U16 => NumberValue::U16(0),
            ScalarKind::U32 => NumberValue::U32(0),
            ScalarKind::U64 => NumberValue::U64(0),
            ScalarKind::F32 => NumberValue::F32(0.0),
            ScalarKind::F64 => NumberValue::F64(0.0),
        }
    }

    /// Raw bit pattern, zero-extended to 64 bits.
    pub fn to_bits(self) -> u64 {
        match self {
            NumberValue::Bool(v) => u64::from(v),
            NumberValue::I8(v) => u64::from(v as u8),
            NumberValue::I16(v) => u64::from(v as u16),
            NumberValue::I32(v) => u64::from(v as u32),
            NumberValue::I64(v) => v as u64,
            NumberValue::U8(v) => u64::from(v),
            NumberValue::U16(v) => u64::from(v),
            NumberValue::U32(v) => u64::from(v),
            NumberValue::U64(v) => v,
            NumberValue::F32(v) => u64::from(v.to_bits()),
            NumberValue::F64(v) => v.to_bits(),
        }
    }

    fn as_i128(self) -> i128 {
        match self {
            NumberValue::Bool(v) => i128::from(v),
            NumberValue::I8(v) => i128::from(v),
            NumberValue::I16(v) => i128::from(v),
            NumberValue::I32(v) => i128::from(v),
            NumberValue::I64(v) => i128::from(v),
            NumberValue::U8(v) => i128::from(v),
            NumberValue::U16(v) => i128::from(v),
            NumberValue::U32(v) => i128::from(v),
            NumberValue::U64(v) => i128::from(v),
            NumberValue::F32(v) => v as i128,
            NumberValue::F64(v) => v as i128,
        }
    }

    pub fn as_f64(self) -> f64 {
        match self {
            NumberValue::F32(v) => f64::from(v),
            NumberValue::F64(v) => v,
            other => other.as_i128() as f64,
        }
    }

    /// Convert to another width with `as` semantics (integers wrap, floats
    /// truncate toward zero, any non-zero value is `true`).
    #[must_use]
    pub fn cast(self, kind: ScalarKind) -> Self {
        if self.kind() == kind {
            return self;
        }
        let int = self.as_i128();
        match kind {
            ScalarKind::Bool => NumberValue::Bool(match self {
                NumberValue::F32(v) => v != 0.0,
                NumberValue::F64(v) => v != 0.0,
                _ => int != 0,
            }),
            ScalarKind::I8 => NumberValue::I8(int as i8),
            ScalarKind::I16 => NumberValue::I16(int as i16),
            ScalarKind::I32 => NumberValue::I32(int as i32),
            ScalarKind::I64 => NumberValue::I64(int as i64),
            ScalarKind::U8 => NumberValue::U8(int as u8),
            ScalarKind::U16 => NumberValue::U16(int as u16),
            ScalarKind::U32 => NumberValue::U32(int as u32),
            ScalarKind::U64 => NumberValue::U64(int as u64),
            ScalarKind::F32 => NumberValue::F32(self.as_f64() as f32),
            ScalarKind::F64 => NumberValue::F64(self.as_f64()),
        }
    }
}

impl PartialEq for NumberValue {
    fn eq(&self, other: &Self) -> bool {
        self.kind() == other.kind() && self.to_bits() == other.to_bits()
    }
}

impl Eq for NumberValue {}

impl Hash for NumberValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind().hash(state);
        self.to_bits().hash(state);
    }
}

impl fmt::Debug for NumberValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumberValue::Bool(v) => write!(f, "{v}"),
            NumberValue::I8(v) => write!(f, "{v}i8"),
            NumberValue::I16(v) => write!(f, "{v}i16"),
            NumberValue::I32(v) => write!(f, "{v}i32"),
            NumberValue::I64(v) => write!(f, "{v}"),
            NumberValue::U8(v) => write!(f, "{v}u8"),
            NumberValue::U16(v) => write!(f, "{v}u16"),
            NumberValue::U32(v) => write!(f, "{v}u32"),
            NumberValue::U64(v) => write!(f, "{v}u64"),
            NumberValue::F32(v) => write!(f, "{v:?}f32"),
            NumberValue::F64(v) => write!(f, "{v:?}"),
        }
    }
}

macro_rules! number_conversions {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for NumberValue {
                #[inline]
                fn from(v: $ty) -> Self {
                    NumberValue::$variant(v)
                }
            }
        )*
    };
}

number_conversions! {
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

impl From<isize> for NumberValue {
    fn from(v: isize) -> Self {
        NumberValue::I64(v as i64)
    }
}

impl From<usize> for NumberValue {
    fn from(v: usize) -> Self {
        NumberValue::U64(v as u64)
    }
}
