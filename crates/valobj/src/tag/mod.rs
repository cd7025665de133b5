//! Type tags: the classification of a field's declared type.
//!
//! A tag selects both the equality/hash rule a field uses and the setter
//! generator that can write it.

use std::fmt;

use crate::Symbol;

/// Fixed-width scalar kinds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScalarKind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
}

impl ScalarKind {
    /// Every scalar kind, in declaration order.
    pub const ALL: [ScalarKind; 11] = [
        ScalarKind::Bool,
        ScalarKind::I8,
        ScalarKind::I16,
        ScalarKind::I32,
        ScalarKind::I64,
        ScalarKind::U8,
        ScalarKind::U16,
        ScalarKind::U32,
        ScalarKind::U64,
        ScalarKind::F32,
        ScalarKind::F64,
    ];

    /// Rust spelling of the kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            ScalarKind::Bool => "bool",
            ScalarKind::I8 => "i8",
            ScalarKind::I16 => "i16",
            ScalarKind::I32 => "i32",
            ScalarKind::I64 => "i64",
            ScalarKind::U8 => "u8",
            ScalarKind::U16 => "u16",
            ScalarKind::U32 => "u32",
            ScalarKind::U64 => "u64",
            ScalarKind::F32 => "f32",
            ScalarKind::F64 => "f64",
        }
    }

    pub const fn is_float(self) -> bool {
        matches!(self, ScalarKind::F32 | ScalarKind::F64)
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fixed-layout structural value type, identified by name.
///
/// Two structural values are equal iff they carry the same tag and the same
/// bytes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct StructTag {
    pub name: Symbol,
    /// Size of the value's byte representation.
    pub size: usize,
}

impl StructTag {
    pub fn new(name: &str, size: usize) -> Self {
        StructTag {
            name: Symbol::intern(name),
            size,
        }
    }
}

/// Classification of a field's declared type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeTag {
    /// Any shared object compared by value.
    Object,
    /// A fixed-width scalar.
    Scalar(ScalarKind),
    /// A fixed-layout structural value compared byte-wise.
    Struct(StructTag),
    /// A declared type with no equality or hash rule.
    ///
    /// Classes containing an opaque field fail validation when built.
    Opaque(Symbol),
}

impl TypeTag {
    /// Whether values of this tag have a defined equality and hash rule.
    pub const fn is_comparable(self) -> bool {
        !matches!(self, TypeTag::Opaque(_))
    }
}

impl From<ScalarKind> for TypeTag {
    fn from(kind: ScalarKind) -> Self {
        TypeTag::Scalar(kind)
    }
}

impl From<StructTag> for TypeTag {
    fn from(tag: StructTag) -> Self {
        TypeTag::Struct(tag)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::Object => f.write_str("object"),
            TypeTag::Scalar(kind) => write!(f, "{kind}"),
            TypeTag::Struct(tag) => write!(f, "struct {} ({} bytes)", tag.name, tag.size),
            TypeTag::Opaque(name) => write!(f, "opaque `{name}`"),
        }
    }
}
