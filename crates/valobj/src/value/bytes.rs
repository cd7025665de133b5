//! Byte-comparable wrapper for fixed-layout structural values.

use std::fmt;
use std::sync::Arc;

use crate::StructTag;

/// A fixed-layout value type that can be stored in a `Struct` field.
///
/// The byte representation must be canonical: two values are equal iff
/// their bytes are equal.
pub trait StructValue: Sized {
    /// Name of the struct type; keys the setter generator table.
    const NAME: &'static str;
    /// Length of the byte representation.
    const SIZE: usize;

    fn write_bytes(&self, out: &mut Vec<u8>);

    /// Decode from exactly `SIZE` bytes.
    fn read_bytes(bytes: &[u8]) -> Option<Self>;

    fn tag() -> StructTag {
        StructTag::new(Self::NAME, Self::SIZE)
    }

    fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(Self::SIZE);
        self.write_bytes(&mut out);
        out
    }
}

/// A structural value boxed as tagged bytes.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ByteValue {
    tag: StructTag,
    bytes: Arc<[u8]>,
}

impl ByteValue {
    pub fn new(tag: StructTag, bytes: impl Into<Arc<[u8]>>) -> Self {
        ByteValue {
            tag,
            bytes: bytes.into(),
        }
    }

    /// The default value of a structural field.
    pub fn zeroed(tag: StructTag) -> Self {
        ByteValue::new(tag, vec![0u8; tag.size])
    }

    pub fn of<T: StructValue>(value: &T) -> Self {
        ByteValue::new(T::tag(), value.to_bytes())
    }

    pub fn tag(&self) -> StructTag {
        self.tag
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Decode as a `T` if the tag names `T`.
    pub fn decode<T: StructValue>(&self) -> Option<T> {
        if self.tag != T::tag() {
            return None;
        }
        T::read_bytes(&self.bytes)
    }
}

impl fmt::Debug for ByteValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}<", self.tag.name)?;
        for byte in self.bytes.iter() {
            write!(f, "{byte:02x}")?;
        }
        f.write_str(">")
    }
}

/// Sequential little-endian reader over a struct's bytes.
pub(crate) struct ByteReader<'a> {
    bytes: &'a [u8],
}

impl<'a> ByteReader<'a> {
    pub(crate) fn new(bytes: &'a [u8]) -> Self {
        ByteReader { bytes }
    }

    fn take8(&mut self) -> Option<[u8; 8]> {
        let (head, rest) = self.bytes.split_first_chunk::<8>()?;
        self.bytes = rest;
        Some(*head)
    }

    pub(crate) fn f64(&mut self) -> Option<f64> {
        self.take8().map(f64::from_le_bytes)
    }

    pub(crate) fn u64(&mut self) -> Option<u64> {
        self.take8().map(u64::from_le_bytes)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
