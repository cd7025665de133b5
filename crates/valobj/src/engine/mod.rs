//! Structural equality and hashing.
//!
//! Both operations walk the field slots in descriptor order. Nothing here
//! is per-class code: any instance exposing its class identity and slots
//! through [`ValueInstance`] gets equality and a hash for free.

use std::hash::{Hash, Hasher};

use rustc_hash::FxHasher;

use crate::value::FieldValue;
use crate::{ClassId, Symbol};

/// An instance the engine can compare and hash.
pub trait ValueInstance {
    /// Identity of the concrete class.
    fn class_id(&self) -> ClassId;

    fn class_name(&self) -> Symbol;

    /// Slots in descriptor order.
    fn field_values(&self) -> &[FieldValue];

    /// Hash computed at construction, for classes with a stable hash.
    fn cached_hash(&self) -> Option<u64> {
        None
    }
}

/// Structural equality.
///
/// Instances of different concrete classes are never equal, including an
/// immutable class and its mutable variant. Otherwise fields are compared
/// in order and the first mismatch ends the comparison.
pub fn equals(a: &dyn ValueInstance, b: &dyn ValueInstance) -> bool {
    if a.class_id() != b.class_id() {
        return false;
    }
    let (left, right) = (a.field_values(), b.field_values());
    if std::ptr::eq(left, right) {
        return true;
    }
    left.len() == right.len() && left.iter().zip(right).all(|(x, y)| x == y)
}

/// Hash of `instance`: the cached hash when present, else recomputed.
pub fn hash_of(instance: &dyn ValueInstance) -> u64 {
    instance
        .cached_hash()
        .unwrap_or_else(|| structural_hash(instance.class_id(), instance.field_values()))
}

/// Fold per-field hashes in order, seeded by the class.
///
/// The fold is order-sensitive: permuting two unequal fields changes the
/// result.
pub fn structural_hash(class: ClassId, fields: &[FieldValue]) -> u64 {
    let seed = u64::from(class.raw()).wrapping_mul(SEED);
    fields
        .iter()
        .fold(seed, |acc, field| mix(acc, field_hash(field)))
}

const SEED: u64 = 0x51_7c_c1_b7_27_22_0a_95;

/// One step of the order-sensitive fold.
#[inline]
pub fn mix(acc: u64, field: u64) -> u64 {
    (acc.rotate_left(5) ^ field).wrapping_mul(SEED)
}

/// Hash of a single field value.
pub fn field_hash(value: &FieldValue) -> u64 {
    let mut hasher = FxHasher::default();
    value.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests;
