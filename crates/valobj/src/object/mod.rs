//! Value-object instances.
//!
//! - [`ValueObject`]: a shared handle to an immutable instance. Cloning the
//!   handle is the `copy` operation; equal stable-hash instances are uniqued
//!   so they share one allocation.
//! - [`MutableValueObject`]: an instance of a registered mutable variant,
//!   owned by a single holder and written through setters. Never uniqued,
//!   never hash-cached. `freeze` copies it back into canonical form.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Weak};

use crate::engine::{self, ValueInstance};
use crate::synth::MutableClass;
use crate::value::{FieldValue, FromFieldValue, RawValue};
use crate::variants::variants;
use crate::{
    ClassId, FieldDescriptor, FieldValues, Storage, Symbol, ValueClass, ValueError, ValueResult,
};

/// Storage of an immutable instance.
///
/// Slots are written once by `ValueClass::bootstrap` and never again.
pub(crate) struct ImmutableObject {
    class: Arc<ValueClass>,
    fields: Box<[FieldValue]>,
    hash: Option<u64>,
}

/// Shared handle to an immutable value object.
#[derive(Clone)]
pub struct ValueObject(Arc<ImmutableObject>);

impl ValueObject {
    pub(crate) fn from_parts(class: Arc<ValueClass>, fields: Box<[FieldValue]>) -> Self {
        let hash = class
            .has_stable_hash()
            .then(|| engine::structural_hash(class.id(), &fields));
        ValueObject(Arc::new(ImmutableObject {
            class,
            fields,
            hash,
        }))
    }

    pub(crate) fn from_arc(inner: Arc<ImmutableObject>) -> Self {
        ValueObject(inner)
    }

    pub(crate) fn downgrade(&self) -> Weak<ImmutableObject> {
        Arc::downgrade(&self.0)
    }

    pub fn class(&self) -> &Arc<ValueClass> {
        &self.0.class
    }

    /// Whether both handles share one instance.
    pub fn ptr_eq(a: &ValueObject, b: &ValueObject) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }

    /// Read a field, or `None` if the class has no such field.
    pub fn get(&self, field: &str) -> Option<FieldValue> {
        let slot = self.0.class.index_of(field)?;
        Some(self.0.fields[slot].resolve())
    }

    /// Read a field as a `T`.
    pub fn get_as<T: FromFieldValue>(&self, field: &str) -> Option<T> {
        let slot = self.0.class.index_of(field)?;
        T::from_field_value(&self.0.fields[slot])
    }

    pub fn get_field_by_name(&self, field: &str) -> ValueResult<FieldValue> {
        self.get(field)
            .ok_or_else(|| self.0.class.unknown_field(field))
    }

    /// Read the field behind the getter `selector`.
    pub fn value_for_getter(&self, selector: &str) -> Option<FieldValue> {
        let slot = self.0.class.index_for_getter(selector)?;
        Some(self.0.fields[slot].resolve())
    }

    /// Descriptors paired with their current values, in declared order.
    pub fn iter(&self) -> impl Iterator<Item = (&FieldDescriptor, &FieldValue)> + '_ {
        self.0.class.fields().iter().zip(self.0.fields.iter())
    }

    /// The instance as a name -> value mapping.
    pub fn to_field_values(&self) -> FieldValues {
        self.iter()
            .map(|(field, value)| (field.name.as_str(), value.resolve()))
            .collect()
    }

    pub fn hash_value(&self) -> u64 {
        engine::hash_of(self)
    }

    /// Copy of an immutable value: the same instance.
    #[must_use]
    pub fn copy(&self) -> ValueObject {
        self.clone()
    }

    /// A mutable instance of the class's registered mutable variant,
    /// holding this instance's values.
    pub fn mutable_copy(&self) -> ValueResult<MutableValueObject> {
        let class = &self.0.class;
        let Some(variant) = variants().mutable_variant_for(class) else {
            tracing::debug!(class = %class.name(), "no mutable variant registered");
            return Err(ValueError::MissingVariantRegistration {
                class: class.name(),
            });
        };
        Ok(MutableValueObject::with_fields(
            variant,
            self.0.fields.to_vec(),
        ))
    }
}

impl ValueInstance for ValueObject {
    fn class_id(&self) -> ClassId {
        self.0.class.id()
    }

    fn class_name(&self) -> Symbol {
        self.0.class.name()
    }

    fn field_values(&self) -> &[FieldValue] {
        &self.0.fields
    }

    fn cached_hash(&self) -> Option<u64> {
        self.0.hash
    }
}

impl PartialEq for ValueObject {
    fn eq(&self, other: &Self) -> bool {
        ValueObject::ptr_eq(self, other) || engine::equals(self, other)
    }
}

impl Eq for ValueObject {}

impl Hash for ValueObject {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash_value());
    }
}

impl fmt::Debug for ValueObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        debug_fields(f, self.0.class.name(), self.0.class.fields(), &self.0.fields)
    }
}

fn debug_fields(
    f: &mut fmt::Formatter<'_>,
    class: Symbol,
    descriptors: &[FieldDescriptor],
    values: &[FieldValue],
) -> fmt::Result {
    let mut s = f.debug_struct(class.as_str());
    for (field, value) in descriptors.iter().zip(values) {
        s.field(field.name.as_str(), value);
    }
    s.finish()
}

impl From<ValueObject> for FieldValue {
    fn from(object: ValueObject) -> Self {
        FieldValue::object(object)
    }
}

impl From<ValueObject> for RawValue {
    fn from(object: ValueObject) -> Self {
        RawValue::Object(crate::ObjectRef::new(object))
    }
}

impl FromFieldValue for ValueObject {
    fn from_field_value(value: &FieldValue) -> Option<Self> {
        value.as_object()?.downcast_ref::<ValueObject>().cloned()
    }
}

/// An instance of a mutable variant.
#[derive(Clone)]
pub struct MutableValueObject {
    class: Arc<MutableClass>,
    fields: Vec<FieldValue>,
}

impl MutableValueObject {
    pub(crate) fn with_fields(class: Arc<MutableClass>, fields: Vec<FieldValue>) -> Self {
        MutableValueObject { class, fields }
    }

    pub fn class(&self) -> &Arc<MutableClass> {
        &self.class
    }

    /// Read a field, upgrading a weak reference.
    pub fn get_field_by_name(&self, field: &str) -> ValueResult<FieldValue> {
        let base = self.class.base();
        let slot = base.index_of(field).ok_or_else(|| base.unknown_field(field))?;
        Ok(self.fields[slot].resolve())
    }

    pub fn get_as<T: FromFieldValue>(&self, field: &str) -> Option<T> {
        let slot = self.class.base().index_of(field)?;
        T::from_field_value(&self.fields[slot])
    }

    /// Store `value` in the named field.
    ///
    /// This is the raw write every setter funnels through. It never calls
    /// a setter and never validates or uniques; it only honors the field's
    /// weak storage.
    pub fn set_field_by_name(&mut self, field: &str, value: impl Into<FieldValue>) -> ValueResult<()> {
        let base = self.class.base();
        let slot = base.index_of(field).ok_or_else(|| base.unknown_field(field))?;
        let value = value.into();
        self.fields[slot] = match base.fields()[slot].storage {
            Storage::Weak => value.downgrade(),
            Storage::Strong => value,
        };
        Ok(())
    }

    /// Call the setter installed under `selector`.
    pub fn invoke(&mut self, selector: &str, arg: impl Into<RawValue>) -> ValueResult<()> {
        let class = Arc::clone(&self.class);
        let setter = class.setter(selector).ok_or_else(|| ValueError::UnknownSetter {
            class: class.name(),
            selector: selector.to_owned(),
        })?;
        setter.call(self, arg)
    }

    /// Whether the class has a setter named `selector`.
    pub fn responds_to(&self, selector: &str) -> bool {
        self.class.setter(selector).is_some()
    }

    /// Field-by-field copy into a new instance of the same mutable class.
    #[must_use]
    pub fn copy(&self) -> MutableValueObject {
        self.clone()
    }

    /// A mutable copy of a mutable instance: another instance of the same
    /// mutable class.
    #[must_use]
    pub fn mutable_copy(&self) -> MutableValueObject {
        self.clone()
    }

    /// The canonical immutable instance holding the current values.
    pub fn freeze(&self) -> ValueResult<ValueObject> {
        self.class.base().bootstrap(self.fields.clone())
    }

    /// Structural hash, recomputed on every call.
    pub fn hash_value(&self) -> u64 {
        engine::hash_of(self)
    }
}

impl ValueInstance for MutableValueObject {
    fn class_id(&self) -> ClassId {
        self.class.id()
    }

    fn class_name(&self) -> Symbol {
        self.class.name()
    }

    fn field_values(&self) -> &[FieldValue] {
        &self.fields
    }
}

impl PartialEq for MutableValueObject {
    fn eq(&self, other: &Self) -> bool {
        engine::equals(self, other)
    }
}

impl Eq for MutableValueObject {}

impl fmt::Debug for MutableValueObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        debug_fields(f, self.class.name(), self.class.base().fields(), &self.fields)
    }
}
