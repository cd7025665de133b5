//! Immutable value classes.
//!
//! A [`ValueClass`] is the validated, process-lifetime description of an
//! immutable variant: its ordered field descriptors, name indices for
//! fields and accessors, and whether instances have a stable hash.
//!
//! # Design
//!
//! - Classes are built once and shared as `Arc<ValueClass>`
//! - Validation happens in `build`: a class that exists is usable
//! - `of::<T>()` caches the introspected class per Rust type

use std::any::TypeId;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, LazyLock};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::registry::instance_registry;
use crate::{
    FieldDescriptor, FieldValue, Introspect, Storage, Symbol, TypeTag, ValueError, ValueObject,
    ValueResult,
};

/// Identity of a concrete class, immutable or mutable.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(u32);

impl ClassId {
    /// Allocate a new, never-reused id.
    pub(crate) fn fresh() -> Self {
        static NEXT: AtomicU32 = AtomicU32::new(1);
        ClassId(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// A validated immutable value class.
#[derive(Debug)]
pub struct ValueClass {
    id: ClassId,
    name: Symbol,
    fields: Box<[FieldDescriptor]>,
    /// Field name -> slot.
    by_name: FxHashMap<Symbol, usize>,
    /// Getter selector -> slot.
    by_getter: FxHashMap<Symbol, usize>,
    /// Setter selector -> slot.
    by_setter: FxHashMap<Symbol, usize>,
    stable_hash: bool,
}

/// Builder for [`ValueClass`].
#[derive(Debug)]
pub struct ValueClassBuilder {
    name: Symbol,
    fields: Vec<FieldDescriptor>,
    stable_hash: Option<bool>,
}

impl ValueClassBuilder {
    #[must_use]
    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    #[must_use]
    pub fn fields(mut self, fields: impl IntoIterator<Item = FieldDescriptor>) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Override the stable-hash default.
    ///
    /// Without an override a class has a stable hash unless it declares a
    /// weak object field. Classes without a stable hash are never uniqued
    /// and never cache their hash.
    #[must_use]
    pub fn stable_hash(mut self, stable: bool) -> Self {
        self.stable_hash = Some(stable);
        self
    }

    /// Validate the descriptors and publish the class.
    #[tracing::instrument(level = "debug", skip_all, fields(class = %self.name, count = self.fields.len()))]
    pub fn build(self) -> ValueResult<Arc<ValueClass>> {
        let ValueClassBuilder {
            name,
            fields,
            stable_hash,
        } = self;

        let mut by_name = FxHashMap::default();
        let mut by_getter = FxHashMap::default();
        let mut by_setter = FxHashMap::default();

        for (slot, field) in fields.iter().enumerate() {
            if !field.tag.is_comparable() {
                tracing::error!(field = %field.name, tag = %field.tag, "field type has no equality rule");
                return Err(ValueError::UncomparableField {
                    class: name,
                    field: field.name,
                    tag: field.tag,
                });
            }
            if field.storage == Storage::Weak && field.tag != TypeTag::Object {
                return Err(ValueError::WeakNonObjectField {
                    class: name,
                    field: field.name,
                    tag: field.tag,
                });
            }
            let duplicate = |field| ValueError::DuplicateField { class: name, field };
            if by_name.insert(field.name, slot).is_some() {
                return Err(duplicate(field.name));
            }
            if by_getter.insert(field.getter_name(), slot).is_some() {
                return Err(duplicate(field.getter_name()));
            }
            if by_setter.insert(field.setter_name(), slot).is_some() {
                return Err(duplicate(field.setter_name()));
            }
        }

        let has_weak_object = fields.iter().any(|f| f.storage == Storage::Weak);
        let stable_hash = stable_hash.unwrap_or(!has_weak_object);

        tracing::debug!(stable_hash, "value class validated");

        Ok(Arc::new(ValueClass {
            id: ClassId::fresh(),
            name,
            fields: fields.into_boxed_slice(),
            by_name,
            by_getter,
            by_setter,
            stable_hash,
        }))
    }
}

/// Classes introspected from Rust types, keyed by `TypeId`.
static INTROSPECTED: LazyLock<RwLock<FxHashMap<TypeId, Arc<ValueClass>>>> =
    LazyLock::new(|| RwLock::new(FxHashMap::default()));

impl ValueClass {
    pub fn builder(name: &str) -> ValueClassBuilder {
        ValueClassBuilder {
            name: Symbol::intern(name),
            fields: Vec::new(),
            stable_hash: None,
        }
    }

    /// The class described by `T`, introspected once per process.
    pub fn of<T: Introspect>() -> ValueResult<Arc<ValueClass>> {
        let key = TypeId::of::<T>();

        // Fast path: already introspected
        if let Some(class) = INTROSPECTED.read().get(&key) {
            return Ok(Arc::clone(class));
        }

        // Introspect unlocked: `fields()` may itself call `of` for other types
        let mut builder = ValueClass::builder(T::CLASS_NAME).fields(T::fields());
        if let Some(stable) = T::stable_hash() {
            builder = builder.stable_hash(stable);
        }
        let class = builder.build()?;

        // First class published for `T` wins a concurrent race
        Ok(Arc::clone(INTROSPECTED.write().entry(key).or_insert(class)))
    }

    pub fn id(&self) -> ClassId {
        self.id
    }

    pub fn name(&self) -> Symbol {
        self.name
    }

    /// Declared fields, in order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn has_stable_hash(&self) -> bool {
        self.stable_hash
    }

    /// Slot of the field named `name`.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        let name = Symbol::lookup(name)?;
        self.by_name.get(&name).copied()
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.index_of(name).map(|slot| &self.fields[slot])
    }

    /// Slot read by the getter `selector`.
    pub fn index_for_getter(&self, selector: &str) -> Option<usize> {
        let selector = Symbol::lookup(selector)?;
        self.by_getter.get(&selector).copied()
    }

    /// Field written by the setter `selector`.
    pub fn field_for_setter(&self, selector: Symbol) -> Option<&FieldDescriptor> {
        self.by_setter.get(&selector).map(|&slot| &self.fields[slot])
    }

    pub(crate) fn unknown_field(&self, field: &str) -> ValueError {
        ValueError::UnknownField {
            class: self.name,
            field: field.to_owned(),
        }
    }

    /// Every field at its default.
    pub(crate) fn default_slots(&self) -> Vec<FieldValue> {
        self.fields
            .iter()
            .map(|field| FieldValue::default_for(field.tag))
            .collect()
    }

    /// Construct an instance from a name -> value mapping.
    ///
    /// Unknown names are ignored and missing names take the field default.
    pub fn construct(self: &Arc<Self>, values: &FieldValues) -> ValueResult<ValueObject> {
        let mut slots = self.default_slots();
        for (name, value) in values.iter() {
            match self.index_of(name) {
                Some(slot) => slots[slot] = value.clone(),
                None => tracing::trace!(class = %self.name, name, "ignoring unknown field"),
            }
        }
        self.bootstrap(slots)
    }

    /// Construct an instance from ordered `(name, value)` pairs.
    ///
    /// Same rules as [`construct`](Self::construct); a later pair for the
    /// same name replaces an earlier one.
    pub fn construct_pairs<I, K, V>(self: &Arc<Self>, pairs: I) -> ValueResult<ValueObject>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<FieldValue>,
    {
        let mut slots = self.default_slots();
        for (name, value) in pairs {
            let name = name.as_ref();
            match self.index_of(name) {
                Some(slot) => slots[slot] = value.into(),
                None => tracing::trace!(class = %self.name, name, "ignoring unknown field"),
            }
        }
        self.bootstrap(slots)
    }

    /// Fit slots to their declared types, build the instance, and unique it
    /// when the class has a stable hash.
    pub(crate) fn bootstrap(self: &Arc<Self>, slots: Vec<FieldValue>) -> ValueResult<ValueObject> {
        let fitted = self
            .fields
            .iter()
            .zip(slots)
            .map(|(field, value)| {
                let value = value.coerce(field.tag).map_err(|value| {
                    ValueError::FieldTypeMismatch {
                        class: self.name,
                        field: field.name,
                        expected: field.tag,
                        found: value.kind_name(),
                    }
                })?;
                Ok(match field.storage {
                    Storage::Weak => value.downgrade(),
                    Storage::Strong => value.resolve(),
                })
            })
            .collect::<ValueResult<Box<[FieldValue]>>>()?;

        let object = ValueObject::from_parts(Arc::clone(self), fitted);
        if self.stable_hash {
            Ok(instance_registry().unique_or_register(object))
        } else {
            Ok(object)
        }
    }
}

/// A name -> value mapping used to construct instances.
#[derive(Clone, Debug, Default)]
pub struct FieldValues {
    entries: FxHashMap<String, FieldValue>,
}

impl FieldValues {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> Option<FieldValue> {
        self.entries.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> + '_ {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for FieldValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut values = FieldValues::new();
        for (name, value) in iter {
            values.insert(name, value);
        }
        values
    }
}

#[cfg(test)]
mod tests;
