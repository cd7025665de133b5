//! Field descriptors and the `Introspect` contract.
//!
//! A descriptor is the per-field metadata every other component works from:
//! the equality engine reads its tag, the setter synthesizer resolves
//! selectors against its accessor names, and construction uses it to pick
//! defaults and coerce supplied values.

use crate::value::StructValue;
use crate::{ScalarKind, Symbol, TypeTag};

/// How an object field holds its value.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Storage {
    #[default]
    Strong,
    /// The field does not keep its object alive.
    ///
    /// A weakly-held value can disappear without the owner noticing, so a
    /// class with a weak field does not have a stable hash by default.
    Weak,
}

/// Metadata for one declared field.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldDescriptor {
    pub name: Symbol,
    pub tag: TypeTag,
    pub storage: Storage,
    getter: Option<Symbol>,
    setter: Option<Symbol>,
}

impl FieldDescriptor {
    pub fn new(name: &str, tag: impl Into<TypeTag>) -> Self {
        FieldDescriptor {
            name: Symbol::intern(name),
            tag: tag.into(),
            storage: Storage::Strong,
            getter: None,
            setter: None,
        }
    }

    /// An `Object` field.
    pub fn object(name: &str) -> Self {
        Self::new(name, TypeTag::Object)
    }

    /// A scalar field.
    pub fn scalar(name: &str, kind: ScalarKind) -> Self {
        Self::new(name, TypeTag::Scalar(kind))
    }

    /// A structural field holding a `T`.
    pub fn structural<T: StructValue>(name: &str) -> Self {
        Self::new(name, TypeTag::Struct(T::tag()))
    }

    /// Use an explicit getter name instead of the field name.
    #[must_use]
    pub fn with_getter(mut self, getter: &str) -> Self {
        self.getter = Some(Symbol::intern(getter));
        self
    }

    /// Use an explicit setter name instead of `set<Name>`.
    #[must_use]
    pub fn with_setter(mut self, setter: &str) -> Self {
        self.setter = Some(Symbol::intern(setter));
        self
    }

    /// Hold the field's object weakly.
    #[must_use]
    pub fn weak(mut self) -> Self {
        self.storage = Storage::Weak;
        self
    }

    /// The explicit getter name, if one was declared.
    pub fn explicit_getter(&self) -> Option<Symbol> {
        self.getter
    }

    /// The explicit setter name, if one was declared.
    pub fn explicit_setter(&self) -> Option<Symbol> {
        self.setter
    }

    /// The getter selector: the explicit getter, else the field name.
    pub fn getter_name(&self) -> Symbol {
        self.getter.unwrap_or(self.name)
    }

    /// The setter selector: the explicit setter, else `set` followed by the
    /// field name with its first character upper-cased.
    pub fn setter_name(&self) -> Symbol {
        self.setter
            .unwrap_or_else(|| Symbol::intern(&conventional_setter(self.name.as_str())))
    }

    pub fn is_weak(&self) -> bool {
        self.storage == Storage::Weak
    }
}

/// `age` -> `setAge`, `dateOfBirth` -> `setDateOfBirth`.
pub fn conventional_setter(field: &str) -> String {
    let mut chars = field.chars();
    let mut setter = String::with_capacity(field.len() + 3);
    setter.push_str("set");
    if let Some(first) = chars.next() {
        setter.extend(first.to_uppercase());
        setter.push_str(chars.as_str());
    }
    setter
}

/// Supplies the ordered field descriptors of a type.
///
/// Implementations must be deterministic: every call returns the same
/// descriptors in the same order. Usually generated with
/// `#[derive(Introspect)]`; [`crate::ValueClass::of`] caches the result per
/// type.
pub trait Introspect: 'static {
    /// Name of the value class.
    const CLASS_NAME: &'static str;

    /// Declared fields, in declaration order.
    fn fields() -> Vec<FieldDescriptor>;

    /// Override for the stable-hash default (no weak fields).
    fn stable_hash() -> Option<bool> {
        None
    }
}

#[cfg(test)]
mod tests;
