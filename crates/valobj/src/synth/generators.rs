//! Setter generators, keyed by type tag.
//!
//! A generator turns a field binding into a setter closure. The table is
//! extensible: register a generator for a new struct type and mutable
//! variants declaring setters for fields of that type start validating.

use std::fmt;
use std::sync::{Arc, LazyLock};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use super::SetterFn;
use crate::object::MutableValueObject;
use crate::value::{
    AffineTransform, FieldValue, Point, RawValue, Range, Rect, Size, StructValue,
};
use crate::{ScalarKind, Symbol, TypeTag, ValueError};

/// The field a setter is being generated for.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FieldBinding {
    /// Mutable class being synthesized.
    pub class: Symbol,
    pub selector: Symbol,
    pub field: Symbol,
    pub tag: TypeTag,
}

impl FieldBinding {
    /// The error for an argument this setter cannot store.
    pub fn mismatch(&self, arg: &RawValue) -> ValueError {
        ValueError::ArgumentMismatch {
            selector: self.selector,
            expected: self.tag,
            found: arg.kind_name(),
        }
    }
}

/// Builds a setter for a field binding.
pub type Generator = Arc<dyn Fn(&FieldBinding) -> SetterFn + Send + Sync>;

/// Lookup key of the generator table.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GeneratorKey {
    Object,
    Scalar(ScalarKind),
    /// Struct types are keyed by name.
    Struct(Symbol),
}

impl GeneratorKey {
    /// Key for `tag`; opaque tags have none.
    pub fn for_tag(tag: TypeTag) -> Option<Self> {
        match tag {
            TypeTag::Object => Some(GeneratorKey::Object),
            TypeTag::Scalar(kind) => Some(GeneratorKey::Scalar(kind)),
            TypeTag::Struct(st) => Some(GeneratorKey::Struct(st.name)),
            TypeTag::Opaque(_) => None,
        }
    }
}

/// Table of setter generators.
pub struct SetterGenerators {
    table: RwLock<FxHashMap<GeneratorKey, Generator>>,
}

impl SetterGenerators {
    /// A table with no generators.
    pub fn empty() -> Self {
        SetterGenerators {
            table: RwLock::new(FxHashMap::default()),
        }
    }

    /// Object, every scalar kind, and the bundled 2D geometry, range, and
    /// affine transform types.
    ///
    /// `Transform3D` is not included; its setters must be hand-written or
    /// enabled with `register_struct::<Transform3D>()`.
    pub fn with_defaults() -> Self {
        let generators = Self::empty();
        generators.register(GeneratorKey::Object, object_setter);
        for kind in ScalarKind::ALL {
            generators.register(GeneratorKey::Scalar(kind), scalar_setter);
        }
        generators.register_struct::<Point>();
        generators.register_struct::<Size>();
        generators.register_struct::<Rect>();
        generators.register_struct::<Range>();
        generators.register_struct::<AffineTransform>();
        generators
    }

    /// Install `generator` under `key`, replacing any previous one.
    pub fn register<G>(&self, key: GeneratorKey, generator: G)
    where
        G: Fn(&FieldBinding) -> SetterFn + Send + Sync + 'static,
    {
        tracing::debug!(?key, "registering setter generator");
        self.table.write().insert(key, Arc::new(generator));
    }

    /// Generate byte-wrapping setters for fields of struct type `T`.
    pub fn register_struct<T: StructValue>(&self) {
        self.register(GeneratorKey::Struct(Symbol::intern(T::NAME)), struct_setter);
    }

    pub fn supports(&self, tag: TypeTag) -> bool {
        GeneratorKey::for_tag(tag).is_some_and(|key| self.table.read().contains_key(&key))
    }

    /// Generate the setter for `binding`, or `None` when no generator
    /// matches its tag.
    pub fn generate(&self, binding: &FieldBinding) -> Option<SetterFn> {
        let key = GeneratorKey::for_tag(binding.tag)?;
        let generator = self.table.read().get(&key).cloned()?;
        Some(generator(binding))
    }
}

impl Default for SetterGenerators {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl fmt::Debug for SetterGenerators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let table = self.table.read();
        f.debug_set().entries(table.keys()).finish()
    }
}

/// Stores the object argument as-is.
fn object_setter(binding: &FieldBinding) -> SetterFn {
    let binding = *binding;
    Arc::new(move |target: &mut MutableValueObject, arg: RawValue| {
        let value = match arg {
            RawValue::Nil => FieldValue::Nil,
            RawValue::Object(object) => FieldValue::Object(object),
            other => return Err(binding.mismatch(&other)),
        };
        target.set_field_by_name(binding.field.as_str(), value)
    })
}

/// Boxes the scalar argument into a number of the field's width.
fn scalar_setter(binding: &FieldBinding) -> SetterFn {
    let binding = *binding;
    Arc::new(move |target: &mut MutableValueObject, arg: RawValue| {
        let (TypeTag::Scalar(kind), Some(number)) = (binding.tag, arg.to_number()) else {
            return Err(binding.mismatch(&arg));
        };
        target.set_field_by_name(binding.field.as_str(), FieldValue::Number(number.cast(kind)))
    })
}

/// Wraps the struct argument's bytes into a byte value.
fn struct_setter(binding: &FieldBinding) -> SetterFn {
    let binding = *binding;
    Arc::new(move |target: &mut MutableValueObject, arg: RawValue| {
        let TypeTag::Struct(tag) = binding.tag else {
            return Err(binding.mismatch(&arg));
        };
        let bytes = arg.into_bytes(tag).map_err(|arg| binding.mismatch(&arg))?;
        target.set_field_by_name(binding.field.as_str(), FieldValue::Bytes(bytes))
    })
}

static GENERATORS: LazyLock<SetterGenerators> = LazyLock::new(SetterGenerators::with_defaults);

/// The process-wide generator table consulted by `MutableClassBuilder::build`.
pub fn setter_generators() -> &'static SetterGenerators {
    &GENERATORS
}
