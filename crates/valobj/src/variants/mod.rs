//! Variant registration table.
//!
//! Process-wide, append-only record of which mutable classes stand in for
//! which immutable class, plus the mutable classes declared so far. Read
//! by `ValueObject::mutable_copy`; lookup is by exact class only.
//!
//! # Thread Safety
//! Two `RwLock`s, never held together: `mutable_variant_for` copies the
//! registered names out before resolving them. Synthesis of one mutable
//! class is serialized by a per-name gate and runs with neither lock held.

use std::sync::{Arc, LazyLock};

use parking_lot::{Mutex, RwLock};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::synth::MutableClass;
use crate::{ClassId, Symbol, ValueClass, ValueError, ValueResult};

/// Mutable class names registered for one base, in registration order.
type VariantNames = SmallVec<[Symbol; 1]>;

/// Immutable class -> registered mutable variants.
pub struct VariantTable {
    by_base: RwLock<FxHashMap<ClassId, VariantNames>>,
    classes: RwLock<FxHashMap<Symbol, Arc<MutableClass>>>,
    declaring: Mutex<FxHashMap<Symbol, Arc<Mutex<()>>>>,
}

impl VariantTable {
    pub fn new() -> Self {
        VariantTable {
            by_base: RwLock::new(FxHashMap::default()),
            classes: RwLock::new(FxHashMap::default()),
            declaring: Mutex::new(FxHashMap::default()),
        }
    }

    /// Record `name` as a mutable variant of `base`.
    ///
    /// Registering the same pair again has no effect.
    pub fn register_mutable_variant(&self, base: &ValueClass, name: &str) {
        self.register(base.id(), Symbol::intern(name), base.name());
    }

    fn register(&self, base: ClassId, name: Symbol, base_name: Symbol) {
        let mut by_base = self.by_base.write();
        let names = by_base.entry(base).or_default();
        if names.contains(&name) {
            return;
        }
        names.push(name);
        tracing::debug!(base = %base_name, variant = %name, "registered mutable variant");
    }

    /// Names registered for `base`, in registration order.
    pub fn registered_names(&self, base: &ValueClass) -> Vec<Symbol> {
        self.by_base
            .read()
            .get(&base.id())
            .map(|names| names.to_vec())
            .unwrap_or_default()
    }

    /// The declared mutable class named `name`.
    pub fn mutable_class(&self, name: &str) -> Option<Arc<MutableClass>> {
        let name = Symbol::lookup(name)?;
        self.classes.read().get(&name).cloned()
    }

    /// The first registered variant of `base` that has been declared
    /// against `base` itself.
    pub fn mutable_variant_for(&self, base: &ValueClass) -> Option<Arc<MutableClass>> {
        let names = self.by_base.read().get(&base.id()).cloned()?;
        let classes = self.classes.read();
        names
            .iter()
            .filter_map(|name| classes.get(name))
            .find(|class| class.base().id() == base.id())
            .cloned()
    }

    /// Publish the mutable class `name`, running `synthesize` at most once.
    ///
    /// A later declaration of the same name returns the published class,
    /// or fails with `DuplicateClass` if it names a different base. A
    /// failed synthesis publishes nothing.
    pub(crate) fn declare<F>(
        &self,
        name: Symbol,
        base: ClassId,
        synthesize: F,
    ) -> ValueResult<Arc<MutableClass>>
    where
        F: FnOnce() -> ValueResult<MutableClass>,
    {
        if let Some(existing) = self.classes.read().get(&name) {
            return same_base(existing, base, name);
        }

        let gate = Arc::clone(self.declaring.lock().entry(name).or_default());
        let _declaring = gate.lock();

        // Double-check once this name's gate is held
        if let Some(existing) = self.classes.read().get(&name) {
            return same_base(existing, base, name);
        }

        let class = Arc::new(synthesize()?);
        self.classes.write().insert(name, Arc::clone(&class));
        self.register(base, name, class.base().name());
        Ok(class)
    }

    /// Number of declared mutable classes.
    pub fn len(&self) -> usize {
        self.classes.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.read().is_empty()
    }
}

impl Default for VariantTable {
    fn default() -> Self {
        Self::new()
    }
}

fn same_base(
    existing: &Arc<MutableClass>,
    base: ClassId,
    name: Symbol,
) -> ValueResult<Arc<MutableClass>> {
    if existing.base().id() == base {
        Ok(Arc::clone(existing))
    } else {
        Err(ValueError::DuplicateClass { name })
    }
}

static VARIANTS: LazyLock<VariantTable> = LazyLock::new(VariantTable::new);

/// The process-wide variant table.
pub fn variants() -> &'static VariantTable {
    &VARIANTS
}

/// Record `name` as a mutable variant of `base` in the process-wide table.
pub fn register_mutable_variant(base: &ValueClass, name: &str) {
    variants().register_mutable_variant(base, name);
}
