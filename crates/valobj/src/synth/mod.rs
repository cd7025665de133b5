//! Mutable variants and setter synthesis.
//!
//! A mutable variant is declared against an immutable [`ValueClass`] with
//! the setters it should respond to. `build` resolves each declared setter
//! to a field of the base class, looks up a generator for the field's type
//! tag, and installs the generated closure. Hand-written setters are
//! installed as given and never replaced.
//!
//! Synthesis is all-or-nothing: if any declared setter targets a field
//! whose type has no generator, `build` fails with
//! [`ValueError::UnsupportedFieldType`] and the class is never published,
//! so no instance of it can exist.

mod generators;

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

pub use generators::{setter_generators, FieldBinding, Generator, GeneratorKey, SetterGenerators};

use crate::object::MutableValueObject;
use crate::value::RawValue;
use crate::variants::{variants, VariantTable};
use crate::{ClassId, Symbol, ValueClass, ValueError, ValueResult};

/// A setter implementation.
pub type SetterFn = Arc<dyn Fn(&mut MutableValueObject, RawValue) -> ValueResult<()> + Send + Sync>;

/// Where a setter's implementation came from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SetterOrigin {
    Synthesized,
    HandWritten,
}

/// A setter installed on a mutable class.
#[derive(Clone)]
pub struct Setter {
    selector: Symbol,
    field: Option<Symbol>,
    origin: SetterOrigin,
    func: SetterFn,
}

impl Setter {
    pub fn selector(&self) -> Symbol {
        self.selector
    }

    /// The field written, when the selector names one.
    pub fn field(&self) -> Option<Symbol> {
        self.field
    }

    pub fn origin(&self) -> SetterOrigin {
        self.origin
    }

    pub fn call(&self, target: &mut MutableValueObject, arg: impl Into<RawValue>) -> ValueResult<()> {
        (self.func)(target, arg.into())
    }
}

impl fmt::Debug for Setter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Setter")
            .field("selector", &self.selector)
            .field("field", &self.field)
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}

/// A validated mutable variant of an immutable class.
#[derive(Debug)]
pub struct MutableClass {
    id: ClassId,
    name: Symbol,
    base: Arc<ValueClass>,
    setters: FxHashMap<Symbol, Setter>,
}

impl MutableClass {
    pub fn builder(base: &Arc<ValueClass>, name: &str) -> MutableClassBuilder {
        MutableClassBuilder {
            base: Arc::clone(base),
            name: Symbol::intern(name),
            declared: Vec::new(),
            hand_written: Vec::new(),
        }
    }

    pub fn id(&self) -> ClassId {
        self.id
    }

    pub fn name(&self) -> Symbol {
        self.name
    }

    /// The immutable class this variant mutates.
    pub fn base(&self) -> &Arc<ValueClass> {
        &self.base
    }

    pub fn setter(&self, selector: &str) -> Option<&Setter> {
        let selector = Symbol::lookup(selector)?;
        self.setters.get(&selector)
    }

    pub fn setters(&self) -> impl Iterator<Item = &Setter> + '_ {
        self.setters.values()
    }

    /// A new instance with every field at its default.
    pub fn instantiate(self: &Arc<Self>) -> MutableValueObject {
        MutableValueObject::with_fields(Arc::clone(self), self.base.default_slots())
    }

    /// Register this class as the mutable variant of its base in the
    /// process-wide variant table.
    pub fn register_as_variant(&self) {
        variants().register_mutable_variant(&self.base, self.name.as_str());
    }
}

/// A setter declaration awaiting resolution.
#[derive(Copy, Clone, Debug)]
enum Declared {
    Selector(Symbol),
    Field(Symbol),
    All,
}

/// Builder for [`MutableClass`].
pub struct MutableClassBuilder {
    base: Arc<ValueClass>,
    name: Symbol,
    declared: Vec<Declared>,
    hand_written: Vec<(Symbol, SetterFn)>,
}

impl MutableClassBuilder {
    /// Declare the setter `selector`, e.g. `setAge`.
    #[must_use]
    pub fn setter(mut self, selector: &str) -> Self {
        self.declared.push(Declared::Selector(Symbol::intern(selector)));
        self
    }

    /// Declare the setter of the field named `field`.
    #[must_use]
    pub fn setter_for(mut self, field: &str) -> Self {
        self.declared.push(Declared::Field(Symbol::intern(field)));
        self
    }

    /// Declare a setter for every field of the base class.
    #[must_use]
    pub fn all_setters(mut self) -> Self {
        self.declared.push(Declared::All);
        self
    }

    /// Install `setter` under `selector` instead of synthesizing one.
    ///
    /// Hand-written setters usually box their argument themselves and store
    /// it with [`MutableValueObject::set_field_by_name`], which never calls
    /// back into a setter.
    #[must_use]
    pub fn hand_written<F>(mut self, selector: &str, setter: F) -> Self
    where
        F: Fn(&mut MutableValueObject, RawValue) -> ValueResult<()> + Send + Sync + 'static,
    {
        self.hand_written
            .push((Symbol::intern(selector), Arc::new(setter)));
        self
    }

    /// Synthesize with the process-wide generator table and publish the
    /// class in the process-wide variant table.
    pub fn build(self) -> ValueResult<Arc<MutableClass>> {
        self.build_in(variants(), setter_generators())
    }

    /// Synthesize with `generators` and publish in `table`.
    ///
    /// Runs exactly once per class name and table: a concurrent or repeated
    /// build of the same name returns the class published first.
    pub fn build_in(
        self,
        table: &VariantTable,
        generators: &SetterGenerators,
    ) -> ValueResult<Arc<MutableClass>> {
        let name = self.name;
        let base = self.base.id();
        table.declare(name, base, || self.synthesize(generators))
    }

    /// Setter selectors declared, in declaration order, without duplicates.
    fn declared_selectors(&self) -> ValueResult<Vec<Symbol>> {
        let mut selectors = Vec::new();
        for declared in &self.declared {
            match *declared {
                Declared::Selector(selector) => selectors.push(selector),
                Declared::Field(field) => {
                    let descriptor = self
                        .base
                        .field(field.as_str())
                        .ok_or_else(|| self.base.unknown_field(field.as_str()))?;
                    selectors.push(descriptor.setter_name());
                }
                Declared::All => {
                    selectors.extend(self.base.fields().iter().map(|f| f.setter_name()));
                }
            }
        }
        let mut seen = rustc_hash::FxHashSet::default();
        selectors.retain(|selector| seen.insert(*selector));
        Ok(selectors)
    }

    #[tracing::instrument(level = "debug", skip_all, fields(class = %self.name, base = %self.base.name()))]
    fn synthesize(self, generators: &SetterGenerators) -> ValueResult<MutableClass> {
        let declared = self.declared_selectors()?;
        let MutableClassBuilder {
            base,
            name,
            hand_written,
            ..
        } = self;

        let mut setters = FxHashMap::default();
        for (selector, func) in hand_written {
            let field = base.field_for_setter(selector).map(|f| f.name);
            setters.insert(
                selector,
                Setter {
                    selector,
                    field,
                    origin: SetterOrigin::HandWritten,
                    func,
                },
            );
        }

        for selector in declared {
            if setters.contains_key(&selector) {
                tracing::trace!(%selector, "keeping hand-written setter");
                continue;
            }
            let field = base
                .field_for_setter(selector)
                .ok_or_else(|| ValueError::UnknownSetter {
                    class: name,
                    selector: selector.as_str().to_owned(),
                })?;
            let binding = FieldBinding {
                class: name,
                selector,
                field: field.name,
                tag: field.tag,
            };
            let Some(func) = generators.generate(&binding) else {
                tracing::error!(
                    %selector,
                    field = %field.name,
                    tag = %field.tag,
                    "no setter generator for field type"
                );
                return Err(ValueError::UnsupportedFieldType {
                    class: name,
                    selector,
                    field: field.name,
                    tag: field.tag,
                });
            };
            tracing::trace!(%selector, tag = %field.tag, "synthesized setter");
            setters.insert(
                selector,
                Setter {
                    selector,
                    field: Some(field.name),
                    origin: SetterOrigin::Synthesized,
                    func,
                },
            );
        }

        tracing::debug!(setters = setters.len(), "mutable class synthesized");
        Ok(MutableClass {
            id: ClassId::fresh(),
            name,
            base,
            setters,
        })
    }
}

impl fmt::Debug for MutableClassBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MutableClassBuilder")
            .field("base", &self.base.name())
            .field("name", &self.name)
            .field("declared", &self.declared)
            .finish_non_exhaustive()
    }
}
