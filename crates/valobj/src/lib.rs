//! Valobj - Value Objects
//!
//! Immutable, structurally-equal records with an optional mutable variant
//! for staged construction:
//! - Field descriptors and type tags describe each class
//! - Equality and hashing are derived from the descriptors
//! - Equal immutable instances are uniqued through a weak registry
//! - Mutable variants get their setters synthesized from field type tags
//!
//! # Design Philosophy
//!
//! - **Validate at load**: class and variant builders reject anything the
//!   engine cannot compare or set, before an instance exists
//! - **Intern names**: field names and selectors are `Symbol(u32)`
//! - **Closures, not method tables**: a setter is a closure chosen once per
//!   field from a table keyed by type tag
//!
//! # Example
//!
//! ```
//! use valobj::{FieldDescriptor, FieldValue, MutableClass, ScalarKind, ValueClass};
//!
//! let person = ValueClass::builder("DocPerson")
//!     .field(FieldDescriptor::object("name"))
//!     .field(FieldDescriptor::scalar("age", ScalarKind::I64))
//!     .build()?;
//! MutableClass::builder(&person, "DocMutablePerson")
//!     .all_setters()
//!     .build()?;
//!
//! let ada = person.construct_pairs([
//!     ("name", FieldValue::from("Ada")),
//!     ("age", FieldValue::from(36_i64)),
//! ])?;
//! let mut older = ada.mutable_copy()?;
//! older.invoke("setAge", 40_i64)?;
//! assert_eq!(older.freeze()?.get_as::<i64>("age"), Some(40));
//! # Ok::<(), valobj::ValueError>(())
//! ```

extern crate self as valobj;

mod class;
mod descriptor;
pub mod engine;
mod error;
mod interner;
mod object;
mod registry;
mod symbol;
mod synth;
mod tag;
pub mod value;
mod variants;

use std::sync::Once;

pub use class::{ClassId, FieldValues, ValueClass, ValueClassBuilder};
pub use descriptor::{conventional_setter, FieldDescriptor, Introspect, Storage};
pub use engine::ValueInstance;
pub use error::{ValueError, ValueResult};
pub use interner::{symbols, InternError, SymbolTable};
pub use object::{MutableValueObject, ValueObject};
pub use registry::{instance_registry, InstanceRegistry};
pub use symbol::Symbol;
pub use synth::{
    setter_generators, FieldBinding, Generator, GeneratorKey, MutableClass, MutableClassBuilder,
    Setter, SetterFn, SetterGenerators, SetterOrigin,
};
pub use tag::{ScalarKind, StructTag, TypeTag};
pub use value::{
    AffineTransform, ByteValue, FieldValue, FromFieldValue, NumberValue, ObjectRef, ObjectValue,
    Point, Range, RawValue, Rect, Size, StructValue, Transform3D, WeakObject,
};
pub use variants::{register_mutable_variant, variants, VariantTable};

/// `#[derive(Introspect)]` for structs with named fields.
pub use valobj_macros::Introspect;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Does nothing unless `RUST_LOG` is set,
/// e.g. `RUST_LOG=valobj=debug` to see class validation and synthesis.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
