//! Procedural macros for valobj.
//!
//! This crate provides the `Introspect` derive, which turns a plain Rust
//! struct into a value-object class description at compile time.
//!
//! # Introspect Derive
//!
//! ```text
//! #[derive(Introspect)]
//! #[value(name = "Person")]
//! pub struct PersonRecord {
//!     pub name: String,
//!     pub age: i64,
//!     #[value(structural)]
//!     pub home: Point,
//!     #[value(weak)]
//!     pub delegate: Option<ObjectRef>,
//!     #[value(skip)]
//!     pub scratch: Vec<u8>,
//! }
//! ```
//!
//! This generates an `Introspect` implementation listing one descriptor per
//! field, and an inherent `into_value_object` that constructs the canonical
//! immutable instance.

mod introspect;
mod utils;

use proc_macro::TokenStream;

/// Derive macro describing a struct's fields to the value-object runtime.
///
/// # Attributes
///
/// ## Struct-level
/// - `#[value(name = "...")]` - Class name. Defaults to the struct name.
/// - `#[value(stable_hash = false)]` - Opt out of hash caching and uniquing.
///
/// ## Field-level
/// - `#[value(structural)]` - The field is a `StructValue` stored as bytes.
/// - `#[value(weak)]` - Hold the object weakly. The field must convert into
///   a `FieldValue` (`ObjectRef` or `Option<ObjectRef>`).
/// - `#[value(getter = "...")]`, `#[value(setter = "...")]` - Accessor names.
/// - `#[value(skip)]` - Not part of the value.
///
/// # Type Mapping
/// - `bool` and fixed-width integers and floats map to their scalar kind
/// - `isize` and `usize` map to the 64-bit kinds
/// - everything else is an object field
#[proc_macro_derive(Introspect, attributes(value))]
pub fn derive_introspect(input: TokenStream) -> TokenStream {
    introspect::derive_introspect(input)
}
