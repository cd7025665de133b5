//! Error type for class validation, synthesis, and field access.

use crate::{Symbol, TypeTag};

/// Result alias used across the crate.
pub type ValueResult<T> = Result<T, ValueError>;

/// Errors raised by value classes and their instances.
///
/// Validation errors (`UncomparableField`, `WeakNonObjectField`, `DuplicateField`,
/// `UnsupportedFieldType`, `UnknownSetter`) are raised while a class is
/// being built, before any instance of it exists.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueError {
    /// A mutable variant declares a setter for a field whose type has no
    /// setter generator.
    #[error("`{class}` cannot synthesize `{selector}`: field `{field}` has unsupported type {tag}")]
    UnsupportedFieldType {
        class: Symbol,
        selector: Symbol,
        field: Symbol,
        tag: TypeTag,
    },

    /// A field's type has no equality or hash rule.
    #[error("field `{field}` of `{class}` has type {tag}, which has no equality rule")]
    UncomparableField {
        class: Symbol,
        field: Symbol,
        tag: TypeTag,
    },

    /// A field other than an object field was marked weak.
    #[error("field `{field}` of `{class}` has type {tag} and cannot be held weakly")]
    WeakNonObjectField {
        class: Symbol,
        field: Symbol,
        tag: TypeTag,
    },

    /// Two fields share a name or an accessor name.
    #[error("`{class}` declares `{field}` more than once")]
    DuplicateField { class: Symbol, field: Symbol },

    /// `mutable_copy` on a class with no registered mutable variant.
    #[error("no mutable variant registered for `{class}`")]
    MissingVariantRegistration { class: Symbol },

    /// A mutable class name was declared again for a different base.
    #[error("mutable class `{name}` is already declared for a different base")]
    DuplicateClass { name: Symbol },

    #[error("`{class}` has no field `{field}`")]
    UnknownField { class: Symbol, field: String },

    #[error("`{class}` has no setter `{selector}`")]
    UnknownSetter { class: Symbol, selector: String },

    /// A constructor value cannot be stored in the declared field type.
    #[error("field `{field}` of `{class}` is {expected} and cannot hold {found}")]
    FieldTypeMismatch {
        class: Symbol,
        field: Symbol,
        expected: TypeTag,
        found: &'static str,
    },

    /// A setter was called with an argument of the wrong kind.
    #[error("setter `{selector}` takes {expected}, got {found}")]
    ArgumentMismatch {
        selector: Symbol,
        expected: TypeTag,
        found: &'static str,
    },
}
