//! Shared utilities for the derive macros.

use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{punctuated::Punctuated, token::Comma, Data, DeriveInput, Field, Fields};

/// Validate that the input is a struct with named fields, returning the fields.
pub fn validate_struct_with_named_fields<'a>(
    input: &'a DeriveInput,
    macro_name: &str,
) -> syn::Result<&'a Punctuated<Field, Comma>> {
    match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => Ok(&fields.named),
            _ => Err(syn::Error::new_spanned(
                input,
                format!("{macro_name} derive only supports structs with named fields"),
            )),
        },
        _ => Err(syn::Error::new_spanned(
            input,
            format!("{macro_name} derive only supports structs"),
        )),
    }
}

/// Last path segment of a type, e.g. `i64` for `std::primitive::i64`.
fn last_segment(ty: &syn::Type) -> Option<&syn::PathSegment> {
    match ty {
        syn::Type::Path(type_path) if type_path.qself.is_none() => type_path.path.segments.last(),
        _ => None,
    }
}

/// Check if a type is Option<T>.
pub fn is_option_type(ty: &syn::Type) -> bool {
    last_segment(ty).is_some_and(|segment| segment.ident == "Option")
}

/// Check if a type is `ObjectRef` or `Option<ObjectRef>`.
pub fn is_object_ref_type(ty: &syn::Type) -> bool {
    let Some(segment) = last_segment(ty) else {
        return false;
    };
    if segment.ident == "ObjectRef" {
        return true;
    }
    if segment.ident != "Option" {
        return false;
    }
    match &segment.arguments {
        syn::PathArguments::AngleBracketed(args) => args.args.iter().any(|arg| {
            matches!(arg, syn::GenericArgument::Type(inner)
                if last_segment(inner).is_some_and(|s| s.ident == "ObjectRef"))
        }),
        _ => false,
    }
}

/// The `ScalarKind` variant for a primitive type, if it is one.
pub fn scalar_kind(ty: &syn::Type) -> Option<TokenStream2> {
    let segment = last_segment(ty)?;
    if !segment.arguments.is_none() {
        return None;
    }
    let kind = match segment.ident.to_string().as_str() {
        "bool" => quote!(Bool),
        "i8" => quote!(I8),
        "i16" => quote!(I16),
        "i32" => quote!(I32),
        "i64" | "isize" => quote!(I64),
        "u8" => quote!(U8),
        "u16" => quote!(U16),
        "u32" => quote!(U32),
        "u64" | "usize" => quote!(U64),
        "f32" => quote!(F32),
        "f64" => quote!(F64),
        _ => return None,
    };
    Some(kind)
}
