//! Introspect derive macro implementation.
//!
//! Generates `::valobj::Introspect` and an inherent `into_value_object`
//! from a struct definition.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, DeriveInput, Field, Ident, LitBool, LitStr};

use crate::utils::{
    is_object_ref_type, is_option_type, scalar_kind, validate_struct_with_named_fields,
};

/// Main entry point for the Introspect derive macro.
pub fn derive_introspect(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match derive_introspect_impl(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// Struct-level `#[value(...)]` options.
#[derive(Default)]
struct ClassAttrs {
    name: Option<LitStr>,
    stable_hash: Option<LitBool>,
}

/// Field-level `#[value(...)]` options.
#[derive(Default)]
struct FieldAttrs {
    structural: bool,
    weak: bool,
    skip: bool,
    getter: Option<LitStr>,
    setter: Option<LitStr>,
}

/// How a field is described and boxed.
enum FieldKind {
    Object,
    Scalar(TokenStream2),
    Structural,
}

struct ValueField<'a> {
    ident: &'a Ident,
    ty: &'a syn::Type,
    kind: FieldKind,
    attrs: FieldAttrs,
}

fn derive_introspect_impl(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let class_attrs = parse_class_attrs(input)?;
    let fields = validate_struct_with_named_fields(input, "Introspect")?;

    let mut value_fields = Vec::new();
    for field in fields {
        if let Some(value_field) = classify(field)? {
            value_fields.push(value_field);
        }
    }

    let class_name = class_attrs
        .name
        .unwrap_or_else(|| LitStr::new(&name.to_string(), name.span()));
    let descriptors = value_fields.iter().map(descriptor);
    let pairs = value_fields.iter().map(pair);
    let count = value_fields.len();
    let stable_hash = class_attrs.stable_hash.map(|stable| {
        quote! {
            fn stable_hash() -> ::core::option::Option<bool> {
                ::core::option::Option::Some(#stable)
            }
        }
    });

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::valobj::Introspect for #name #ty_generics #where_clause {
            const CLASS_NAME: &'static str = #class_name;

            fn fields() -> ::std::vec::Vec<::valobj::FieldDescriptor> {
                ::std::vec![#(#descriptors),*]
            }

            #stable_hash
        }

        impl #impl_generics #name #ty_generics #where_clause {
            /// Construct the canonical immutable value holding this record.
            pub fn into_value_object(self) -> ::valobj::ValueResult<::valobj::ValueObject> {
                let class = ::valobj::ValueClass::of::<Self>()?;
                let pairs: [(&'static str, ::valobj::FieldValue); #count] = [#(#pairs),*];
                class.construct_pairs(pairs)
            }
        }
    })
}

fn parse_class_attrs(input: &DeriveInput) -> syn::Result<ClassAttrs> {
    let mut attrs = ClassAttrs::default();
    for attr in &input.attrs {
        if !attr.path().is_ident("value") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                attrs.name = Some(meta.value()?.parse()?);
                Ok(())
            } else if meta.path.is_ident("stable_hash") {
                attrs.stable_hash = Some(meta.value()?.parse()?);
                Ok(())
            } else {
                Err(meta.error("expected `name` or `stable_hash`"))
            }
        })?;
    }
    Ok(attrs)
}

fn parse_field_attrs(field: &Field) -> syn::Result<FieldAttrs> {
    let mut attrs = FieldAttrs::default();
    for attr in &field.attrs {
        if !attr.path().is_ident("value") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("structural") {
                attrs.structural = true;
            } else if meta.path.is_ident("weak") {
                attrs.weak = true;
            } else if meta.path.is_ident("skip") {
                attrs.skip = true;
            } else if meta.path.is_ident("getter") {
                attrs.getter = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("setter") {
                attrs.setter = Some(meta.value()?.parse()?);
            } else {
                return Err(meta.error(
                    "expected one of `structural`, `weak`, `skip`, `getter`, `setter`",
                ));
            }
            Ok(())
        })?;
    }
    Ok(attrs)
}

/// Classify a field, or `None` for skipped fields.
fn classify(field: &Field) -> syn::Result<Option<ValueField<'_>>> {
    let attrs = parse_field_attrs(field)?;
    if attrs.skip {
        return Ok(None);
    }
    let Some(ident) = field.ident.as_ref() else {
        return Err(syn::Error::new_spanned(field, "expected a named field"));
    };

    let kind = if attrs.structural {
        FieldKind::Structural
    } else if let Some(kind) = scalar_kind(&field.ty) {
        FieldKind::Scalar(kind)
    } else {
        FieldKind::Object
    };

    if attrs.weak && !matches!(kind, FieldKind::Object) {
        return Err(syn::Error::new_spanned(
            field,
            "only object fields can be `weak`",
        ));
    }

    Ok(Some(ValueField {
        ident,
        ty: &field.ty,
        kind,
        attrs,
    }))
}

/// `FieldDescriptor` expression for a field.
fn descriptor(field: &ValueField<'_>) -> TokenStream2 {
    let name = LitStr::new(&field.ident.to_string(), field.ident.span());
    let ty = field.ty;

    let base = match &field.kind {
        FieldKind::Object => quote! { ::valobj::FieldDescriptor::object(#name) },
        FieldKind::Scalar(kind) => {
            quote! { ::valobj::FieldDescriptor::scalar(#name, ::valobj::ScalarKind::#kind) }
        }
        FieldKind::Structural => {
            quote! { ::valobj::FieldDescriptor::structural::<#ty>(#name) }
        }
    };
    let getter = field
        .attrs
        .getter
        .as_ref()
        .map(|getter| quote! { .with_getter(#getter) });
    let setter = field
        .attrs
        .setter
        .as_ref()
        .map(|setter| quote! { .with_setter(#setter) });
    let weak = field.attrs.weak.then(|| quote! { .weak() });

    quote! { #base #getter #setter #weak }
}

/// `(name, FieldValue)` pair boxing the field's current value.
fn pair(field: &ValueField<'_>) -> TokenStream2 {
    let ident = field.ident;
    let name = LitStr::new(&ident.to_string(), ident.span());

    let value = match field.kind {
        FieldKind::Structural => quote! { ::valobj::FieldValue::from_struct(&self.#ident) },
        FieldKind::Scalar(_) => quote! { ::valobj::FieldValue::from(self.#ident) },
        FieldKind::Object if field.attrs.weak || is_object_ref_type(field.ty) => {
            quote! { ::valobj::FieldValue::from(self.#ident) }
        }
        FieldKind::Object if is_option_type(field.ty) => quote! {
            self.#ident.map_or(::valobj::FieldValue::Nil, ::valobj::FieldValue::object)
        },
        FieldKind::Object => quote! { ::valobj::FieldValue::object(self.#ident) },
    };

    quote! { (#name, #value) }
}
