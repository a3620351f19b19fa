//! `#[derive(Persisted)]` — generates the field descriptor table and the
//! `bind_from` constructor glue for a configuration record.
//!
//! Field classification is syntactic: `bool`, `i32`, `i64`, `f64` and
//! `String` become snapshot scalars, `LiveValue<scalar>` becomes a live
//! accessor, `#[persisted(nested)]` marks a nested record, and any other
//! type is carried verbatim as an unsupported component (the walker warns
//! at bind time). Only plain non-generic structs with named fields are
//! accepted.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{quote, ToTokens};
use syn::{parse_macro_input, Data, DeriveInput, Fields, GenericArgument, PathArguments, Type};

#[proc_macro_derive(Persisted, attributes(persisted))]
pub fn derive_persisted(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}

enum FieldClass {
    Scalar(&'static str),
    Live(&'static str),
    Nested(Type),
    Other(String),
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Persisted cannot be derived for generic types",
        ));
    }
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    input,
                    "Persisted requires named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "Persisted can only be derived for structs",
            ));
        }
    };

    let ident = &input.ident;
    let ident_str = ident.to_string();
    let mut field_defs = Vec::new();
    let mut field_inits = Vec::new();

    for (index, field) in fields.iter().enumerate() {
        let name = field.ident.as_ref().ok_or_else(|| {
            syn::Error::new_spanned(field, "Persisted requires named fields")
        })?;
        let name_str = name.to_string();
        match classify(field)? {
            FieldClass::Scalar(kind) => {
                let kind = kind_token(kind);
                field_defs.push(quote! {
                    ::botkit_config::FieldDef::scalar(#name_str, #kind)
                });
                field_inits.push(quote! {
                    #name: walker.scalar(#index, defaults.map(|d| &d.#name))?
                });
            }
            FieldClass::Live(kind) => {
                let kind = kind_token(kind);
                field_defs.push(quote! {
                    ::botkit_config::FieldDef::live(#name_str, #kind)
                });
                field_inits.push(quote! {
                    #name: walker.live(#index, defaults.map(|d| &d.#name))?
                });
            }
            FieldClass::Nested(ty) => {
                field_defs.push(quote! {
                    ::botkit_config::FieldDef::nested(
                        #name_str,
                        <#ty as ::botkit_config::Persisted>::shape(),
                    )
                });
                field_inits.push(quote! {
                    #name: walker.nested(#index, defaults.map(|d| &d.#name))?
                });
            }
            FieldClass::Other(type_name) => {
                field_defs.push(quote! {
                    ::botkit_config::FieldDef::other(#name_str, #type_name)
                });
                field_inits.push(quote! {
                    #name: walker.unsupported(#index, defaults.map(|d| &d.#name))
                });
            }
        }
    }

    // A field-free record binds nothing; underscore the parameters so the
    // expansion stays warning-free in downstream crates.
    let (walker_arg, defaults_arg) = if field_inits.is_empty() {
        (quote!(_walker), quote!(_defaults))
    } else {
        (quote!(walker), quote!(defaults))
    };

    Ok(quote! {
        impl ::botkit_config::Persisted for #ident {
            fn shape() -> &'static ::botkit_config::RecordShape {
                static SHAPE: ::botkit_config::__private::Lazy<::botkit_config::RecordShape> =
                    ::botkit_config::__private::Lazy::new(|| {
                        ::botkit_config::RecordShape::new(#ident_str, vec![#(#field_defs),*])
                    });
                &SHAPE
            }

            fn bind_from(
                #walker_arg: &::botkit_config::Walker<'_>,
                #defaults_arg: ::core::option::Option<&Self>,
            ) -> ::core::result::Result<Self, ::botkit_config::ConfigError> {
                ::core::result::Result::Ok(Self {
                    #(#field_inits),*
                })
            }
        }
    })
}

fn classify(field: &syn::Field) -> syn::Result<FieldClass> {
    if has_nested_attr(field)? {
        return Ok(FieldClass::Nested(field.ty.clone()));
    }
    if let Some(kind) = scalar_kind(&field.ty) {
        return Ok(FieldClass::Scalar(kind));
    }
    if let Some(inner) = live_value_arg(&field.ty) {
        return match scalar_kind(inner) {
            Some(kind) => Ok(FieldClass::Live(kind)),
            None => Err(syn::Error::new_spanned(
                &field.ty,
                "LiveValue must wrap bool, i32, i64, f64, or String",
            )),
        };
    }
    Ok(FieldClass::Other(
        field.ty.to_token_stream().to_string(),
    ))
}

fn has_nested_attr(field: &syn::Field) -> syn::Result<bool> {
    let mut nested = false;
    for attr in &field.attrs {
        if attr.path().is_ident("persisted") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("nested") {
                    nested = true;
                    Ok(())
                } else {
                    Err(meta.error("unknown persisted attribute; expected `nested`"))
                }
            })?;
        }
    }
    Ok(nested)
}

fn scalar_kind(ty: &Type) -> Option<&'static str> {
    let Type::Path(path) = ty else {
        return None;
    };
    let segment = path.path.segments.last()?;
    if !matches!(segment.arguments, PathArguments::None) {
        return None;
    }
    match segment.ident.to_string().as_str() {
        "bool" => Some("Bool"),
        "i32" => Some("Int"),
        "i64" => Some("Long"),
        "f64" => Some("Double"),
        "String" => Some("Text"),
        _ => None,
    }
}

fn live_value_arg(ty: &Type) -> Option<&Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    let segment = path.path.segments.last()?;
    if segment.ident != "LiveValue" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    if args.args.len() != 1 {
        return None;
    }
    match args.args.first()? {
        GenericArgument::Type(inner) => Some(inner),
        _ => None,
    }
}

fn kind_token(kind: &'static str) -> TokenStream2 {
    let ident = proc_macro2::Ident::new(kind, proc_macro2::Span::call_site());
    quote!(::botkit_config::ScalarKind::#ident)
}
