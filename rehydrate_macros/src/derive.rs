//! Expansion pipeline for the `Hydrate` derive.
//!
//! Parsing and code generation are split so the attribute grammar can be
//! unit-tested without driving the proc-macro entry point.

pub(crate) mod generate;
pub(crate) mod parse;

use proc_macro2::TokenStream;
use syn::{Data, DeriveInput, Fields};

/// Expand one `#[derive(Hydrate)]` input into an implementation block.
pub(crate) fn expand(input: DeriveInput) -> syn::Result<TokenStream> {
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Hydrate cannot be derived for generic types",
        ));
    }
    let container = parse::parse_container_attrs(&input.attrs)?;
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input.ident,
                    "Hydrate requires named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "Hydrate can only be derived for structs",
            ));
        }
    };

    let mut properties = Vec::new();
    for field in fields {
        if let Some(spec) = parse::parse_field(field, &container)? {
            properties.push(spec);
        }
    }
    Ok(generate::hydrate_impl(&input.ident, &properties))
}
