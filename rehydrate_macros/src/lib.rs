//! Procedural macros for `rehydrate`.
//!
//! The `Hydrate` derive turns a struct's fields and `#[hydrate(...)]`
//! attributes into the static descriptor table the hydration engine
//! dispatches over. Everything a reflection-driven design would discover
//! at call time (declared types, setters, adders, read accessors) is
//! resolved here, at compile time.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod derive;

/// Derive macro generating a `rehydrate::Hydrate` implementation.
///
/// # Container attributes
///
/// - `#[hydrate(rename_all = "camelCase")]`: map field names to property
///   keys (`camelCase`, `snake_case`, `PascalCase` or `kebab-case`).
///
/// # Field attributes
///
/// - `#[hydrate(skip)]`: the field is not a declared property.
/// - `#[hydrate(rename = "key")]`: property key override.
/// - `#[hydrate(nested)]`, `#[hydrate(enumeration)]`,
///   `#[hydrate(constructed)]`: declared-type tag for the field's value
///   type; `Option<T>` unwraps and `Vec<T>` becomes a sequence of the
///   tagged element type.
/// - `#[hydrate(set)]` / `#[hydrate(set = "method")]`: bulk setter
///   binding, defaulting to `set_<field>`.
/// - `#[hydrate(add)]` / `#[hydrate(add = "method")]`: element-wise adder
///   binding, defaulting to `add_<field>`.
/// - `#[hydrate(get = "method")]`: read accessor override; the method's
///   return value is serialized.
/// - `#[hydrate(union = "scalar | nested: Ty | enumeration: Ty | constructed: Ty")]`:
///   ordered union candidates; the last successful coercion wins.
/// - `#[hydrate(with = "path")]`: custom `fn(Coerced) -> Option<FieldTy>`
///   conversion, required for `union` fields.
#[proc_macro_derive(Hydrate, attributes(hydrate))]
pub fn derive_hydrate(input: TokenStream) -> TokenStream {
    let parsed = parse_macro_input!(input as DeriveInput);
    derive::expand(parsed)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
