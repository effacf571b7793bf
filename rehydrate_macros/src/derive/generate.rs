//! Code generation for the `Hydrate` derive.
//!
//! Each property becomes one `Property` builder chain: a declared-type
//! tag plus non-capturing closures for the adder, setter, assignment and
//! read accessors. The closures coerce to plain function pointers, so the
//! generated table carries no state beyond the field logic itself.

use proc_macro2::TokenStream;
use quote::quote;

use super::parse::{FieldShape, PropertySpec, TypeTag, UnionCandidate};

/// Assemble the `Hydrate` implementation for `ident`.
pub(crate) fn hydrate_impl(ident: &syn::Ident, properties: &[PropertySpec]) -> TokenStream {
    let type_name = ident.to_string();
    let entries: Vec<TokenStream> = properties
        .iter()
        .map(|spec| property_entry(ident, spec))
        .collect();

    quote! {
        #[automatically_derived]
        impl ::rehydrate::Hydrate for #ident {
            fn descriptor() -> &'static ::rehydrate::TypeDescriptor<Self> {
                static DESCRIPTOR: ::std::sync::LazyLock<::rehydrate::TypeDescriptor<#ident>> =
                    ::std::sync::LazyLock::new(|| {
                        ::rehydrate::TypeDescriptor::new(#type_name)
                            #( .property(#entries) )*
                    });
                &DESCRIPTOR
            }
        }

        #[automatically_derived]
        impl ::rehydrate::PropertySource for #ident {
            fn property_names(&self) -> &'static [&'static str] {
                <#ident as ::rehydrate::Hydrate>::descriptor().property_names()
            }

            fn read(&self, name: &str) -> ::core::option::Option<::rehydrate::RawValue<'_>> {
                ::rehydrate::read_property(self, name)
            }

            fn as_any(&self) -> &dyn ::core::any::Any {
                self
            }

            fn source_name(&self) -> &'static str {
                <#ident as ::rehydrate::Hydrate>::descriptor().type_name()
            }
        }
    }
}

fn property_entry(ident: &syn::Ident, spec: &PropertySpec) -> TokenStream {
    let name = &spec.name;
    let declared = declared_tokens(spec);
    let mut entry = quote! {
        ::rehydrate::Property::new(#name, #declared)
    };

    if let Some(add) = &spec.add {
        let element_ty = &spec.value_ty;
        entry.extend(quote! {
            .add(|target: &mut #ident, coerced: ::rehydrate::Coerced| {
                if let ::core::option::Option::Some(element) =
                    ::rehydrate::coerced_into::<#element_ty>(coerced)
                {
                    target.#add(element);
                }
            })
        });
    }

    if let Some(set) = &spec.set {
        let body = bulk_body(spec, &quote!(target.#set(converted);), &quote!(target.#set(::core::option::Option::None);));
        entry.extend(quote! {
            .set(|target: &mut #ident, coerced: ::rehydrate::Coerced| { #body })
        });
    }

    let field = &spec.ident;
    let assign_body = bulk_body(
        spec,
        &quote!(target.#field = converted;),
        &quote!(target.#field = ::core::option::Option::None;),
    );
    entry.extend(quote! {
        .assign(|target: &mut #ident, coerced: ::rehydrate::Coerced| { #assign_body })
    });

    let reader = read_expr(spec);
    entry.extend(quote! {
        .read(|target: &#ident| #reader)
    });

    entry
}

/// The statement handling one bulk-converted value.
///
/// `store` consumes a `converted` binding of the field's full type;
/// `clear` handles `Coerced::Absent` for optional fields.
fn bulk_body(spec: &PropertySpec, store: &TokenStream, clear: &TokenStream) -> TokenStream {
    let value_ty = &spec.value_ty;
    if let Some(with) = &spec.with {
        return quote! {
            if let ::core::option::Option::Some(converted) = #with(coerced) {
                #store
            }
        };
    }
    match spec.shape {
        FieldShape::Plain => quote! {
            if let ::core::option::Option::Some(converted) =
                ::rehydrate::coerced_into::<#value_ty>(coerced)
            {
                #store
            }
        },
        FieldShape::Optional => quote! {
            if ::core::matches!(coerced, ::rehydrate::Coerced::Absent) {
                #clear
            } else if let ::core::option::Option::Some(converted) =
                ::rehydrate::coerced_into::<#value_ty>(coerced)
                    .map(::core::option::Option::Some)
            {
                #store
            }
        },
        FieldShape::Plural => quote! {
            if let ::core::option::Option::Some(converted) =
                ::rehydrate::coerced_into_vec::<#value_ty>(coerced)
            {
                #store
            }
        },
    }
}

fn declared_tokens(spec: &PropertySpec) -> TokenStream {
    let value_ty = &spec.value_ty;
    let base = match &spec.tag {
        TypeTag::Scalar => quote!(::rehydrate::DeclaredType::Scalar),
        TypeTag::Nested => quote!(::rehydrate::DeclaredType::nested::<#value_ty>()),
        TypeTag::Enumeration => quote!(::rehydrate::DeclaredType::enumeration::<#value_ty>()),
        TypeTag::Constructed => quote!(::rehydrate::DeclaredType::constructed::<#value_ty>()),
        TypeTag::Union(candidates) => {
            let items = candidates.iter().map(candidate_tokens);
            quote!(::rehydrate::DeclaredType::union([#( #items ),*]))
        }
    };
    if spec.shape == FieldShape::Plural && !matches!(spec.tag, TypeTag::Scalar) {
        quote!(::rehydrate::DeclaredType::sequence(#base))
    } else {
        base
    }
}

fn candidate_tokens(candidate: &UnionCandidate) -> TokenStream {
    match candidate {
        UnionCandidate::Scalar => quote!(::rehydrate::DeclaredType::Scalar),
        UnionCandidate::Nested(path) => quote!(::rehydrate::DeclaredType::nested::<#path>()),
        UnionCandidate::Enumeration(path) => {
            quote!(::rehydrate::DeclaredType::enumeration::<#path>())
        }
        UnionCandidate::Constructed(path) => {
            quote!(::rehydrate::DeclaredType::constructed::<#path>())
        }
    }
}

fn read_expr(spec: &PropertySpec) -> TokenStream {
    let field = &spec.ident;
    if let Some(get) = &spec.get {
        return quote!(::rehydrate::read_value(&target.#get()));
    }
    match (spec.shape, matches!(spec.tag, TypeTag::Nested)) {
        (FieldShape::Plain, true) => {
            quote!(::core::option::Option::Some(::rehydrate::RawValue::object(&target.#field)))
        }
        (FieldShape::Optional, true) => quote! {
            target.#field
                .as_ref()
                .map(|nested| ::rehydrate::RawValue::object(nested))
        },
        (FieldShape::Optional, false) => quote! {
            target.#field
                .as_ref()
                .and_then(|value| ::rehydrate::read_value(value))
        },
        _ => quote!(::rehydrate::read_value(&target.#field)),
    }
}
