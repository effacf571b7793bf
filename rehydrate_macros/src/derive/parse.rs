//! Parsing of `#[hydrate(...)]` attributes into property specifications.

use heck::{ToKebabCase, ToLowerCamelCase, ToSnakeCase, ToUpperCamelCase};
use proc_macro2::Span;
use syn::{Attribute, Field, LitStr, Token};

/// Struct-level attributes.
#[derive(Default)]
pub(crate) struct ContainerAttrs {
    pub rename_all: Option<RenameRule>,
}

/// Field-name to property-key mapping rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum RenameRule {
    LowerCamel,
    Snake,
    UpperCamel,
    Kebab,
}

impl RenameRule {
    pub(crate) fn parse(value: &str, span: Span) -> Result<Self, syn::Error> {
        match value {
            "camelCase" => Ok(Self::LowerCamel),
            "snake_case" => Ok(Self::Snake),
            "PascalCase" => Ok(Self::UpperCamel),
            "kebab-case" => Ok(Self::Kebab),
            _ => Err(syn::Error::new(
                span,
                "rename_all must be one of \"camelCase\", \"snake_case\", \"PascalCase\" or \"kebab-case\"",
            )),
        }
    }

    pub(crate) fn apply(self, name: &str) -> String {
        match self {
            Self::LowerCamel => name.to_lower_camel_case(),
            Self::Snake => name.to_snake_case(),
            Self::UpperCamel => name.to_upper_camel_case(),
            Self::Kebab => name.to_kebab_case(),
        }
    }
}

/// Declared-type tag derived from field attributes.
#[derive(Clone)]
pub(crate) enum TypeTag {
    Scalar,
    Nested,
    Enumeration,
    Constructed,
    Union(Vec<UnionCandidate>),
}

/// One candidate of a `union = "..."` list.
#[derive(Clone)]
pub(crate) enum UnionCandidate {
    Scalar,
    Nested(syn::Path),
    Enumeration(syn::Path),
    Constructed(syn::Path),
}

/// Syntactic shape of the field's type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FieldShape {
    Plain,
    Optional,
    Plural,
}

/// Everything code generation needs for one declared property.
pub(crate) struct PropertySpec {
    pub ident: syn::Ident,
    pub name: String,
    pub value_ty: syn::Type,
    pub shape: FieldShape,
    pub tag: TypeTag,
    pub set: Option<syn::Ident>,
    pub add: Option<syn::Ident>,
    pub get: Option<syn::Ident>,
    pub with: Option<syn::Path>,
}

fn hydrate_attrs(attrs: &[Attribute]) -> impl Iterator<Item = &Attribute> {
    attrs.iter().filter(|attr| attr.path().is_ident("hydrate"))
}

/// Extract `#[hydrate(...)]` metadata applied to the struct itself.
pub(crate) fn parse_container_attrs(attrs: &[Attribute]) -> syn::Result<ContainerAttrs> {
    let mut out = ContainerAttrs::default();
    for attr in hydrate_attrs(attrs) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename_all") {
                let lit: LitStr = meta.value()?.parse()?;
                out.rename_all = Some(RenameRule::parse(&lit.value(), lit.span())?);
                Ok(())
            } else {
                Err(meta.error("unknown hydrate container attribute"))
            }
        })?;
    }
    Ok(out)
}

/// Extract one field's property specification.
///
/// Returns `None` for `#[hydrate(skip)]` fields.
pub(crate) fn parse_field(
    field: &Field,
    container: &ContainerAttrs,
) -> syn::Result<Option<PropertySpec>> {
    let ident = field
        .ident
        .clone()
        .ok_or_else(|| syn::Error::new_spanned(field, "Hydrate requires named fields"))?;

    let mut skip = false;
    let mut rename: Option<String> = None;
    let mut tag = TypeTag::Scalar;
    let mut set: Option<syn::Ident> = None;
    let mut add: Option<syn::Ident> = None;
    let mut get: Option<syn::Ident> = None;
    let mut with: Option<syn::Path> = None;

    for attr in hydrate_attrs(&field.attrs) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                skip = true;
                Ok(())
            } else if meta.path.is_ident("rename") {
                let lit: LitStr = meta.value()?.parse()?;
                rename = Some(lit.value());
                Ok(())
            } else if meta.path.is_ident("nested") {
                tag = TypeTag::Nested;
                Ok(())
            } else if meta.path.is_ident("enumeration") {
                tag = TypeTag::Enumeration;
                Ok(())
            } else if meta.path.is_ident("constructed") {
                tag = TypeTag::Constructed;
                Ok(())
            } else if meta.path.is_ident("union") {
                let lit: LitStr = meta.value()?.parse()?;
                tag = TypeTag::Union(parse_union_list(&lit.value(), lit.span())?);
                Ok(())
            } else if meta.path.is_ident("set") {
                set = Some(binding_method(&meta, &ident, "set")?);
                Ok(())
            } else if meta.path.is_ident("add") {
                add = Some(binding_method(&meta, &ident, "add")?);
                Ok(())
            } else if meta.path.is_ident("get") {
                let lit: LitStr = meta.value()?.parse()?;
                get = Some(syn::Ident::new(&lit.value(), lit.span()));
                Ok(())
            } else if meta.path.is_ident("with") {
                let lit: LitStr = meta.value()?.parse()?;
                with = Some(lit.parse()?);
                Ok(())
            } else {
                Err(meta.error("unknown hydrate field attribute"))
            }
        })?;
    }

    if skip {
        return Ok(None);
    }
    if matches!(tag, TypeTag::Union(_)) && with.is_none() {
        return Err(syn::Error::new(
            ident.span(),
            "`union` properties need a `with` conversion, as candidates differ in type",
        ));
    }

    let (shape, value_ty) = field_shape(&field.ty);
    let name = rename.unwrap_or_else(|| {
        let field_name = ident.to_string();
        container
            .rename_all
            .map_or_else(|| field_name.clone(), |rule| rule.apply(&field_name))
    });

    Ok(Some(PropertySpec {
        ident,
        name,
        value_ty,
        shape,
        tag,
        set,
        add,
        get,
        with,
    }))
}

/// Resolve a `set`/`add` binding method name, defaulting to
/// `<prefix>_<field>` when the attribute carries no value.
fn binding_method(
    meta: &syn::meta::ParseNestedMeta<'_>,
    field: &syn::Ident,
    prefix: &str,
) -> syn::Result<syn::Ident> {
    if meta.input.peek(Token![=]) {
        let lit: LitStr = meta.value()?.parse()?;
        Ok(syn::Ident::new(&lit.value(), lit.span()))
    } else {
        Ok(syn::Ident::new(&format!("{prefix}_{field}"), field.span()))
    }
}

/// Parse the pipe-separated candidate list of a `union = "..."` attribute.
pub(crate) fn parse_union_list(source: &str, span: Span) -> syn::Result<Vec<UnionCandidate>> {
    let mut candidates = Vec::new();
    for raw_item in source.split('|') {
        let item = raw_item.trim();
        if item.is_empty() {
            return Err(syn::Error::new(span, "empty union candidate"));
        }
        if item == "scalar" {
            candidates.push(UnionCandidate::Scalar);
            continue;
        }
        let Some((kind, ty)) = item.split_once(':') else {
            return Err(syn::Error::new(
                span,
                "union candidates are `scalar` or `nested|enumeration|constructed: Type`",
            ));
        };
        let path: syn::Path = syn::parse_str(ty.trim())
            .map_err(|_| syn::Error::new(span, "invalid union candidate type"))?;
        match kind.trim() {
            "nested" => candidates.push(UnionCandidate::Nested(path)),
            "enumeration" => candidates.push(UnionCandidate::Enumeration(path)),
            "constructed" => candidates.push(UnionCandidate::Constructed(path)),
            other => {
                return Err(syn::Error::new(
                    span,
                    format!("unknown union candidate tag `{other}`"),
                ));
            }
        }
    }
    if candidates.is_empty() {
        return Err(syn::Error::new(span, "union requires at least one candidate"));
    }
    Ok(candidates)
}

/// Classify the field type as plain, `Option<T>` or `Vec<T>` and surface
/// the value type coercion targets.
pub(crate) fn field_shape(ty: &syn::Type) -> (FieldShape, syn::Type) {
    if let Some(inner) = type_argument("Option", ty) {
        return (FieldShape::Optional, inner.clone());
    }
    if let Some(inner) = type_argument("Vec", ty) {
        return (FieldShape::Plural, inner.clone());
    }
    (FieldShape::Plain, ty.clone())
}

fn type_argument<'a>(wrapper: &str, ty: &'a syn::Type) -> Option<&'a syn::Type> {
    let syn::Type::Path(path) = ty else {
        return None;
    };
    let segment = path.path.segments.last()?;
    if segment.ident != wrapper {
        return None;
    }
    let syn::PathArguments::AngleBracketed(arguments) = &segment.arguments else {
        return None;
    };
    arguments.args.iter().find_map(|argument| match argument {
        syn::GenericArgument::Type(inner) => Some(inner),
        _ => None,
    })
}
