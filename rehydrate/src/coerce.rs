//! The type-coercion routine at the heart of the engine.
//!
//! [`coerce`] decides, for one declared type and one raw value, how the raw
//! value becomes assignable: passed through untouched, parsed as an
//! enumeration, recursively hydrated, or built through a constructor's
//! named parameters. Union-typed properties fold the routine over their
//! candidates in declared order, keeping the last success.

use std::any::Any;
use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::descriptor::{CtorSpec, DeclaredType, EnumSpec, NestedSpec};
use crate::error::{HydrateError, HydrateResult};
use crate::value::RawValue;

/// Outcome of coercing one raw value against one declared type.
pub enum Coerced {
    /// The raw input, passed through unchanged.
    Raw(Value),
    /// A freshly hydrated, constructed or reused instance of the declared
    /// type.
    Instance(Box<dyn Any>),
    /// An enumeration lookup that matched no variant; a valid outcome, not
    /// an error.
    Absent,
    /// Element-wise coercion results for a sequence.
    Seq(Vec<Coerced>),
}

impl Coerced {
    /// Wrap a typed instance.
    #[must_use]
    pub fn instance<T: Any>(value: T) -> Self {
        Self::Instance(Box::new(value))
    }

    /// Diagnostic kind of the coerced value.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Raw(_) => "raw",
            Self::Instance(_) => "instance",
            Self::Absent => "absent",
            Self::Seq(_) => "sequence",
        }
    }

    /// Split a sequence-shaped coerced value into its elements.
    ///
    /// Raw sequences are promoted element-wise; anything else is handed
    /// back untouched so the caller can fall through to a bulk binding.
    pub(crate) fn try_into_elements(self) -> Result<Vec<Self>, Self> {
        match self {
            Self::Seq(elements) => Ok(elements),
            Self::Raw(Value::Array(values)) => {
                Ok(values.into_iter().map(Self::Raw).collect())
            }
            other => Err(other),
        }
    }
}

impl fmt::Debug for Coerced {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raw(value) => f.debug_tuple("Raw").field(value).finish(),
            Self::Instance(_) => f.debug_tuple("Instance").field(&"<dyn Any>").finish(),
            Self::Absent => f.write_str("Absent"),
            Self::Seq(elements) => f.debug_tuple("Seq").field(elements).finish(),
        }
    }
}

/// Coerce `raw` into the shape required by `declared`.
///
/// `Ok(None)` means no coercion produced a value; the property is left
/// untouched and unledgered. Resolution misses never error; the only
/// failure is [`HydrateError::Uninstantiable`], which union folds catch
/// and discard per candidate.
///
/// # Errors
///
/// Returns [`HydrateError::Uninstantiable`] when a constructor-bearing
/// declared type cannot be satisfied by the raw value, and propagates any
/// failure raised while recursively hydrating a nested value.
pub fn coerce(declared: &DeclaredType, raw: &RawValue<'_>) -> HydrateResult<Option<Coerced>> {
    match declared {
        DeclaredType::Scalar => Ok(raw.as_value().map(Coerced::Raw)),
        DeclaredType::Enum(spec) => Ok(Some(coerce_enum(spec, raw))),
        DeclaredType::Nested(spec) => coerce_nested(spec, raw),
        DeclaredType::Constructed(spec) => coerce_constructed(spec, raw),
        DeclaredType::Sequence(element) => coerce_sequence(element, raw),
        DeclaredType::Union(candidates) => coerce_union(candidates, raw),
    }
}

fn coerce_enum(spec: &EnumSpec, raw: &RawValue<'_>) -> Coerced {
    match raw {
        RawValue::Value(value) => (spec.parse)(value.as_ref())
            .map_or(Coerced::Absent, Coerced::Instance),
        RawValue::Object(_) => Coerced::Absent,
    }
}

fn coerce_nested(spec: &NestedSpec, raw: &RawValue<'_>) -> HydrateResult<Option<Coerced>> {
    if let RawValue::Object(source) = raw {
        if source.as_any().type_id() == spec.type_id {
            return Ok((spec.reuse)(source.as_any()).map(Coerced::Instance));
        }
    }
    if !raw.is_structured() {
        return Ok(raw.as_value().map(Coerced::Raw));
    }
    (spec.create)(raw.reborrow()).map(|instance| Some(Coerced::Instance(instance)))
}

fn coerce_constructed(spec: &CtorSpec, raw: &RawValue<'_>) -> HydrateResult<Option<Coerced>> {
    if let RawValue::Object(source) = raw {
        if source.as_any().type_id() == spec.type_id {
            return Ok((spec.reuse)(source.as_any()).map(Coerced::Instance));
        }
    }
    if spec.params.is_empty() {
        return Err(HydrateError::uninstantiable(spec.type_name()));
    }
    if !raw.is_structured() {
        return Ok(raw.as_value().map(Coerced::Raw));
    }
    let resolved: Vec<Option<Value>> = spec
        .params
        .iter()
        .map(|name| resolve_parameter(raw, name))
        .collect();
    if resolved.iter().all(Option::is_none) {
        return Err(HydrateError::uninstantiable(spec.type_name()));
    }
    (spec.invoke)(&resolved)
        .map(Coerced::Instance)
        .map(Some)
        .ok_or_else(|| HydrateError::uninstantiable(spec.type_name()))
}

/// Resolve one constructor parameter by name from the raw value.
///
/// Misses are absent values, never errors: the parameter is simply omitted
/// from the invocation.
fn resolve_parameter(raw: &RawValue<'_>, name: &str) -> Option<Value> {
    match raw {
        RawValue::Value(value) => value.as_ref().as_object().and_then(|map| map.get(name)).cloned(),
        RawValue::Object(source) => match source.read(name)? {
            RawValue::Value(value) => Some(value.into_owned()),
            RawValue::Object(_) => {
                tracing::trace!(parameter = name, "object-valued parameter skipped");
                None
            }
        },
    }
}

fn coerce_sequence(element: &DeclaredType, raw: &RawValue<'_>) -> HydrateResult<Option<Coerced>> {
    let RawValue::Value(value) = raw else {
        return Ok(None);
    };
    let Value::Array(items) = value.as_ref() else {
        return Ok(raw.as_value().map(Coerced::Raw));
    };
    let mut elements = Vec::with_capacity(items.len());
    for item in items {
        if let Some(coerced) = coerce(element, &RawValue::borrowed(item))? {
            elements.push(coerced);
        }
    }
    Ok(Some(Coerced::Seq(elements)))
}

/// Fold the candidates of a union type, in declared order.
///
/// An uninstantiable candidate is discarded and the next one tried; the
/// last candidate to coerce successfully supplies the value. This is
/// last-wins on purpose: a later candidate overrides an earlier success.
fn coerce_union(candidates: &[DeclaredType], raw: &RawValue<'_>) -> HydrateResult<Option<Coerced>> {
    let mut winner = None;
    for candidate in candidates {
        match coerce(candidate, raw) {
            Ok(Some(coerced)) => winner = Some(coerced),
            Ok(None) => {}
            Err(error) if error.is_uninstantiable() => {
                tracing::trace!(%error, "union candidate discarded");
            }
            Err(error) => return Err(error),
        }
    }
    Ok(winner)
}

/// Convert a coerced value into a concrete `T`.
///
/// Instances are downcast; raw values go through serde. Mismatches yield
/// `None` so bindings can absorb them as no-ops, matching the engine's
/// permissive error model.
#[must_use]
pub fn coerced_into<T>(coerced: Coerced) -> Option<T>
where
    T: DeserializeOwned + Any,
{
    match coerced {
        Coerced::Raw(value) => serde_json::from_value(value).ok(),
        Coerced::Instance(instance) => instance.downcast::<T>().ok().map(|boxed| *boxed),
        Coerced::Absent => None,
        Coerced::Seq(elements) => {
            let values = elements
                .into_iter()
                .map(|element| match element {
                    Coerced::Raw(value) => Some(value),
                    _ => None,
                })
                .collect::<Option<Vec<_>>>()?;
            serde_json::from_value(Value::Array(values)).ok()
        }
    }
}

/// Convert a sequence-shaped coerced value into a `Vec<E>`, dropping
/// elements that do not convert.
#[must_use]
pub fn coerced_into_vec<E>(coerced: Coerced) -> Option<Vec<E>>
where
    E: DeserializeOwned + Any,
{
    match coerced {
        Coerced::Seq(elements) => Some(
            elements
                .into_iter()
                .filter_map(coerced_into::<E>)
                .collect(),
        ),
        Coerced::Raw(Value::Array(values)) => Some(
            values
                .into_iter()
                .filter_map(|value| serde_json::from_value(value).ok())
                .collect(),
        ),
        _ => None,
    }
}

#[cfg(test)]
mod tests;
