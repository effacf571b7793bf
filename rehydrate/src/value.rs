//! Raw-value model for hydration sources.
//!
//! A hydration source is either a JSON-like [`Value`] (scalar, sequence or
//! mapping) or a live object viewed through [`PropertySource`]. Values are
//! carried as [`Cow`] so borrowed input is never cloned until a coercion
//! actually needs an owned copy.

use std::any::Any;
use std::borrow::Cow;
use std::fmt;

use serde_json::{Map, Value};

/// A live object usable as a hydration source.
///
/// Every hydratable type implements this automatically through its
/// descriptor; plain types may implement it by hand to act as sources for
/// object hydration without being hydratable themselves.
pub trait PropertySource {
    /// Names of the source's declared properties, in declaration order.
    fn property_names(&self) -> &'static [&'static str];

    /// Read a named property.
    ///
    /// Returns `None` when the property is undeclared, unreadable or not
    /// currently initialized. Absence is never an error.
    fn read(&self, name: &str) -> Option<RawValue<'_>>;

    /// The instance as [`Any`], used to short-circuit coercion when a raw
    /// value already has the declared type.
    fn as_any(&self) -> &dyn Any;

    /// Diagnostic name of the source type.
    fn source_name(&self) -> &'static str {
        "<object>"
    }
}

/// Loosely typed hydration input.
#[derive(Clone)]
pub enum RawValue<'a> {
    /// A JSON-like value: scalar, sequence or mapping.
    Value(Cow<'a, Value>),
    /// A live object read through its property accessors.
    Object(&'a dyn PropertySource),
}

impl<'a> RawValue<'a> {
    /// Wrap a borrowed [`Value`].
    #[must_use]
    pub const fn borrowed(value: &'a Value) -> Self {
        Self::Value(Cow::Borrowed(value))
    }

    /// Wrap an owned [`Value`].
    #[must_use]
    pub const fn owned(value: Value) -> RawValue<'static> {
        RawValue::Value(Cow::Owned(value))
    }

    /// Wrap an object source.
    #[must_use]
    pub const fn object(source: &'a dyn PropertySource) -> Self {
        Self::Object(source)
    }

    /// Reborrow the raw value without cloning its contents.
    #[must_use]
    pub fn reborrow(&self) -> RawValue<'_> {
        match self {
            Self::Value(value) => RawValue::Value(Cow::Borrowed(value.as_ref())),
            Self::Object(source) => RawValue::Object(*source),
        }
    }

    /// The contained [`Value`], cloned out of the borrow.
    ///
    /// Objects have no value form and yield `None`.
    #[must_use]
    pub fn as_value(&self) -> Option<Value> {
        match self {
            Self::Value(value) => Some(value.as_ref().clone()),
            Self::Object(_) => None,
        }
    }

    /// The contained mapping, when the raw value is one.
    #[must_use]
    pub fn as_mapping(&self) -> Option<&Map<String, Value>> {
        match self {
            Self::Value(value) => value.as_ref().as_object(),
            Self::Object(_) => None,
        }
    }

    /// Whether the raw value is a sequence, a mapping or an object.
    ///
    /// Bare scalars are not structured and pass through coercion unchanged.
    #[must_use]
    pub fn is_structured(&self) -> bool {
        match self {
            Self::Value(value) => {
                matches!(value.as_ref(), Value::Array(_) | Value::Object(_))
            }
            Self::Object(_) => true,
        }
    }

    /// Diagnostic kind of the raw value.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Value(value) => value_kind(value.as_ref()),
            Self::Object(_) => "object",
        }
    }
}

impl From<Value> for RawValue<'static> {
    fn from(value: Value) -> Self {
        RawValue::owned(value)
    }
}

impl<'a> From<&'a Value> for RawValue<'a> {
    fn from(value: &'a Value) -> Self {
        RawValue::borrowed(value)
    }
}

impl fmt::Debug for RawValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => f.debug_tuple("Value").field(value.as_ref()).finish(),
            Self::Object(source) => f.debug_tuple("Object").field(&source.source_name()).finish(),
        }
    }
}

/// Serialize `value` into a raw value suitable for coercion.
///
/// Serialization failures are treated as "value absent", matching the
/// engine's permissive resolution rules. Descriptor read accessors lean on
/// this for scalar and collection properties.
#[must_use]
pub fn read_value<T: serde::Serialize>(value: &T) -> Option<RawValue<'static>> {
    serde_json::to_value(value).ok().map(RawValue::owned)
}

/// Diagnostic kind of a JSON value.
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}
