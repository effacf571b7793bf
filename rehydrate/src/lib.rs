//! Core crate for the `rehydrate` object-hydration framework.
//!
//! This crate defines the [`Hydrate`] trait and the descriptor-driven
//! coercion engine behind it. The derive macro generating descriptor
//! tables lives in the companion `rehydrate_macros` crate and is
//! re-exported here.
//!
//! Hydration populates a typed instance from a loosely typed source (a
//! mapping of property names to JSON-like values, or another live object),
//! recursively coercing nested hydratable values, collections of typed
//! values, enumerations and constructor-bearing types. Every call returns
//! a [`Hydrated`] pair: the populated value plus the [`Ledger`] of
//! properties actually written.
//!
//! ```
//! use rehydrate::{Hydrate, RawValue};
//! use serde::{Deserialize, Serialize};
//! use serde_json::json;
//!
//! #[derive(Hydrate, Serialize, Deserialize, Clone, Default)]
//! struct User {
//!     user_id: i64,
//!     #[hydrate(add = "add_tag")]
//!     tags: Vec<String>,
//! }
//!
//! impl User {
//!     fn add_tag(&mut self, tag: String) {
//!         self.tags.push(tag);
//!     }
//! }
//!
//! # fn main() -> Result<(), rehydrate::HydrateError> {
//! let data = json!({"user_id": 5, "tags": ["a", "b"]});
//! let hydrated = User::create(RawValue::borrowed(&data))?;
//! assert_eq!(hydrated.value().user_id, 5);
//! assert_eq!(hydrated.value().tags, ["a", "b"]);
//! assert_eq!(hydrated.ledger().names(), ["user_id", "tags"].as_slice());
//! # Ok(())
//! # }
//! ```

use serde::Serialize;
use serde_json::{Map, Value};

mod coerce;
mod descriptor;
mod error;
mod outcome;
mod populate;
mod value;

pub use coerce::{Coerced, coerce, coerced_into, coerced_into_vec};
pub use descriptor::{
    BindFn, Constructible, CtorSpec, DeclaredType, EnumSpec, NestedSpec, Property, ReadFn,
    TypeDescriptor,
};
pub use error::{HydrateError, HydrateResult};
pub use outcome::{Hydrated, Ledger};
pub use value::{PropertySource, RawValue, read_value};

pub use rehydrate_macros::Hydrate;

/// Trait implemented by types that can be populated from loosely typed
/// sources.
///
/// Implementations normally come from `#[derive(Hydrate)]`, which also
/// emits the descriptor-backed [`PropertySource`] impl making every
/// hydratable type usable as an object-hydration source. Only
/// [`descriptor`](Hydrate::descriptor) is required here; everything else
/// is provided: the three hydration entry points differ only in where
/// their raw values come from, and all funnel into the same coercion
/// routine.
pub trait Hydrate: PropertySource + Sized + 'static {
    /// Static descriptor table of the type's declared properties.
    ///
    /// Built lazily on first access and cached for the life of the
    /// process.
    fn descriptor() -> &'static TypeDescriptor<Self>;

    /// Build and populate a new instance from `source`.
    ///
    /// Mappings dispatch to [`from_map`](Hydrate::from_map), objects to
    /// [`from_object`](Hydrate::from_object).
    ///
    /// # Errors
    ///
    /// Returns [`HydrateError::UnsupportedSource`] for a raw value that is
    /// neither a mapping nor an object, and propagates coercion failures.
    fn create(source: RawValue<'_>) -> HydrateResult<Hydrated<Self>>
    where
        Self: Default,
    {
        Self::create_seeded(Self::default(), source)
    }

    /// Like [`create`](Hydrate::create), but populating a caller-built
    /// seed instance instead of `Self::default()`.
    ///
    /// # Errors
    ///
    /// Returns [`HydrateError::UnsupportedSource`] for a raw value that is
    /// neither a mapping nor an object, and propagates coercion failures.
    fn create_seeded(seed: Self, source: RawValue<'_>) -> HydrateResult<Hydrated<Self>> {
        match source {
            RawValue::Value(value) => match value.as_ref() {
                Value::Object(data) => seed.from_map(data),
                other => Err(HydrateError::unsupported_source(crate::value::value_kind(
                    other,
                ))),
            },
            RawValue::Object(object) => seed.from_object(object),
        }
    }

    /// Populate this instance from a mapping of property name to raw
    /// value.
    ///
    /// Only properties present in `data` are written; each write is
    /// recorded in the returned ledger.
    ///
    /// # Errors
    ///
    /// Propagates [`HydrateError::Uninstantiable`] raised outside a union
    /// fold.
    fn from_map(self, data: &Map<String, Value>) -> HydrateResult<Hydrated<Self>> {
        populate::hydrate_map(self, data)
    }

    /// Populate this instance by reading each initialized property of
    /// `source` that this type also declares.
    ///
    /// # Errors
    ///
    /// Propagates [`HydrateError::Uninstantiable`] raised outside a union
    /// fold.
    fn from_object(self, source: &dyn PropertySource) -> HydrateResult<Hydrated<Self>> {
        populate::hydrate_object(self, source)
    }

    /// DEPRECATED: populate this instance from a mapping.
    ///
    /// Early revisions exposed hydration under this name; it forwards to
    /// [`from_map`](Hydrate::from_map) unchanged.
    ///
    /// # Errors
    ///
    /// Propagates [`HydrateError::Uninstantiable`] raised outside a union
    /// fold.
    #[deprecated(since = "0.2.0", note = "use `from_map` instead")]
    fn set_data(self, data: &Map<String, Value>) -> HydrateResult<Hydrated<Self>> {
        self.from_map(data)
    }

    /// Build a fresh instance hydrated from this one.
    ///
    /// A declarative re-hydration rather than a memory copy: nested
    /// hydratable properties are freshly re-coerced, everything else is
    /// copied shallowly.
    ///
    /// # Errors
    ///
    /// Propagates coercion failures from the object-hydration path.
    fn clone_hydrated(&self) -> HydrateResult<Hydrated<Self>>
    where
        Self: Default,
    {
        self.clone_seeded(Self::default())
    }

    /// Like [`clone_hydrated`](Hydrate::clone_hydrated), but populating a
    /// caller-built seed instance.
    ///
    /// # Errors
    ///
    /// Propagates coercion failures from the object-hydration path.
    fn clone_seeded(&self, seed: Self) -> HydrateResult<Hydrated<Self>> {
        seed.from_object(self)
    }

    /// The instance as a mapping of property name to value.
    ///
    /// The default serializes through serde; types with bespoke layouts
    /// override this.
    fn to_map(&self) -> Map<String, Value>
    where
        Self: Serialize,
    {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }

    /// Direct text serialization of [`to_map`](Hydrate::to_map)'s result.
    fn to_json(&self) -> String
    where
        Self: Serialize,
    {
        Value::Object(self.to_map()).to_string()
    }
}

/// Read `name` from `instance` through its descriptor's read accessor.
///
/// `None` models an uninitialized or unreadable property. Derived
/// [`PropertySource`] impls forward to this; hand-written ones can do the
/// same.
#[must_use]
pub fn read_property<'a, T: Hydrate>(instance: &'a T, name: &str) -> Option<RawValue<'a>> {
    let property = T::descriptor().find(name)?;
    let reader = property.read?;
    reader(instance)
}
