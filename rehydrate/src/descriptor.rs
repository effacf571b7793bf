//! Static descriptor tables describing a type's declared properties.
//!
//! Where reflection-driven hydrators discover setters and constructor
//! parameters by string-formatted name lookup at call time, a descriptor
//! records the same facts once, at compile time: each property
//! carries its declared-type tag plus explicit accessor function references.
//! The `Hydrate` derive generates these tables; hand-written implementations
//! use the same builders.

use std::any::{Any, TypeId};

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::Hydrate;
use crate::coerce::Coerced;
use crate::error::HydrateResult;
use crate::value::RawValue;

/// Binding that writes a coerced value into a target instance.
pub type BindFn<T> = fn(&mut T, Coerced);

/// Accessor reading a property from a source instance.
///
/// `None` models an uninitialized property; object hydration skips it.
pub type ReadFn<T> = for<'a> fn(&'a T) -> Option<RawValue<'a>>;

pub(crate) type ReuseFn = fn(&dyn Any) -> Option<Box<dyn Any>>;
pub(crate) type CreateFn = for<'a> fn(RawValue<'a>) -> HydrateResult<Box<dyn Any>>;
pub(crate) type EnumParseFn = fn(&Value) -> Option<Box<dyn Any>>;
pub(crate) type InvokeFn = fn(&[Option<Value>]) -> Option<Box<dyn Any>>;

/// Descriptor table for one hydratable type.
///
/// Built once per type, on first access, inside the `LazyLock` static the
/// derive macro emits; the table is read-only for the life of the process.
pub struct TypeDescriptor<T> {
    type_name: &'static str,
    properties: Vec<Property<T>>,
    names: Vec<&'static str>,
}

impl<T> TypeDescriptor<T> {
    /// Start an empty descriptor for `type_name`.
    #[must_use]
    pub const fn new(type_name: &'static str) -> Self {
        Self {
            type_name,
            properties: Vec::new(),
            names: Vec::new(),
        }
    }

    /// Append a declared property.
    #[must_use]
    pub fn property(mut self, property: Property<T>) -> Self {
        self.names.push(property.name);
        self.properties.push(property);
        self
    }

    /// Diagnostic name of the described type.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Declared properties, in declaration order.
    #[must_use]
    pub fn properties(&self) -> &[Property<T>] {
        &self.properties
    }

    /// Declared property names, in declaration order.
    #[must_use]
    pub fn property_names(&self) -> &[&'static str] {
        &self.names
    }

    /// Look up a declared property by name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Property<T>> {
        self.properties.iter().find(|property| property.name == name)
    }
}

/// One declared property: a name, a declared-type tag and the accessor
/// references hydration dispatches over.
pub struct Property<T> {
    name: &'static str,
    declared: DeclaredType,
    pub(crate) set: Option<BindFn<T>>,
    pub(crate) add: Option<BindFn<T>>,
    pub(crate) assign: Option<BindFn<T>>,
    pub(crate) read: Option<ReadFn<T>>,
}

impl<T> Property<T> {
    /// A property with no bindings; hydration leaves it untouched until a
    /// binding is attached.
    #[must_use]
    pub const fn new(name: &'static str, declared: DeclaredType) -> Self {
        Self {
            name,
            declared,
            set: None,
            add: None,
            assign: None,
            read: None,
        }
    }

    /// Attach a bulk setter binding.
    #[must_use]
    pub const fn set(mut self, binding: BindFn<T>) -> Self {
        self.set = Some(binding);
        self
    }

    /// Attach an element-wise adder binding for plural properties.
    #[must_use]
    pub const fn add(mut self, binding: BindFn<T>) -> Self {
        self.add = Some(binding);
        self
    }

    /// Attach a direct-assignment binding.
    #[must_use]
    pub const fn assign(mut self, binding: BindFn<T>) -> Self {
        self.assign = Some(binding);
        self
    }

    /// Attach a read accessor used when this type acts as an object source.
    #[must_use]
    pub const fn read(mut self, accessor: ReadFn<T>) -> Self {
        self.read = Some(accessor);
        self
    }

    /// The property's name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The property's declared type.
    #[must_use]
    pub const fn declared(&self) -> &DeclaredType {
        &self.declared
    }
}

/// Declared type of a property, driving coercion.
#[derive(Clone, Debug)]
pub enum DeclaredType {
    /// Built-in value, passed through unchanged.
    Scalar,
    /// Enumeration parsed by permissive lookup-by-value.
    Enum(EnumSpec),
    /// Nested hydratable type, recursively hydrated.
    Nested(NestedSpec),
    /// Plain constructor-bearing type, built by parameter-name binding.
    Constructed(CtorSpec),
    /// Sequence whose elements are coerced against the inner declared type.
    Sequence(Box<DeclaredType>),
    /// Ordered union of candidate types; the last successful coercion wins.
    Union(Vec<DeclaredType>),
}

impl DeclaredType {
    /// Declared type for a nested hydratable `T`.
    #[must_use]
    pub fn nested<T>() -> Self
    where
        T: Hydrate + Clone + Default,
    {
        Self::Nested(NestedSpec::of::<T>())
    }

    /// Declared type for an enumeration `E`.
    #[must_use]
    pub fn enumeration<E>() -> Self
    where
        E: DeserializeOwned + Any,
    {
        Self::Enum(EnumSpec::of::<E>())
    }

    /// Declared type for a constructor-bearing `C`.
    #[must_use]
    pub fn constructed<C>() -> Self
    where
        C: Constructible + Clone,
    {
        Self::Constructed(CtorSpec::of::<C>())
    }

    /// Declared type for a sequence of `element` values.
    #[must_use]
    pub fn sequence(element: Self) -> Self {
        Self::Sequence(Box::new(element))
    }

    /// Declared type for an ordered union of `candidates`.
    #[must_use]
    pub fn union<I>(candidates: I) -> Self
    where
        I: IntoIterator<Item = Self>,
    {
        Self::Union(candidates.into_iter().collect())
    }
}

/// Coercion spec for an enumeration type.
#[derive(Clone, Debug)]
pub struct EnumSpec {
    type_name: &'static str,
    pub(crate) parse: EnumParseFn,
}

impl EnumSpec {
    /// Spec for enumeration `E`, parsed through serde's value lookup.
    #[must_use]
    pub fn of<E>() -> Self
    where
        E: DeserializeOwned + Any,
    {
        let parse: EnumParseFn = |value| {
            serde_json::from_value::<E>(value.clone())
                .ok()
                .map(|parsed| Box::new(parsed) as Box<dyn Any>)
        };
        Self {
            type_name: std::any::type_name::<E>(),
            parse,
        }
    }

    /// Diagnostic name of the enumeration type.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }
}

/// Coercion spec for a nested hydratable type.
#[derive(Clone, Debug)]
pub struct NestedSpec {
    type_name: &'static str,
    pub(crate) type_id: TypeId,
    pub(crate) reuse: ReuseFn,
    pub(crate) create: CreateFn,
}

impl NestedSpec {
    /// Spec for hydratable `T`.
    #[must_use]
    pub fn of<T>() -> Self
    where
        T: Hydrate + Clone + Default,
    {
        let reuse: ReuseFn = |instance| {
            instance
                .downcast_ref::<T>()
                .map(|typed| Box::new(typed.clone()) as Box<dyn Any>)
        };
        let create: CreateFn = |raw| {
            T::create(raw).map(|hydrated| Box::new(hydrated.into_inner()) as Box<dyn Any>)
        };
        Self {
            type_name: std::any::type_name::<T>(),
            type_id: TypeId::of::<T>(),
            reuse,
            create,
        }
    }

    /// Diagnostic name of the nested type.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }
}

/// Plain types constructed by binding resolved values to named parameters.
///
/// This is the compile-time rendition of constructor-parameter reflection:
/// the parameter list is declared explicitly and `construct` is handed one
/// resolved value per parameter, in positional order.
pub trait Constructible: Sized + Any {
    /// Constructor parameter names, in positional order.
    const PARAMS: &'static [&'static str];

    /// Invoke the constructor with values resolved by name.
    ///
    /// `None` entries are parameters the source could not resolve; the
    /// implementation falls back to its own defaults for them. Returning
    /// `None` declares the type unconstructable from the resolved values.
    fn construct(args: &[Option<Value>]) -> Option<Self>;
}

/// Coercion spec for a plain constructor-bearing type.
#[derive(Clone, Debug)]
pub struct CtorSpec {
    type_name: &'static str,
    pub(crate) type_id: TypeId,
    pub(crate) params: &'static [&'static str],
    pub(crate) invoke: InvokeFn,
    pub(crate) reuse: ReuseFn,
}

impl CtorSpec {
    /// Spec for constructible `C`.
    #[must_use]
    pub fn of<C>() -> Self
    where
        C: Constructible + Clone,
    {
        let invoke: InvokeFn =
            |args| C::construct(args).map(|built| Box::new(built) as Box<dyn Any>);
        let reuse: ReuseFn = |instance| {
            instance
                .downcast_ref::<C>()
                .map(|typed| Box::new(typed.clone()) as Box<dyn Any>)
        };
        Self {
            type_name: std::any::type_name::<C>(),
            type_id: TypeId::of::<C>(),
            params: C::PARAMS,
            invoke,
            reuse,
        }
    }

    /// Diagnostic name of the constructed type.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Declared constructor parameter names.
    #[must_use]
    pub const fn params(&self) -> &'static [&'static str] {
        self.params
    }
}
