//! Shared fixture types for hydration tests across the workspace.
//!
//! The types here cover the declared-type zoo once, so unit and
//! integration tests can hydrate against the same shapes: scalars, plural
//! properties with adders, enumerations, nested hydratables, constructor
//! binding and union candidates.

use rehydrate::{Coerced, Constructible, Hydrate};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Lifecycle state of a fixture user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Account in good standing.
    Active,
    /// Account locked out.
    Suspended,
}

/// Postal address hydrated as a nested value.
#[derive(Hydrate, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Street line.
    pub street: String,
    /// City name.
    pub city: String,
}

/// Monetary amount built through constructor-parameter binding.
///
/// `amount` is required; an unresolved `currency` falls back to `"USD"`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Minor units.
    pub amount: i64,
    /// ISO 4217 currency code.
    pub currency: String,
}

impl Constructible for Money {
    const PARAMS: &'static [&'static str] = &["amount", "currency"];

    fn construct(args: &[Option<Value>]) -> Option<Self> {
        let amount = args.first()?.as_ref().and_then(Value::as_i64)?;
        let currency = args
            .get(1)?
            .as_ref()
            .and_then(Value::as_str)
            .map_or_else(|| "USD".to_owned(), str::to_owned);
        Some(Self { amount, currency })
    }
}

/// Sentinel with an unsatisfiable, zero-parameter constructor.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Legacy;

impl Constructible for Legacy {
    const PARAMS: &'static [&'static str] = &[];

    fn construct(_args: &[Option<Value>]) -> Option<Self> {
        None
    }
}

/// The canonical hydration target.
#[derive(Hydrate, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Numeric identifier.
    pub user_id: i64,
    /// Free-form labels, populated element-by-element through `add_tag`.
    #[hydrate(add = "add_tag")]
    pub tags: Vec<String>,
    /// Account state, parsed permissively.
    #[hydrate(enumeration)]
    pub status: Option<Status>,
    /// Postal address, recursively hydrated.
    #[hydrate(nested)]
    pub address: Option<Address>,
    /// Balance built by constructor-parameter binding.
    #[hydrate(constructed)]
    pub balance: Option<Money>,
}

impl User {
    /// Append one tag.
    pub fn add_tag(&mut self, tag: String) {
        self.tags.push(tag);
    }
}

/// Slim profile sharing a subset of [`User`]'s properties.
#[derive(Hydrate, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Numeric identifier.
    pub user_id: i64,
    /// Account state.
    #[hydrate(enumeration)]
    pub status: Option<Status>,
    /// Profile-only biography; no counterpart on [`User`].
    pub bio: String,
}

/// Renamed-key target demonstrating camelCase property keys.
#[derive(Hydrate, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[hydrate(rename_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    /// Invoice number.
    pub invoice_number: String,
    /// Total in minor units, stored through its setter.
    #[hydrate(set = "set_total_minor")]
    pub total_minor: i64,
}

impl Invoice {
    /// Store a total, clamping negatives to zero.
    pub fn set_total_minor(&mut self, value: i64) {
        self.total_minor = value.max(0);
    }
}

/// A contact that may arrive as a free-form line or a structured address.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Contact {
    /// Free-form contact line.
    Line(String),
    /// Structured postal address.
    Postal(Address),
}

impl Default for Contact {
    fn default() -> Self {
        Self::Line(String::new())
    }
}

/// Convert a coerced union candidate into a [`Contact`].
#[must_use]
pub fn contact_from(coerced: Coerced) -> Option<Contact> {
    match coerced {
        Coerced::Instance(instance) => instance
            .downcast::<Address>()
            .ok()
            .map(|address| Contact::Postal(*address)),
        Coerced::Raw(value) => serde_json::from_value(value).ok(),
        _ => None,
    }
}

/// Delivery slip whose contact property accepts either candidate form.
#[derive(Hydrate, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slip {
    /// Destination contact; the union keeps the last successful candidate.
    #[hydrate(union = "scalar | nested: Address", with = "contact_from")]
    pub contact: Contact,
}
