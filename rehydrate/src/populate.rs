//! Hydration paths: populating a target from a mapping or from another
//! object.
//!
//! Both paths funnel every raw value through [`coerce`](crate::coerce::coerce)
//! and share one assignment dispatch: adder per element for sequence-shaped
//! values, else bulk setter, else direct assignment, else the property is
//! silently left untouched.

use serde_json::{Map, Value};

use crate::Hydrate;
use crate::coerce::{Coerced, coerce};
use crate::descriptor::Property;
use crate::error::HydrateResult;
use crate::outcome::{Hydrated, Ledger};
use crate::value::{PropertySource, RawValue};

/// Populate `target` from a mapping of property name to raw value.
///
/// Properties absent from `data` are never visited: no default assignment,
/// no ledger entry.
pub(crate) fn hydrate_map<T: Hydrate>(
    mut target: T,
    data: &Map<String, Value>,
) -> HydrateResult<Hydrated<T>> {
    let mut ledger = Ledger::new();
    for property in T::descriptor().properties() {
        let Some(entry) = data.get(property.name()) else {
            continue;
        };
        let raw = RawValue::borrowed(entry);
        let Some(coerced) = coerce(property.declared(), &raw)? else {
            continue;
        };
        if apply(&mut target, property, coerced) {
            ledger.record(property.name());
        }
    }
    tracing::debug!(
        receiver = T::descriptor().type_name(),
        written = ledger.len(),
        "hydrated from mapping"
    );
    Ok(Hydrated::new(target, ledger))
}

/// Populate `target` by reading each initialized property of `source` that
/// the target also declares.
///
/// Source properties the target does not declare are ignored; target
/// properties the source lacks are left untouched.
pub(crate) fn hydrate_object<T: Hydrate>(
    mut target: T,
    source: &dyn PropertySource,
) -> HydrateResult<Hydrated<T>> {
    let mut ledger = Ledger::new();
    for &name in source.property_names() {
        let Some(property) = T::descriptor().find(name) else {
            continue;
        };
        let Some(raw) = source.read(name) else {
            continue;
        };
        let Some(coerced) = coerce(property.declared(), &raw)? else {
            continue;
        };
        if apply(&mut target, property, coerced) {
            ledger.record(property.name());
        }
    }
    tracing::debug!(
        source = source.source_name(),
        receiver = T::descriptor().type_name(),
        written = ledger.len(),
        "hydrated from object"
    );
    Ok(Hydrated::new(target, ledger))
}

/// Dispatch one coerced value into the property's bindings.
///
/// Returns whether any binding fired; the caller ledgers the write.
fn apply<T>(target: &mut T, property: &Property<T>, coerced: Coerced) -> bool {
    let mut pending = coerced;
    if let Some(add) = property.add {
        match pending.try_into_elements() {
            Ok(elements) => {
                for element in elements {
                    add(target, element);
                }
                return true;
            }
            Err(original) => pending = original,
        }
    }
    if let Some(set) = property.set {
        set(target, pending);
        return true;
    }
    if let Some(assign) = property.assign {
        assign(target, pending);
        return true;
    }
    tracing::trace!(property = property.name(), "no binding accepted the value");
    false
}
