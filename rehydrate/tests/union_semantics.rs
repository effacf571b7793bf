//! Union-typed properties: ordered candidates, last success wins.

use anyhow::Result;
use rehydrate::{Coerced, Hydrate, RawValue};
use rstest::rstest;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use test_helpers::{Address, Contact, Legacy, Slip};

fn mapping(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a mapping, got {other:?}"),
    }
}

#[rstest]
fn the_last_successful_candidate_wins() -> Result<()> {
    // Both candidates succeed for a mapping: the scalar candidate passes
    // the raw value through, then the nested candidate hydrates an
    // `Address`. The later success is the one kept.
    let data = json!({"contact": {"street": "2 Quai Vert", "city": "Nantes"}});
    let hydrated = Slip::create(RawValue::borrowed(&data))?;

    assert_eq!(
        hydrated.value().contact,
        Contact::Postal(Address {
            street: "2 Quai Vert".to_owned(),
            city: "Nantes".to_owned()
        })
    );
    Ok(())
}

#[rstest]
fn scalar_candidates_carry_bare_values() -> Result<()> {
    let data = json!({"contact": "ring twice"});
    let hydrated = Slip::create(RawValue::borrowed(&data))?;

    assert_eq!(
        hydrated.value().contact,
        Contact::Line("ring twice".to_owned())
    );
    Ok(())
}

fn first_string(coerced: Coerced) -> Option<String> {
    rehydrate::coerced_into::<String>(coerced)
}

#[derive(Hydrate, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
struct Parcel {
    #[hydrate(union = "constructed: Legacy | scalar", with = "first_string")]
    label: String,
}

#[rstest]
fn uninstantiable_candidates_are_discarded_silently() -> Result<()> {
    let data = mapping(json!({"label": "fragile"}));
    let hydrated = Parcel::default().from_map(&data)?;

    assert_eq!(hydrated.value().label, "fragile");
    assert_eq!(hydrated.ledger().names(), ["label"].as_slice());
    Ok(())
}

#[derive(Hydrate, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
struct Sealed {
    #[hydrate(union = "constructed: Legacy", with = "first_string")]
    label: String,
}

#[rstest]
fn a_union_with_no_survivor_leaves_the_property_untouched() -> Result<()> {
    let data = mapping(json!({"label": "ignored"}));
    let hydrated = Sealed {
        label: "preset".to_owned(),
    }
    .from_map(&data)?;

    assert_eq!(hydrated.value().label, "preset");
    assert!(hydrated.ledger().is_empty());
    Ok(())
}

#[derive(Hydrate, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
struct Cabinet {
    #[hydrate(constructed)]
    relic: Option<Legacy>,
}

#[rstest]
fn uninstantiable_failures_propagate_outside_unions() {
    let data = mapping(json!({"relic": {"anything": 1}}));
    let outcome = Cabinet::default().from_map(&data);
    assert!(outcome.is_err_and(|error| error.is_uninstantiable()));
}
