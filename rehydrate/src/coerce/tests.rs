//! Unit tests for the coercion routine, using hand-built descriptors.

use std::any::Any;
use std::sync::LazyLock;

use rstest::rstest;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::descriptor::{Constructible, DeclaredType, Property, TypeDescriptor};
use crate::value::{PropertySource, RawValue};
use crate::{
    Coerced, Hydrate, coerce, coerced_into, coerced_into_vec, read_property, read_value,
};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
struct Point {
    x: i64,
    y: i64,
}

impl Hydrate for Point {
    fn descriptor() -> &'static TypeDescriptor<Self> {
        static DESCRIPTOR: LazyLock<TypeDescriptor<Point>> = LazyLock::new(|| {
            TypeDescriptor::new("Point")
                .property(
                    Property::new("x", DeclaredType::Scalar)
                        .assign(|point: &mut Point, coerced| {
                            if let Some(value) = coerced_into::<i64>(coerced) {
                                point.x = value;
                            }
                        })
                        .read(|point: &Point| read_value(&point.x)),
                )
                .property(
                    Property::new("y", DeclaredType::Scalar)
                        .assign(|point: &mut Point, coerced| {
                            if let Some(value) = coerced_into::<i64>(coerced) {
                                point.y = value;
                            }
                        })
                        .read(|point: &Point| read_value(&point.y)),
                )
        });
        &DESCRIPTOR
    }
}

impl PropertySource for Point {
    fn property_names(&self) -> &'static [&'static str] {
        Point::descriptor().property_names()
    }

    fn read(&self, name: &str) -> Option<RawValue<'_>> {
        read_property(self, name)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Tone {
    Light,
    Dark,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
struct Money {
    amount: i64,
    currency: String,
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

#[derive(Clone, Debug, Default, PartialEq)]
struct Opaque;

impl Constructible for Opaque {
    const PARAMS: &'static [&'static str] = &[];

    fn construct(_args: &[Option<Value>]) -> Option<Self> {
        None
    }
}

fn coerce_one(declared: &DeclaredType, value: &Value) -> Option<Coerced> {
    coerce(declared, &RawValue::borrowed(value)).unwrap_or_else(|error| panic!("{error}"))
}

#[rstest]
#[case(json!(5))]
#[case(json!("five"))]
#[case(json!([1, 2, 3]))]
#[case(json!({"nested": true}))]
fn scalar_passes_raw_through_unchanged(#[case] value: Value) {
    match coerce_one(&DeclaredType::Scalar, &value) {
        Some(Coerced::Raw(passed)) => assert_eq!(passed, value),
        other => panic!("expected raw passthrough, got {other:?}"),
    }
}

#[rstest]
fn scalar_has_no_value_form_for_objects() {
    let source = Point { x: 1, y: 2 };
    let outcome = coerce(&DeclaredType::Scalar, &RawValue::object(&source));
    assert!(matches!(outcome, Ok(None)));
}

#[rstest]
fn enumeration_parses_by_value() {
    let coerced = coerce_one(&DeclaredType::enumeration::<Tone>(), &json!("dark"));
    assert_eq!(coerced.and_then(coerced_into::<Tone>), Some(Tone::Dark));
}

#[rstest]
fn enumeration_miss_is_absent_not_error() {
    let coerced = coerce_one(&DeclaredType::enumeration::<Tone>(), &json!("sepia"));
    assert!(matches!(coerced, Some(Coerced::Absent)));
}

#[rstest]
fn nested_mapping_hydrates_recursively() {
    let coerced = coerce_one(&DeclaredType::nested::<Point>(), &json!({"x": 3, "y": 4}));
    assert_eq!(
        coerced.and_then(coerced_into::<Point>),
        Some(Point { x: 3, y: 4 })
    );
}

#[rstest]
fn nested_instance_is_reused_not_rehydrated() {
    let original = Point { x: 9, y: 9 };
    let declared = DeclaredType::nested::<Point>();
    let coerced = coerce(&declared, &RawValue::object(&original))
        .unwrap_or_else(|error| panic!("{error}"));
    assert_eq!(coerced.and_then(coerced_into::<Point>), Some(original));
}

#[rstest]
fn nested_scalar_raw_passes_through() {
    let coerced = coerce_one(&DeclaredType::nested::<Point>(), &json!("not-a-point"));
    assert!(matches!(coerced, Some(Coerced::Raw(Value::String(_)))));
}

#[rstest]
fn constructor_binds_parameters_by_name() {
    let declared = DeclaredType::constructed::<Money>();
    let coerced = coerce_one(&declared, &json!({"amount": 12, "currency": "EUR"}));
    assert_eq!(
        coerced.and_then(coerced_into::<Money>),
        Some(Money {
            amount: 12,
            currency: "EUR".to_owned()
        })
    );
}

#[rstest]
fn omitted_parameters_fall_back_to_defaults() {
    let declared = DeclaredType::constructed::<Money>();
    let coerced = coerce_one(&declared, &json!({"amount": 12, "note": "ignored"}));
    assert_eq!(
        coerced.and_then(coerced_into::<Money>),
        Some(Money {
            amount: 12,
            currency: "USD".to_owned()
        })
    );
}

#[rstest]
#[case(json!("bare scalar"))]
#[case(json!({"anything": 1}))]
fn zero_parameter_constructor_is_uninstantiable(#[case] value: Value) {
    let declared = DeclaredType::constructed::<Opaque>();
    let outcome = coerce(&declared, &RawValue::borrowed(&value));
    assert!(outcome.is_err_and(|error| error.is_uninstantiable()));
}

#[rstest]
fn unresolvable_parameters_are_uninstantiable() {
    let declared = DeclaredType::constructed::<Money>();
    let outcome = coerce(&declared, &RawValue::owned(json!({"other": true})));
    assert!(outcome.is_err_and(|error| error.is_uninstantiable()));
}

#[rstest]
fn declined_invocation_is_uninstantiable() {
    // `currency` resolves but the required `amount` does not.
    let declared = DeclaredType::constructed::<Money>();
    let outcome = coerce(&declared, &RawValue::owned(json!({"currency": "EUR"})));
    assert!(outcome.is_err_and(|error| error.is_uninstantiable()));
}

#[rstest]
fn sequences_coerce_element_wise() {
    let declared = DeclaredType::sequence(DeclaredType::nested::<Point>());
    let coerced = coerce_one(&declared, &json!([{"x": 1, "y": 1}, {"x": 2, "y": 2}]));
    let points = coerced.and_then(coerced_into_vec::<Point>);
    assert_eq!(
        points,
        Some(vec![Point { x: 1, y: 1 }, Point { x: 2, y: 2 }])
    );
}

#[rstest]
fn non_sequence_raw_against_sequence_passes_through() {
    let declared = DeclaredType::sequence(DeclaredType::Scalar);
    let coerced = coerce_one(&declared, &json!("single"));
    assert!(matches!(coerced, Some(Coerced::Raw(Value::String(_)))));
}

#[rstest]
fn union_keeps_the_last_success() {
    // Both candidates succeed; the later enumeration overrides the scalar.
    let declared = DeclaredType::union([
        DeclaredType::Scalar,
        DeclaredType::enumeration::<Tone>(),
    ]);
    let coerced = coerce_one(&declared, &json!("light"));
    assert_eq!(coerced.and_then(coerced_into::<Tone>), Some(Tone::Light));

    let reversed = DeclaredType::union([
        DeclaredType::enumeration::<Tone>(),
        DeclaredType::Scalar,
    ]);
    let raw = coerce_one(&reversed, &json!("light"));
    assert!(matches!(raw, Some(Coerced::Raw(Value::String(_)))));
}

#[rstest]
fn union_discards_uninstantiable_candidates() {
    let declared = DeclaredType::union([
        DeclaredType::constructed::<Opaque>(),
        DeclaredType::Scalar,
    ]);
    let coerced = coerce_one(&declared, &json!(41));
    assert!(matches!(coerced, Some(Coerced::Raw(Value::Number(_)))));
}

#[rstest]
fn union_with_no_survivor_yields_nothing() {
    let declared = DeclaredType::union([DeclaredType::constructed::<Opaque>()]);
    let outcome = coerce(&declared, &RawValue::owned(json!("anything")));
    assert!(matches!(outcome, Ok(None)));
}

#[rstest]
fn coerced_into_absorbs_mismatches() {
    assert_eq!(coerced_into::<i64>(Coerced::Raw(json!("nope"))), None);
    assert_eq!(coerced_into::<i64>(Coerced::Absent), None);
    assert_eq!(coerced_into::<i64>(Coerced::Raw(json!(7))), Some(7));
}

#[rstest]
fn coerced_into_vec_drops_unconvertible_elements() {
    let elements = Coerced::Seq(vec![
        Coerced::Raw(json!(1)),
        Coerced::Absent,
        Coerced::Raw(json!(3)),
    ]);
    assert_eq!(coerced_into_vec::<i64>(elements), Some(vec![1, 3]));
}
