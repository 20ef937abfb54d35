//! Property-based tests for the derivation-rule algebra.

use std::cmp::Ordering;
use std::sync::LazyLock;

use measure_model::{
    DerivationRule, DerivationRuleBuilder, DimensionRule, MeasurementFramework,
};
use proptest::prelude::*;

static FRAMEWORK: LazyLock<MeasurementFramework> = LazyLock::new(|| {
    let mut builder = MeasurementFramework::builder("Algebra").unwrap();
    let length = builder.dimension("Length").unwrap().handle();
    let mass = builder.dimension("Mass").unwrap().handle();
    let time = builder.dimension("Time").unwrap().handle();
    let speed = builder
        .dimension("Speed")
        .unwrap()
        .with_rule(DerivationRuleBuilder::new().by(&length).per(&time))
        .unwrap()
        .handle();
    builder
        .dimension("Momentum")
        .unwrap()
        .with_rule(DerivationRuleBuilder::new().by(&mass).by(&speed))
        .unwrap();
    builder
        .dimension("PlaneAngle")
        .unwrap()
        .minimal()
        .with_rule(DerivationRuleBuilder::new().by(&length).per(&length))
        .unwrap();
    builder.build().unwrap()
});

fn rule_from(terms: &[(usize, i32)]) -> DerivationRule<'static> {
    let framework: &'static MeasurementFramework = &FRAMEWORK;
    framework
        .rule(terms.iter().map(|&(order, exponent)| {
            (framework.dimension_at(order).unwrap(), exponent)
        }))
        .unwrap()
}

fn terms() -> impl Strategy<Value = Vec<(usize, i32)>> {
    prop::collection::vec((0..FRAMEWORK.len(), -3i32..=3), 0..5)
}

proptest! {
    /// Powers compose: (R^a)^b has the canonical forms of R^(a*b).
    #[test]
    fn prop_power_composes(terms in terms(), a in -3i32..=3, b in -3i32..=3) {
        let nested = rule_from(&terms).power(a).power(b);
        let direct = rule_from(&terms).power(a * b);
        prop_assert_eq!(&nested, &direct);
        prop_assert_eq!(nested.normalized_rule(), direct.normalized_rule());
        prop_assert_eq!(nested.minimal_rule(), direct.minimal_rule());
        prop_assert_eq!(nested.basic_rule(), direct.basic_rule());
    }

    /// Multiplication commutes at the normalized level.
    #[test]
    fn prop_multiply_commutes(left in terms(), right in terms()) {
        let (a, b) = (rule_from(&left), rule_from(&right));
        let ab = a.multiply(&b).unwrap();
        let ba = b.multiply(&a).unwrap();
        prop_assert_eq!(ab.normalized_rule(), ba.normalized_rule());
    }

    /// Multiplication associates at the normalized level.
    #[test]
    fn prop_multiply_associates(x in terms(), y in terms(), z in terms()) {
        let (a, b, c) = (rule_from(&x), rule_from(&y), rule_from(&z));
        let left = a.multiply(&b).unwrap().multiply(&c).unwrap();
        let right = a.multiply(&b.multiply(&c).unwrap()).unwrap();
        prop_assert_eq!(left.normalized_rule(), right.normalized_rule());
    }

    /// Dividing by B undoes multiplying by B once exponents are merged.
    #[test]
    fn prop_divide_inverts_multiply(left in terms(), right in terms()) {
        let (a, b) = (rule_from(&left), rule_from(&right));
        let round_trip = a.multiply(&b).unwrap().divide(&b).unwrap();
        prop_assert_eq!(round_trip.minimal_rule(), a.minimal_rule());
        prop_assert_eq!(round_trip.basic_rule(), a.basic_rule());
    }

    /// Exactly one of <, ==, > holds and it agrees with equality.
    #[test]
    fn prop_order_is_trichotomous(left in terms(), right in terms()) {
        let (a, b) = (rule_from(&left), rule_from(&right));
        let forward = a.cmp(&b);
        prop_assert_eq!(forward, b.cmp(&a).reverse());
        prop_assert_eq!(forward == Ordering::Equal, a == b);
    }

    /// Sorting the same rules twice, from any starting order, agrees.
    #[test]
    fn prop_sorting_is_reproducible(list in prop::collection::vec(terms(), 0..8)) {
        let mut first: Vec<_> = list.iter().map(|t| rule_from(t)).collect();
        let mut second: Vec<_> = list.iter().rev().map(|t| rule_from(t)).collect();
        first.sort();
        second.sort();
        prop_assert_eq!(first, second);
    }

    /// Every canonical form is a fixed point of its own projection.
    #[test]
    fn prop_forms_are_idempotent(terms in terms()) {
        let rule = rule_from(&terms);
        let minimal = rule.minimal_rule();
        prop_assert_eq!(minimal.minimal_rule(), minimal.clone());
        let basic = rule.basic_rule();
        prop_assert!(basic.is_base());
        prop_assert_eq!(basic.basic_rule(), basic.clone());
    }
}

#[test]
fn minimal_dimension_stops_minimal_reduction() {
    let angle = FRAMEWORK.dimension_by_name("PlaneAngle").unwrap();
    assert!(angle.minimal_rule().iter().all(|c| c.dimension() == angle));
    assert!(angle.basic_rule().is_empty());
}

#[test]
fn derived_dimensions_reduce_through_their_first_rule() {
    let momentum = FRAMEWORK.dimension_by_name("Momentum").unwrap();
    assert_eq!(momentum.minimal_rule().to_string(), "Length·Mass / Time");
}
