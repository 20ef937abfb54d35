//! Pluggable equality, hashing and ordering.
//!
//! A [`Comparer`] decides when two values are "the same" for one purpose.
//! The four rule comparers treat rules (and dimensions) as equal when their
//! exact, normalized, minimal or basic forms are equal, which is what the
//! framework uses to group dimensions by rule.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use crate::error::{MeasureError, Result};
use crate::rule::{DerivationRule, DimensionRule};

pub trait Comparer<T: ?Sized> {
    fn compare(&self, x: &T, y: &T) -> Ordering;

    /// Must agree with [`Comparer::compare`]: equal values hash equally.
    fn hash<H: Hasher>(&self, value: &T, state: &mut H);

    fn equals(&self, x: &T, y: &T) -> bool {
        std::ptr::eq(x, y) || self.compare(x, y) == Ordering::Equal
    }

    /// Two missing values are equal; a missing and a present value are not.
    fn equals_optional(&self, x: Option<&T>, y: Option<&T>) -> bool {
        match (x, y) {
            (None, None) => true,
            (Some(x), Some(y)) => self.equals(x, y),
            _ => false,
        }
    }

    /// Ordering against a missing operand is an error.
    fn compare_optional(&self, x: Option<&T>, y: Option<&T>) -> Result<Ordering> {
        match (x, y) {
            (Some(x), Some(y)) => Ok(self.compare(x, y)),
            (None, _) => Err(MeasureError::MissingOperand { side: "left" }),
            (_, None) => Err(MeasureError::MissingOperand { side: "right" }),
        }
    }
}

/// Projection of a rule onto one of its canonical forms.
pub trait CanonicalForm: Copy + Default {
    fn project<'r, 'a, R: DimensionRule<'a> + ?Sized>(rule: &'r R) -> Cow<'r, DerivationRule<'a>>;
}

macro_rules! rule_comparer {
    ($(#[$meta:meta])* $name:ident, $method:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
        pub struct $name;

        impl CanonicalForm for $name {
            fn project<'r, 'a, R: DimensionRule<'a> + ?Sized>(
                rule: &'r R,
            ) -> Cow<'r, DerivationRule<'a>> {
                rule.$method()
            }
        }

        /// # Panics
        ///
        /// `compare` panics for rules of different frameworks.
        impl<'a, R: DimensionRule<'a> + ?Sized> Comparer<R> for $name {
            fn compare(&self, x: &R, y: &R) -> Ordering {
                Self::project(x).cmp(&Self::project(y))
            }

            fn hash<H: Hasher>(&self, value: &R, state: &mut H) {
                Self::project(value).hash(state);
            }
        }
    };
}

rule_comparer!(
    /// Equal when the components are identical, in order.
    ExactRuleComparer,
    exact_rule
);
rule_comparer!(
    /// Equal when the components are identical up to reordering.
    NormalizedRuleComparer,
    normalized_rule
);
rule_comparer!(
    /// Equal when both reduce to the same minimal dimensions.
    MinimalRuleComparer,
    minimal_rule
);
rule_comparer!(
    /// Equal when both reduce to the same basic dimensions.
    BasicRuleComparer,
    basic_rule
);

/// A value paired with the comparer that defines its identity, so it can be
/// used as a `HashMap` or `BTreeMap` key.
#[derive(Debug, Clone, Copy)]
pub struct Keyed<C, T> {
    comparer: C,
    value: T,
}

impl<C, T> Keyed<C, T> {
    pub fn new(comparer: C, value: T) -> Self {
        Self { comparer, value }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn into_value(self) -> T {
        self.value
    }
}

impl<C: Comparer<T>, T> PartialEq for Keyed<C, T> {
    fn eq(&self, other: &Self) -> bool {
        self.comparer.equals(&self.value, &other.value)
    }
}

impl<C: Comparer<T>, T> Eq for Keyed<C, T> {}

impl<C: Comparer<T>, T> Hash for Keyed<C, T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.comparer.hash(&self.value, state);
    }
}

impl<C: Comparer<T>, T> PartialOrd for Keyed<C, T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<C: Comparer<T>, T> Ord for Keyed<C, T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.comparer.compare(&self.value, &other.value)
    }
}
