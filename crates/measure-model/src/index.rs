//! Lookup tables from a canonical rule to the dimensions sharing it.

use std::collections::HashMap;
use std::marker::PhantomData;

use crate::compare::{CanonicalForm, Comparer, Keyed};
use crate::dimension::{Dimension, RawComponent};
use crate::rule::{DerivationRule, DimensionRule};

/// Owned, framework-independent key of a rule: its `(rank, exponent)` pairs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct RuleKey(Box<[RawComponent]>);

impl RuleKey {
    pub(crate) fn of(rule: &DerivationRule<'_>) -> Self {
        Self(rule.raw().collect())
    }
}

/// Dimensions grouped by the `F` form of their own rule and of each of
/// their declared rules.
#[derive(Debug)]
pub struct RuleIndex<F> {
    buckets: HashMap<RuleKey, Vec<usize>>,
    form: PhantomData<F>,
}

impl<F: CanonicalForm> RuleIndex<F> {
    pub(crate) fn build<'a>(
        pairs: impl IntoIterator<Item = (Dimension<'a>, DerivationRule<'a>)>,
    ) -> Self
    where
        F: Comparer<DerivationRule<'a>>,
    {
        let mut groups: HashMap<Keyed<F, DerivationRule<'a>>, Vec<usize>> = HashMap::new();
        for (dimension, rule) in pairs {
            groups
                .entry(Keyed::new(F::default(), rule))
                .or_default()
                .push(dimension.order());
        }

        let buckets = groups
            .into_iter()
            .map(|(key, mut ranks)| {
                ranks.sort_unstable();
                ranks.dedup();
                (RuleKey::of(&F::project(key.value())), ranks)
            })
            .collect();
        Self {
            buckets,
            form: PhantomData,
        }
    }

    /// Ranks of the dimensions whose `F` form equals that of `rule`.
    pub(crate) fn lookup<'a, R: DimensionRule<'a> + ?Sized>(&self, rule: &R) -> &[usize] {
        self.buckets
            .get(&RuleKey::of(&F::project(rule)))
            .map_or(&[], Vec::as_slice)
    }

    pub(crate) fn len(&self) -> usize {
        self.buckets.len()
    }
}
