//! Dimensions and the arena that stores them.
//!
//! A built framework owns one `DimensionTable`. Every [`Dimension`] is a
//! copyable handle made of a reference to that table plus the dimension's
//! rank, so two handles are "from the same framework" exactly when they point
//! at the same table.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::OnceLock;

use crate::error::{MeasureError, Result};
use crate::kind::DerivationRuleKind;
use crate::locale::Locale;
use crate::localizable::LocalizableItem;
use crate::rule::{DerivationRule, DimensionRule};
use crate::text::TextFormat;

/// A `(rank, exponent)` pair; the table-internal form of a rule component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct RawComponent {
    pub(crate) dimension: usize,
    pub(crate) exponent: i32,
}

impl RawComponent {
    pub(crate) fn new(dimension: usize, exponent: i32) -> Self {
        Self {
            dimension,
            exponent,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReductionForm {
    Minimal,
    Basic,
}

#[derive(Debug)]
pub(crate) struct DimensionEntry {
    pub(crate) item: LocalizableItem,
    pub(crate) identifier: u32,
    pub(crate) kind: DerivationRuleKind,
    pub(crate) rules: Vec<Vec<RawComponent>>,
    // `None` once initialised means the reduction overflowed.
    minimal: OnceLock<Option<Vec<RawComponent>>>,
    basic: OnceLock<Option<Vec<RawComponent>>>,
}

impl DimensionEntry {
    pub(crate) fn new(item: LocalizableItem, identifier: u32, kind: DerivationRuleKind) -> Self {
        Self {
            item,
            identifier,
            kind,
            rules: Vec::new(),
            minimal: OnceLock::new(),
            basic: OnceLock::new(),
        }
    }
}

/// Storage for every dimension of one framework, indexed by rank.
#[derive(Debug)]
pub(crate) struct DimensionTable {
    entries: Vec<DimensionEntry>,
}

impl DimensionTable {
    pub(crate) fn new(entries: Vec<DimensionEntry>) -> Self {
        Self { entries }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn entry(&self, index: usize) -> &DimensionEntry {
        &self.entries[index]
    }

    pub(crate) fn entries(&self) -> &[DimensionEntry] {
        &self.entries
    }

    pub(crate) fn dimension(&self, index: usize) -> Dimension<'_> {
        Dimension { table: self, index }
    }

    /// Canonical components of one dimension in the requested form.
    ///
    /// Built frameworks have had every form checked for overflow, so this
    /// never sees an error there.
    pub(crate) fn canonical(&self, index: usize, form: ReductionForm) -> &[RawComponent] {
        self.try_canonical(index, form).unwrap_or_default()
    }

    /// Must only be called once derivation cycles have been ruled out.
    pub(crate) fn try_canonical(
        &self,
        index: usize,
        form: ReductionForm,
    ) -> Result<&[RawComponent]> {
        let entry = &self.entries[index];
        let (cell, is_own) = match form {
            ReductionForm::Minimal => (&entry.minimal, entry.kind.is_minimal()),
            ReductionForm::Basic => (&entry.basic, entry.kind.is_base()),
        };
        cell.get_or_init(|| match entry.rules.first() {
            Some(rule) if !is_own => self.reduce(rule.iter().copied(), form).ok(),
            _ => Some(vec![RawComponent::new(index, 1)]),
        })
        .as_deref()
        .ok_or_else(|| self.overflow(index))
    }

    /// Expand every component into its canonical form, scale by the
    /// component's exponent and merge by dimension.
    ///
    /// The result is ordered by dimension rank and holds no zero exponents.
    pub(crate) fn reduce(
        &self,
        components: impl IntoIterator<Item = RawComponent>,
        form: ReductionForm,
    ) -> Result<Vec<RawComponent>> {
        let mut totals: BTreeMap<usize, i32> = BTreeMap::new();
        for component in components {
            if component.exponent == 0 {
                continue;
            }
            for inner in self.try_canonical(component.dimension, form)? {
                let total = totals.entry(inner.dimension).or_insert(0);
                let current = *total;
                *total = inner
                    .exponent
                    .checked_mul(component.exponent)
                    .and_then(|scaled| current.checked_add(scaled))
                    .ok_or_else(|| self.overflow(inner.dimension))?;
            }
        }
        Ok(totals
            .into_iter()
            .filter(|(_, exponent)| *exponent != 0)
            .map(|(dimension, exponent)| RawComponent::new(dimension, exponent))
            .collect())
    }

    pub(crate) fn overflow(&self, index: usize) -> MeasureError {
        MeasureError::ExponentOverflow {
            dimension: self.entries[index].item.name().to_string(),
        }
    }
}

/// A named physical quantity of a [`MeasurementFramework`].
///
/// [`MeasurementFramework`]: crate::MeasurementFramework
#[derive(Clone, Copy)]
pub struct Dimension<'a> {
    table: &'a DimensionTable,
    index: usize,
}

impl<'a> Dimension<'a> {
    pub(crate) fn table(&self) -> &'a DimensionTable {
        self.table
    }

    fn entry(&self) -> &'a DimensionEntry {
        self.table.entry(self.index)
    }

    pub fn name(&self) -> &'a str {
        self.entry().item.name()
    }

    pub fn identifier(&self) -> u32 {
        self.entry().identifier
    }

    /// Rank in declaration order, starting at 0.
    pub fn order(&self) -> usize {
        self.index
    }

    pub fn item(&self) -> &'a LocalizableItem {
        &self.entry().item
    }

    pub fn symbol(&self) -> Option<&'a str> {
        self.item().symbol()
    }

    pub fn caption(&self) -> Option<&'a str> {
        self.item().caption()
    }

    /// True when both handles come from the same framework.
    pub fn same_framework(&self, other: &Dimension<'_>) -> bool {
        std::ptr::eq(self.table, other.table)
    }

    /// The declared rules, in declaration order. Empty for basic dimensions.
    pub fn derivation_rules(&self) -> Vec<DerivationRule<'a>> {
        self.entry()
            .rules
            .iter()
            .map(|rule| DerivationRule::from_raw(self.table, rule))
            .collect()
    }

    /// `self^exponent` as a new rule.
    pub fn power(&self, exponent: i32) -> DerivationRule<'a> {
        DerivationRule::from_raw(self.table, &[RawComponent::new(self.index, exponent)])
    }

    pub fn multiply<R: DimensionRule<'a> + ?Sized>(&self, other: &R) -> Result<DerivationRule<'a>> {
        self.power(1).multiply(other)
    }

    pub fn divide<R: DimensionRule<'a> + ?Sized>(&self, other: &R) -> Result<DerivationRule<'a>> {
        self.power(1).divide(other)
    }

    /// Order by rank. Fails for dimensions of different frameworks.
    pub fn try_cmp(&self, other: &Dimension<'_>) -> Result<Ordering> {
        if !self.same_framework(other) {
            return Err(MeasureError::ForeignFramework);
        }
        Ok(self.index.cmp(&other.index))
    }

    pub fn format(&self, format: &TextFormat, locale: Option<&Locale>) -> String {
        self.item().format(format, locale)
    }

    pub fn format_with(&self, spec: &str, locale: Option<&Locale>) -> Result<String> {
        self.item().format_with(spec, locale)
    }

    fn own_form(&self, form: ReductionForm) -> DerivationRule<'a> {
        DerivationRule::from_raw(self.table, self.table.canonical(self.index, form))
    }
}

impl<'a> DimensionRule<'a> for Dimension<'a> {
    fn kind(&self) -> DerivationRuleKind {
        self.entry().kind
    }

    fn exact_rule(&self) -> Cow<'_, DerivationRule<'a>> {
        Cow::Owned(self.power(1))
    }

    fn normalized_rule(&self) -> Cow<'_, DerivationRule<'a>> {
        self.exact_rule()
    }

    fn minimal_rule(&self) -> Cow<'_, DerivationRule<'a>> {
        Cow::Owned(self.own_form(ReductionForm::Minimal))
    }

    fn basic_rule(&self) -> Cow<'_, DerivationRule<'a>> {
        Cow::Owned(self.own_form(ReductionForm::Basic))
    }
}

impl crate::rule::sealed::Sealed for Dimension<'_> {}

impl PartialEq for Dimension<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.same_framework(other) && self.index == other.index
    }
}

impl Eq for Dimension<'_> {}

impl Hash for Dimension<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}

impl PartialOrd for Dimension<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// # Panics
///
/// Panics when the dimensions belong to different frameworks; use
/// [`Dimension::try_cmp`] when that can happen.
impl Ord for Dimension<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.try_cmp(other) {
            Ok(ordering) => ordering,
            Err(error) => panic!("{error}"),
        }
    }
}

impl fmt::Display for Dimension<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(&TextFormat::default(), None))
    }
}

impl fmt::Debug for Dimension<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dimension")
            .field("name", &self.name())
            .field("identifier", &self.identifier())
            .field("order", &self.index)
            .field("kind", &self.entry().kind)
            .finish()
    }
}
