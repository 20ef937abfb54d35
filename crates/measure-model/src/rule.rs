//! Derivation rules: products of dimensions raised to integer exponents.
//!
//! Every rule has four views. The exact view keeps the components as
//! written. The normalized view sorts them by exponent and then by dimension
//! rank. The minimal and basic views expand each component into minimal
//! (respectively basic) dimensions, merge equal dimensions and drop zero
//! exponents, ordering the result by dimension rank. Derived views are
//! computed on first use and cached on the rule.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::OnceLock;

use crate::dimension::{Dimension, DimensionTable, RawComponent, ReductionForm};
use crate::error::{MeasureError, Result};
use crate::kind::DerivationRuleKind;
use crate::locale::Locale;
use crate::text::TextFormat;

const MULTIPLICATION_SIGN: &str = "·";
const DIVISION_SIGN: &str = " / ";
const UNIT: &str = "1";

pub(crate) mod sealed {
    pub trait Sealed {}
}

/// Shared surface of [`Dimension`] and [`DerivationRule`].
///
/// A dimension behaves like the single-component rule `dimension^1`.
pub trait DimensionRule<'a>: sealed::Sealed {
    fn kind(&self) -> DerivationRuleKind;

    fn is_base(&self) -> bool {
        self.kind().is_base()
    }

    fn is_minimal(&self) -> bool {
        self.kind().is_minimal()
    }

    fn is_normalized(&self) -> bool {
        self.kind().is_normalized()
    }

    fn is_exact(&self) -> bool {
        true
    }

    fn exact_rule(&self) -> Cow<'_, DerivationRule<'a>>;
    fn normalized_rule(&self) -> Cow<'_, DerivationRule<'a>>;
    fn minimal_rule(&self) -> Cow<'_, DerivationRule<'a>>;
    fn basic_rule(&self) -> Cow<'_, DerivationRule<'a>>;
}

/// One `dimension^exponent` factor of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DerivationRuleComponent<'a> {
    dimension: Dimension<'a>,
    exponent: i32,
}

impl<'a> DerivationRuleComponent<'a> {
    pub fn new(dimension: Dimension<'a>, exponent: i32) -> Self {
        Self {
            dimension,
            exponent,
        }
    }

    pub fn dimension(&self) -> Dimension<'a> {
        self.dimension
    }

    pub fn exponent(&self) -> i32 {
        self.exponent
    }

    /// Order by exponent, then by dimension rank.
    pub fn try_cmp(&self, other: &DerivationRuleComponent<'_>) -> Result<Ordering> {
        let by_dimension = self.dimension.try_cmp(&other.dimension)?;
        Ok(self.exponent.cmp(&other.exponent).then(by_dimension))
    }

    fn raw(&self) -> RawComponent {
        RawComponent::new(self.dimension.order(), self.exponent)
    }

    fn scaled(&self, factor: i32) -> Result<Self> {
        self.exponent
            .checked_mul(factor)
            .map(|exponent| Self::new(self.dimension, exponent))
            .ok_or_else(|| MeasureError::ExponentOverflow {
                dimension: self.dimension.name().to_string(),
            })
    }

    fn render(&self, format: &TextFormat, locale: Option<&Locale>, exponent: i32) -> String {
        let text = self.dimension.format(format, locale);
        if exponent == 1 {
            text
        } else {
            format!("{text}^{exponent}")
        }
    }
}

impl PartialOrd for DerivationRuleComponent<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// # Panics
///
/// Panics when the components belong to different frameworks.
impl Ord for DerivationRuleComponent<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.try_cmp(other) {
            Ok(ordering) => ordering,
            Err(error) => panic!("{error}"),
        }
    }
}

impl fmt::Display for DerivationRuleComponent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(&TextFormat::default(), None, self.exponent))
    }
}

type Cached<'a> = OnceLock<Option<Box<DerivationRule<'a>>>>;

/// An ordered product of dimension components.
///
/// Rules are immutable; every operation returns a new rule.
///
/// # Panics
///
/// Reading the minimal or basic form panics when merging exponents
/// overflows `i32`. Declared rules of a built framework never do.
#[derive(Clone)]
pub struct DerivationRule<'a> {
    table: &'a DimensionTable,
    components: Vec<DerivationRuleComponent<'a>>,
    // `None` once initialised means "this rule is its own form".
    normalized: Cached<'a>,
    minimal: Cached<'a>,
    basic: Cached<'a>,
}

impl<'a> DerivationRule<'a> {
    pub(crate) fn from_components(
        table: &'a DimensionTable,
        components: Vec<DerivationRuleComponent<'a>>,
    ) -> Self {
        Self {
            table,
            components,
            normalized: OnceLock::new(),
            minimal: OnceLock::new(),
            basic: OnceLock::new(),
        }
    }

    pub(crate) fn from_raw(table: &'a DimensionTable, raw: &[RawComponent]) -> Self {
        let components = raw
            .iter()
            .map(|c| DerivationRuleComponent::new(table.dimension(c.dimension), c.exponent))
            .collect();
        Self::from_components(table, components)
    }

    pub(crate) fn table(&self) -> &'a DimensionTable {
        self.table
    }

    pub(crate) fn raw(&self) -> impl Iterator<Item = RawComponent> + '_ {
        self.components.iter().map(DerivationRuleComponent::raw)
    }

    pub fn components(&self) -> &[DerivationRuleComponent<'a>] {
        &self.components
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DerivationRuleComponent<'a>> {
        self.components.iter()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// True for the dimensionless rule.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn same_framework(&self, other: &DerivationRule<'_>) -> bool {
        std::ptr::eq(self.table, other.table)
    }

    /// Multiply every exponent by `exponent`. A power of one returns `self`.
    ///
    /// # Panics
    ///
    /// Panics when an exponent overflows `i32`; use
    /// [`DerivationRule::try_power`] when that can happen.
    pub fn power(self, exponent: i32) -> Self {
        match self.try_power(exponent) {
            Ok(rule) => rule,
            Err(error) => panic!("{error}"),
        }
    }

    pub fn try_power(self, exponent: i32) -> Result<Self> {
        if exponent == 1 {
            return Ok(self);
        }
        let components = self
            .components
            .iter()
            .map(|c| c.scaled(exponent))
            .collect::<Result<_>>()?;
        Ok(Self::from_components(self.table, components))
    }

    /// Concatenate the components of `other` after those of `self`.
    pub fn multiply<R: DimensionRule<'a> + ?Sized>(&self, other: &R) -> Result<Self> {
        self.combine(other, 1)
    }

    /// Concatenate the components of `other`, with negated exponents.
    pub fn divide<R: DimensionRule<'a> + ?Sized>(&self, other: &R) -> Result<Self> {
        self.combine(other, -1)
    }

    fn combine<R: DimensionRule<'a> + ?Sized>(&self, other: &R, sign: i32) -> Result<Self> {
        let other = other.exact_rule();
        if !self.same_framework(&other) {
            return Err(MeasureError::ForeignFramework);
        }
        let components = self
            .components
            .iter()
            .copied()
            .map(Ok)
            .chain(other.components.iter().map(|c| c.scaled(sign)))
            .collect::<Result<_>>()?;
        Ok(Self::from_components(self.table, components))
    }

    /// Componentwise order. When one rule is a prefix of the other, the next
    /// component of the longer rule decides: a positive exponent makes the
    /// shorter rule lesser, anything else makes it greater.
    pub fn try_cmp(&self, other: &DerivationRule<'_>) -> Result<Ordering> {
        if !self.same_framework(other) {
            return Err(MeasureError::ForeignFramework);
        }
        let left: Vec<RawComponent> = self.raw().collect();
        let right: Vec<RawComponent> = other.raw().collect();
        Ok(compare_raw(&left, &right))
    }

    pub fn format(&self, format: &TextFormat, locale: Option<&Locale>) -> String {
        let (numerator, denominator): (Vec<&DerivationRuleComponent<'a>>, Vec<_>) =
            self.components.iter().partition(|c| c.exponent >= 0);
        let numerator = numerator
            .iter()
            .map(|c| c.render(format, locale, c.exponent))
            .collect::<Vec<_>>()
            .join(MULTIPLICATION_SIGN);
        let denominator = denominator
            .iter()
            .map(|c| c.render(format, locale, -c.exponent))
            .collect::<Vec<_>>()
            .join(MULTIPLICATION_SIGN);

        match (numerator.is_empty(), denominator.is_empty()) {
            (true, true) => UNIT.to_string(),
            (true, false) => format!("{UNIT}{DIVISION_SIGN}{denominator}"),
            (false, true) => numerator,
            (false, false) => format!("{numerator}{DIVISION_SIGN}{denominator}"),
        }
    }

    pub fn format_with(&self, spec: &str, locale: Option<&Locale>) -> Result<String> {
        let format: TextFormat = spec.parse()?;
        Ok(self.format(&format, locale))
    }

    fn own_or(&self, components: Vec<DerivationRuleComponent<'a>>) -> Option<Box<Self>> {
        (components != self.components)
            .then(|| Box::new(Self::from_components(self.table, components)))
    }

    fn normalized_form(&self) -> Option<&Self> {
        self.normalized
            .get_or_init(|| {
                let mut sorted = self.components.clone();
                sorted.sort_by_key(|c| (c.exponent, c.dimension.order()));
                self.own_or(sorted)
            })
            .as_deref()
    }

    fn reduced_form(&self, form: ReductionForm) -> Option<&Self> {
        let cell = match form {
            ReductionForm::Minimal => &self.minimal,
            ReductionForm::Basic => &self.basic,
        };
        cell.get_or_init(|| match self.table.reduce(self.raw(), form) {
            Ok(raw) => self.own_or(Self::from_raw(self.table, &raw).components),
            Err(error) => panic!("{error}"),
        })
        .as_deref()
    }
}

fn compare_raw(left: &[RawComponent], right: &[RawComponent]) -> Ordering {
    for (l, r) in left.iter().zip(right) {
        let ordering = l
            .exponent
            .cmp(&r.exponent)
            .then(l.dimension.cmp(&r.dimension));
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    match left.len().cmp(&right.len()) {
        Ordering::Equal => Ordering::Equal,
        Ordering::Less if right[left.len()].exponent > 0 => Ordering::Less,
        Ordering::Less => Ordering::Greater,
        Ordering::Greater if left[right.len()].exponent > 0 => Ordering::Greater,
        Ordering::Greater => Ordering::Less,
    }
}

impl<'a> DimensionRule<'a> for DerivationRule<'a> {
    /// The most fundamental form this rule is already written in.
    fn kind(&self) -> DerivationRuleKind {
        if self.reduced_form(ReductionForm::Basic).is_none() {
            DerivationRuleKind::Basic
        } else if self.reduced_form(ReductionForm::Minimal).is_none() {
            DerivationRuleKind::Minimal
        } else if self.normalized_form().is_none() {
            DerivationRuleKind::Normalized
        } else {
            DerivationRuleKind::Exact
        }
    }

    fn exact_rule(&self) -> Cow<'_, DerivationRule<'a>> {
        Cow::Borrowed(self)
    }

    fn normalized_rule(&self) -> Cow<'_, DerivationRule<'a>> {
        Cow::Borrowed(self.normalized_form().unwrap_or(self))
    }

    fn minimal_rule(&self) -> Cow<'_, DerivationRule<'a>> {
        Cow::Borrowed(self.reduced_form(ReductionForm::Minimal).unwrap_or(self))
    }

    fn basic_rule(&self) -> Cow<'_, DerivationRule<'a>> {
        Cow::Borrowed(self.reduced_form(ReductionForm::Basic).unwrap_or(self))
    }
}

impl sealed::Sealed for DerivationRule<'_> {}

/// Rules from different frameworks are never equal.
impl PartialEq for DerivationRule<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.same_framework(other) && self.raw().eq(other.raw())
    }
}

impl Eq for DerivationRule<'_> {}

impl Hash for DerivationRule<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.components.len().hash(state);
        for component in self.raw() {
            component.hash(state);
        }
    }
}

impl PartialOrd for DerivationRule<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// # Panics
///
/// Panics when the rules belong to different frameworks; use
/// [`DerivationRule::try_cmp`] when that can happen.
impl Ord for DerivationRule<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.try_cmp(other) {
            Ok(ordering) => ordering,
            Err(error) => panic!("{error}"),
        }
    }
}

impl<'r, 'a> IntoIterator for &'r DerivationRule<'a> {
    type Item = &'r DerivationRuleComponent<'a>;
    type IntoIter = std::slice::Iter<'r, DerivationRuleComponent<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.components.iter()
    }
}

impl fmt::Display for DerivationRule<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(&TextFormat::default(), None))
    }
}

impl fmt::Debug for DerivationRule<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(
                self.components
                    .iter()
                    .map(|c| (c.dimension.name(), c.exponent)),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(pairs: &[(usize, i32)]) -> Vec<RawComponent> {
        pairs.iter().map(|&(d, e)| RawComponent::new(d, e)).collect()
    }

    #[test]
    fn componentwise_order_uses_exponent_first() {
        let a = raw(&[(1, -1)]);
        let b = raw(&[(0, 1)]);
        assert_eq!(compare_raw(&a, &b), Ordering::Less);
        let c = raw(&[(0, 2)]);
        let d = raw(&[(1, 2)]);
        assert_eq!(compare_raw(&c, &d), Ordering::Less);
    }

    #[test]
    fn prefix_order_depends_on_next_exponent() {
        let short = raw(&[(0, 1)]);
        assert_eq!(compare_raw(&short, &raw(&[(0, 1), (1, 2)])), Ordering::Less);
        assert_eq!(
            compare_raw(&short, &raw(&[(0, 1), (1, -2)])),
            Ordering::Greater
        );
        assert_eq!(
            compare_raw(&short, &raw(&[(0, 1), (1, 0)])),
            Ordering::Greater
        );
        assert_eq!(
            compare_raw(&raw(&[(0, 1), (1, 0)]), &short),
            Ordering::Less
        );
        assert_eq!(compare_raw(&short, &short), Ordering::Equal);
        assert_eq!(compare_raw(&[], &[]), Ordering::Equal);
    }
}
