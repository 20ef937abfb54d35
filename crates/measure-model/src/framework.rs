//! The immutable, fully resolved collection of dimensions.

use std::collections::HashMap;
use std::fmt;

use crate::builder::MeasurementFrameworkBuilder;
use crate::compare::{
    BasicRuleComparer, CanonicalForm, ExactRuleComparer, MinimalRuleComparer,
    NormalizedRuleComparer,
};
use crate::declaration::FrameworkDeclaration;
use crate::dimension::{Dimension, DimensionTable, RawComponent};
use crate::error::{MeasureError, Result};
use crate::index::RuleIndex;
use crate::locale::Locale;
use crate::localizable::LocalizableItem;
use crate::rule::{DerivationRule, DimensionRule};
use crate::text::TextFormat;

/// Lookup tables computed once by the builder.
#[derive(Debug)]
pub(crate) struct FrameworkIndices {
    pub(crate) by_name: HashMap<String, usize>,
    pub(crate) by_identifier: HashMap<u32, usize>,
    pub(crate) by_symbol: HashMap<Locale, HashMap<String, usize>>,
    pub(crate) exact: RuleIndex<ExactRuleComparer>,
    pub(crate) normalized: RuleIndex<NormalizedRuleComparer>,
    pub(crate) minimal: RuleIndex<MinimalRuleComparer>,
    pub(crate) basic: RuleIndex<BasicRuleComparer>,
}

/// Canonical forms the framework keeps an index for.
pub trait IndexedForm: CanonicalForm {
    #[doc(hidden)]
    fn index(framework: &MeasurementFramework) -> &RuleIndex<Self>;
}

impl IndexedForm for ExactRuleComparer {
    fn index(framework: &MeasurementFramework) -> &RuleIndex<Self> {
        &framework.indices.exact
    }
}

impl IndexedForm for NormalizedRuleComparer {
    fn index(framework: &MeasurementFramework) -> &RuleIndex<Self> {
        &framework.indices.normalized
    }
}

impl IndexedForm for MinimalRuleComparer {
    fn index(framework: &MeasurementFramework) -> &RuleIndex<Self> {
        &framework.indices.minimal
    }
}

impl IndexedForm for BasicRuleComparer {
    fn index(framework: &MeasurementFramework) -> &RuleIndex<Self> {
        &framework.indices.basic
    }
}

/// A built framework. Dimensions, rules and indices never change after
/// construction, so a framework can be shared freely between threads.
#[derive(Debug)]
pub struct MeasurementFramework {
    item: LocalizableItem,
    table: DimensionTable,
    indices: FrameworkIndices,
}

impl MeasurementFramework {
    pub(crate) fn from_parts(
        item: LocalizableItem,
        table: DimensionTable,
        indices: FrameworkIndices,
    ) -> Self {
        Self {
            item,
            table,
            indices,
        }
    }

    /// Start declaring a framework named `name`.
    pub fn builder(name: impl Into<String>) -> Result<MeasurementFrameworkBuilder> {
        MeasurementFrameworkBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        self.item.name()
    }

    pub fn item(&self) -> &LocalizableItem {
        &self.item
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.len() == 0
    }

    /// All dimensions in declaration order.
    pub fn dimensions(&self) -> impl ExactSizeIterator<Item = Dimension<'_>> + '_ {
        (0..self.table.len()).map(|index| self.table.dimension(index))
    }

    /// The dimension with the given rank.
    pub fn dimension_at(&self, order: usize) -> Option<Dimension<'_>> {
        (order < self.table.len()).then(|| self.table.dimension(order))
    }

    /// True when `dimension` was produced by this framework.
    pub fn contains(&self, dimension: &Dimension<'_>) -> bool {
        std::ptr::eq(dimension.table(), &self.table)
    }

    pub fn get_dimension_by_name(&self, name: &str) -> Option<Dimension<'_>> {
        self.indices
            .by_name
            .get(name)
            .map(|&index| self.table.dimension(index))
    }

    pub fn dimension_by_name(&self, name: &str) -> Result<Dimension<'_>> {
        self.get_dimension_by_name(name)
            .ok_or_else(|| MeasureError::DimensionNameNotFound {
                name: name.to_string(),
            })
    }

    pub fn get_dimension_by_identifier(&self, identifier: u32) -> Option<Dimension<'_>> {
        self.indices
            .by_identifier
            .get(&identifier)
            .map(|&index| self.table.dimension(index))
    }

    pub fn dimension_by_identifier(&self, identifier: u32) -> Result<Dimension<'_>> {
        self.get_dimension_by_identifier(identifier)
            .ok_or(MeasureError::DimensionIdentifierNotFound { identifier })
    }

    /// Find a dimension by symbol, walking the fallback chain of `locale`
    /// (the framework's effective locale when `None`) down to root.
    pub fn get_dimension_by_symbol(
        &self,
        symbol: &str,
        locale: Option<&Locale>,
    ) -> Option<Dimension<'_>> {
        let locale = self.lookup_locale(locale);
        locale.fallback_chain().find_map(|candidate| {
            self.indices
                .by_symbol
                .get(&candidate)
                .and_then(|symbols| symbols.get(symbol))
                .map(|&index| self.table.dimension(index))
        })
    }

    pub fn dimension_by_symbol(
        &self,
        symbol: &str,
        locale: Option<&Locale>,
    ) -> Result<Dimension<'_>> {
        self.get_dimension_by_symbol(symbol, locale)
            .ok_or_else(|| MeasureError::DimensionSymbolNotFound {
                symbol: symbol.to_string(),
                locale: self.lookup_locale(locale).to_string(),
            })
    }

    /// Interpret `text` as a symbol first, then as a name.
    pub fn try_parse_dimension(
        &self,
        text: &str,
        locale: Option<&Locale>,
    ) -> Option<Dimension<'_>> {
        let text = text.trim();
        self.get_dimension_by_symbol(text, locale)
            .or_else(|| self.get_dimension_by_name(text))
    }

    pub fn parse_dimension(&self, text: &str, locale: Option<&Locale>) -> Result<Dimension<'_>> {
        self.try_parse_dimension(text, locale)
            .ok_or_else(|| MeasureError::UnparsableDimension {
                text: text.to_string(),
            })
    }

    /// The dimensionless rule of this framework.
    pub fn unit_rule(&self) -> DerivationRule<'_> {
        DerivationRule::from_raw(&self.table, &[])
    }

    /// Assemble a rule from `(dimension, exponent)` pairs of this framework.
    pub fn rule<'a>(
        &'a self,
        components: impl IntoIterator<Item = (Dimension<'a>, i32)>,
    ) -> Result<DerivationRule<'a>> {
        let raw = components
            .into_iter()
            .map(|(dimension, exponent)| {
                if self.contains(&dimension) {
                    Ok(RawComponent::new(dimension.order(), exponent))
                } else {
                    Err(MeasureError::ForeignFramework)
                }
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(DerivationRule::from_raw(&self.table, &raw))
    }

    /// Dimensions whose own rule, or one of whose declared rules, has the
    /// same `F` form as `rule`. Ordered by rank, without duplicates.
    pub fn dimensions_by_rule<'a, F, R>(&'a self, rule: &R) -> Result<Vec<Dimension<'a>>>
    where
        F: IndexedForm,
        R: DimensionRule<'a> + ?Sized,
    {
        if !std::ptr::eq(rule.exact_rule().table(), &self.table) {
            return Err(MeasureError::ForeignFramework);
        }
        Ok(F::index(self)
            .lookup(rule)
            .iter()
            .map(|&index| self.table.dimension(index))
            .collect())
    }

    pub fn dimensions_by_exact_rule<'a, R>(&'a self, rule: &R) -> Result<Vec<Dimension<'a>>>
    where
        R: DimensionRule<'a> + ?Sized,
    {
        self.dimensions_by_rule::<ExactRuleComparer, R>(rule)
    }

    pub fn dimensions_by_normalized_rule<'a, R>(&'a self, rule: &R) -> Result<Vec<Dimension<'a>>>
    where
        R: DimensionRule<'a> + ?Sized,
    {
        self.dimensions_by_rule::<NormalizedRuleComparer, R>(rule)
    }

    pub fn dimensions_by_minimal_rule<'a, R>(&'a self, rule: &R) -> Result<Vec<Dimension<'a>>>
    where
        R: DimensionRule<'a> + ?Sized,
    {
        self.dimensions_by_rule::<MinimalRuleComparer, R>(rule)
    }

    pub fn dimensions_by_basic_rule<'a, R>(&'a self, rule: &R) -> Result<Vec<Dimension<'a>>>
    where
        R: DimensionRule<'a> + ?Sized,
    {
        self.dimensions_by_rule::<BasicRuleComparer, R>(rule)
    }

    /// Flat description of this framework that rebuilds an equivalent one.
    pub fn to_declaration(&self) -> FrameworkDeclaration {
        FrameworkDeclaration::from_framework(self)
    }

    pub fn format(&self, format: &TextFormat, locale: Option<&Locale>) -> String {
        self.item.format(format, locale)
    }

    fn lookup_locale(&self, locale: Option<&Locale>) -> Locale {
        locale
            .cloned()
            .unwrap_or_else(|| self.item.effective_locale())
    }
}

impl fmt::Display for MeasurementFramework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(&TextFormat::default(), None))
    }
}
