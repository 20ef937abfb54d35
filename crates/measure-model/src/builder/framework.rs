use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use super::dimension::{DimensionBuilder, DimensionHandle, DimensionSpec};
use super::locale::{ItemDeclaration, LocaleBuilder};
use super::BuilderId;
use crate::dimension::{Dimension, DimensionEntry, DimensionTable, ReductionForm};
use crate::error::{MeasureError, Result, SymbolCollision};
use crate::framework::{FrameworkIndices, MeasurementFramework};
use crate::index::RuleIndex;
use crate::kind::DerivationRuleKind;
use crate::locale::Locale;
use crate::localizable::TextField;
use crate::rule::{DerivationRule, DimensionRule};

/// Declares the dimensions of a framework, then builds it.
///
/// ```
/// # use measure_model::{DerivationRuleBuilder, DimensionRule, LocaleBuilder, MeasurementFramework};
/// let mut builder = MeasurementFramework::builder("Kinematics")?;
/// let length = builder
///     .dimension("Length")?
///     .with_locale(LocaleBuilder::root().symbol("m")?)?
///     .handle();
/// let time = builder
///     .dimension("Time")?
///     .with_locale(LocaleBuilder::root().symbol("s")?)?
///     .handle();
/// builder
///     .dimension("Speed")?
///     .with_rule(DerivationRuleBuilder::new().by(&length).per(&time))?;
///
/// let framework = builder.build()?;
/// let speed = framework.dimension_by_name("Speed")?;
/// assert_eq!(speed.derivation_rules()[0].to_string(), "m / s");
/// assert!(speed.is_normalized());
/// # Ok::<(), measure_model::MeasureError>(())
/// ```
#[derive(Debug, Clone)]
pub struct MeasurementFrameworkBuilder {
    id: BuilderId,
    item: ItemDeclaration,
    specs: Vec<DimensionSpec>,
    ranks: HashMap<String, usize>,
}

impl MeasurementFrameworkBuilder {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        Ok(Self {
            id: BuilderId::next(),
            item: ItemDeclaration::new(name)?,
            specs: Vec::new(),
            ranks: HashMap::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.item.name
    }

    /// Number of declared dimensions.
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn with_locale(&mut self, locale: LocaleBuilder) -> Result<&mut Self> {
        let describe = self.to_string();
        self.item.add_locale(locale, false, &describe)?;
        Ok(self)
    }

    pub fn with_default_locale(&mut self, locale: LocaleBuilder) -> Result<&mut Self> {
        let describe = self.to_string();
        self.item.add_locale(locale, true, &describe)?;
        Ok(self)
    }

    /// Declare a new dimension. Names must be unique within the framework.
    pub fn dimension(&mut self, name: impl Into<String>) -> Result<DimensionBuilder<'_>> {
        let item = ItemDeclaration::new(name)?;
        if self.ranks.contains_key(&item.name) {
            return Err(MeasureError::DuplicateName { name: item.name });
        }
        let index = self.specs.len();
        self.ranks.insert(item.name.clone(), index);
        self.specs.push(DimensionSpec::new(item));
        Ok(DimensionBuilder::new(self, index))
    }

    /// Reopen a dimension declared earlier.
    pub fn dimension_mut(&mut self, handle: &DimensionHandle) -> Result<DimensionBuilder<'_>> {
        if handle.builder() != self.id {
            return Err(MeasureError::ForeignBuilder {
                dimension: handle.name().to_string(),
            });
        }
        let index = *self
            .ranks
            .get(handle.name())
            .ok_or_else(|| MeasureError::UnknownHandle {
                dimension: handle.name().to_string(),
            })?;
        Ok(DimensionBuilder::new(self, index))
    }

    pub fn handle(&self, name: &str) -> Option<DimensionHandle> {
        self.ranks
            .contains_key(name)
            .then(|| DimensionHandle::new(self.id, name))
    }

    pub(crate) fn id(&self) -> BuilderId {
        self.id
    }

    pub(crate) fn specs(&self) -> &[DimensionSpec] {
        &self.specs
    }

    pub(crate) fn specs_mut(&mut self) -> &mut [DimensionSpec] {
        &mut self.specs
    }

    pub(crate) fn identifier_owner(&self, identifier: u32) -> Option<&DimensionSpec> {
        self.specs
            .iter()
            .find(|spec| spec.identifier == Some(identifier))
    }

    /// Resolve, validate and index every declaration.
    ///
    /// Stops at the first invalid dimension in declaration order, except for
    /// symbol collisions, which are all reported together.
    pub fn build(&self) -> Result<MeasurementFramework> {
        let span = tracing::info_span!("build_framework", framework = %self.item.name);
        let _guard = span.enter();

        let mut entries = self.create_entries()?;
        tracing::debug!(dimensions = entries.len(), "assigned identifiers and ranks");

        let mut rule_count = 0;
        for (entry, spec) in entries.iter_mut().zip(&self.specs) {
            entry.rules = spec
                .rules
                .iter()
                .map(|rule| rule.resolve(&self.ranks, &spec.item.name))
                .collect::<Result<_>>()?;
            rule_count += entry.rules.len();
        }
        tracing::debug!(rules = rule_count, "resolved derivation rules");

        check_acyclic(&entries)?;
        let table = DimensionTable::new(entries);
        check_reductions(&table)?;
        check_rule_consistency(&table)?;

        let by_symbol = index_symbols(&table)?;
        tracing::debug!(locales = by_symbol.len(), "indexed symbols");

        let indices = {
            let pairs = rule_pairs(&table);
            FrameworkIndices {
                by_name: self.ranks.clone(),
                by_identifier: table
                    .entries()
                    .iter()
                    .enumerate()
                    .map(|(index, entry)| (entry.identifier, index))
                    .collect(),
                by_symbol,
                exact: RuleIndex::build(pairs.iter().cloned()),
                normalized: RuleIndex::build(pairs.iter().cloned()),
                minimal: RuleIndex::build(pairs.iter().cloned()),
                basic: RuleIndex::build(pairs),
            }
        };
        tracing::debug!(
            exact = indices.exact.len(),
            normalized = indices.normalized.len(),
            minimal = indices.minimal.len(),
            basic = indices.basic.len(),
            "indexed derivation rules"
        );

        tracing::info!(
            dimensions = table.len(),
            minimal_groups = indices.minimal.len(),
            "Built measurement framework"
        );
        Ok(MeasurementFramework::from_parts(
            self.item.to_item(),
            table,
            indices,
        ))
    }

    fn create_entries(&self) -> Result<Vec<DimensionEntry>> {
        let mut used: HashSet<u32> = self.specs.iter().filter_map(|s| s.identifier).collect();
        let mut next_id = 0u32;
        let mut entries = Vec::with_capacity(self.specs.len());

        for spec in &self.specs {
            let kind = match (spec.minimal, spec.rules.is_empty()) {
                (true, true) => {
                    return Err(MeasureError::MinimalWithoutRule {
                        dimension: spec.item.name.clone(),
                    });
                }
                (false, true) => DerivationRuleKind::Basic,
                (true, false) => DerivationRuleKind::Minimal,
                (false, false) => DerivationRuleKind::Normalized,
            };
            let identifier = match spec.identifier {
                Some(identifier) => identifier,
                None => {
                    while used.contains(&next_id) {
                        next_id += 1;
                    }
                    used.insert(next_id);
                    tracing::trace!(
                        dimension = %spec.item.name,
                        identifier = next_id,
                        "assigned identifier"
                    );
                    next_id
                }
            };
            entries.push(DimensionEntry::new(spec.item.to_item(), identifier, kind));
        }
        Ok(entries)
    }
}

impl fmt::Display for MeasurementFrameworkBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MeasurementFramework: {}", self.item.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnPath,
    Done,
}

/// Reductions follow the first rule of every dimension, so those rules must
/// never lead back to the dimension they derive.
fn check_acyclic(entries: &[DimensionEntry]) -> Result<()> {
    let mut marks = vec![Mark::Unvisited; entries.len()];
    let mut path = Vec::new();
    for start in 0..entries.len() {
        visit(start, entries, &mut marks, &mut path)?;
    }
    Ok(())
}

fn visit(
    index: usize,
    entries: &[DimensionEntry],
    marks: &mut [Mark],
    path: &mut Vec<usize>,
) -> Result<()> {
    match marks[index] {
        Mark::Done => return Ok(()),
        Mark::OnPath => {
            let start = path.iter().position(|&i| i == index).unwrap_or(0);
            let dimensions = path[start..]
                .iter()
                .chain(std::iter::once(&index))
                .map(|&i| entries[i].item.name().to_string())
                .collect();
            return Err(MeasureError::CircularDerivation { dimensions });
        }
        Mark::Unvisited => {}
    }

    marks[index] = Mark::OnPath;
    path.push(index);
    for component in entries[index].rules.first().into_iter().flatten() {
        visit(component.dimension, entries, marks, path)?;
    }
    path.pop();
    marks[index] = Mark::Done;
    Ok(())
}

/// Minimal and basic reductions of every dimension and every declared rule
/// must keep their exponents within `i32`.
fn check_reductions(table: &DimensionTable) -> Result<()> {
    for (index, entry) in table.entries().iter().enumerate() {
        for form in [ReductionForm::Minimal, ReductionForm::Basic] {
            table.try_canonical(index, form)?;
            for rule in &entry.rules {
                table
                    .reduce(rule.iter().copied(), form)
                    .map_err(|_| table.overflow(index))?;
            }
        }
    }
    Ok(())
}

/// Every rule of a dimension must reduce to the same minimal rule.
fn check_rule_consistency(table: &DimensionTable) -> Result<()> {
    for index in 0..table.len() {
        let dimension = table.dimension(index);
        let rules = dimension.derivation_rules();
        let Some((first, others)) = rules.split_first() else {
            continue;
        };
        for other in others {
            if other.minimal_rule() != first.minimal_rule() {
                return Err(MeasureError::InconsistentRules {
                    dimension: dimension.name().to_string(),
                    first: first.to_string(),
                    second: other.to_string(),
                });
            }
            if other == first {
                tracing::warn!(
                    dimension = dimension.name(),
                    rule = %other,
                    "Derivation rule repeats the first rule of the dimension"
                );
            }
        }
    }
    Ok(())
}

fn index_symbols(table: &DimensionTable) -> Result<HashMap<Locale, HashMap<String, usize>>> {
    let mut claims: BTreeMap<(Locale, String), Vec<usize>> = BTreeMap::new();
    for (index, entry) in table.entries().iter().enumerate() {
        for locale in entry.item.locales() {
            if let Some(symbol) = entry.item.declared(TextField::Symbol, locale) {
                claims
                    .entry((locale.clone(), symbol.to_string()))
                    .or_default()
                    .push(index);
            }
        }
    }

    let collisions: Vec<SymbolCollision> = claims
        .iter()
        .filter(|(_, owners)| owners.len() > 1)
        .map(|((locale, symbol), owners)| SymbolCollision {
            locale: locale.to_string(),
            symbol: symbol.clone(),
            dimensions: owners
                .iter()
                .map(|&i| table.entry(i).item.name().to_string())
                .collect(),
        })
        .collect();
    if !collisions.is_empty() {
        return Err(MeasureError::DuplicateSymbols { collisions });
    }

    let mut by_symbol: HashMap<Locale, HashMap<String, usize>> = HashMap::new();
    for ((locale, symbol), owners) in claims {
        if let Some(&owner) = owners.first() {
            by_symbol.entry(locale).or_default().insert(symbol, owner);
        }
    }
    Ok(by_symbol)
}

/// Each dimension paired with its own rule and with each declared rule.
fn rule_pairs(table: &DimensionTable) -> Vec<(Dimension<'_>, DerivationRule<'_>)> {
    (0..table.len())
        .map(|index| table.dimension(index))
        .flat_map(|dimension| {
            std::iter::once(dimension.power(1))
                .chain(dimension.derivation_rules())
                .map(move |rule| (dimension, rule))
        })
        .collect()
}
