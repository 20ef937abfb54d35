use std::collections::HashMap;

use super::dimension::DimensionHandle;
use super::BuilderId;
use crate::dimension::RawComponent;
use crate::error::{MeasureError, Result};

/// What a rule term points at before the framework is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TermTarget {
    Handle(DimensionHandle),
    Name(String),
}

impl TermTarget {
    fn name(&self) -> &str {
        match self {
            TermTarget::Handle(handle) => handle.name(),
            TermTarget::Name(name) => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RuleTerm {
    pub(crate) target: TermTarget,
    pub(crate) exponent: i32,
}

/// Collects `dimension^exponent` terms in the order they are written.
///
/// ```
/// # use measure_model::{DerivationRuleBuilder, MeasurementFramework};
/// let mut framework = MeasurementFramework::builder("Kinematics")?;
/// let length = framework.dimension("Length")?.handle();
/// let time = framework.dimension("Time")?.handle();
/// framework
///     .dimension("Acceleration")?
///     .with_rule(DerivationRuleBuilder::new().by(&length).per_power(&time, 2))?;
/// # Ok::<(), measure_model::MeasureError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DerivationRuleBuilder {
    terms: Vec<RuleTerm>,
}

impl DerivationRuleBuilder {
    /// An empty builder; left empty it declares the dimensionless rule.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn by(self, dimension: &DimensionHandle) -> Self {
        self.by_power(dimension, 1)
    }

    pub fn by_power(mut self, dimension: &DimensionHandle, exponent: i32) -> Self {
        self.terms.push(RuleTerm {
            target: TermTarget::Handle(dimension.clone()),
            exponent,
        });
        self
    }

    pub fn per(self, dimension: &DimensionHandle) -> Self {
        self.by_power(dimension, -1)
    }

    pub fn per_power(self, dimension: &DimensionHandle, exponent: i32) -> Self {
        self.by_power(dimension, -exponent)
    }

    /// Reference a dimension by name; it is resolved when the framework is built.
    pub fn by_name(mut self, name: impl Into<String>, exponent: i32) -> Self {
        self.terms.push(RuleTerm {
            target: TermTarget::Name(name.into()),
            exponent,
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Handles must have been issued by the builder identified by `owner`.
    pub(crate) fn check_owner(&self, owner: BuilderId) -> Result<()> {
        for term in &self.terms {
            if let TermTarget::Handle(handle) = &term.target
                && handle.builder() != owner
            {
                return Err(MeasureError::ForeignBuilder {
                    dimension: handle.name().to_string(),
                });
            }
        }
        Ok(())
    }

    pub(crate) fn resolve(
        &self,
        ranks: &HashMap<String, usize>,
        dimension: &str,
    ) -> Result<Vec<RawComponent>> {
        self.terms
            .iter()
            .map(|term| {
                let name = term.target.name();
                ranks
                    .get(name)
                    .map(|&rank| RawComponent::new(rank, term.exponent))
                    .ok_or_else(|| MeasureError::UnresolvedDimension {
                        dimension: dimension.to_string(),
                        reference: name.to_string(),
                    })
            })
            .collect()
    }
}
