use std::fmt;

use super::framework::MeasurementFrameworkBuilder;
use super::locale::{ItemDeclaration, LocaleBuilder};
use super::rule::DerivationRuleBuilder;
use super::BuilderId;
use crate::error::{MeasureError, Result};

/// Reference to a declared dimension, used to write rules before the
/// framework exists. Only valid with the builder that issued it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DimensionHandle {
    builder: BuilderId,
    name: String,
}

impl DimensionHandle {
    pub(crate) fn new(builder: BuilderId, name: impl Into<String>) -> Self {
        Self {
            builder,
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn builder(&self) -> BuilderId {
        self.builder
    }
}

impl fmt::Display for DimensionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Everything declared about one dimension.
#[derive(Debug, Clone)]
pub(crate) struct DimensionSpec {
    pub(crate) item: ItemDeclaration,
    pub(crate) identifier: Option<u32>,
    pub(crate) minimal: bool,
    pub(crate) rules: Vec<DerivationRuleBuilder>,
}

impl DimensionSpec {
    pub(crate) fn new(item: ItemDeclaration) -> Self {
        Self {
            item,
            identifier: None,
            minimal: false,
            rules: Vec::new(),
        }
    }
}

impl fmt::Display for DimensionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Dimension: {}", self.item.name)?;
        if let Some(identifier) = self.identifier {
            write!(f, " [{identifier}]")?;
        }
        Ok(())
    }
}

/// Declares one dimension of a [`MeasurementFrameworkBuilder`].
///
/// Every method consumes and returns the builder so calls chain; a rejected
/// declaration leaves the dimension as it was before the call.
pub struct DimensionBuilder<'b> {
    framework: &'b mut MeasurementFrameworkBuilder,
    index: usize,
}

impl<'b> DimensionBuilder<'b> {
    pub(crate) fn new(framework: &'b mut MeasurementFrameworkBuilder, index: usize) -> Self {
        Self { framework, index }
    }

    fn spec(&self) -> &DimensionSpec {
        &self.framework.specs()[self.index]
    }

    fn spec_mut(&mut self) -> &mut DimensionSpec {
        &mut self.framework.specs_mut()[self.index]
    }

    pub fn name(&self) -> &str {
        &self.spec().item.name
    }

    pub fn handle(&self) -> DimensionHandle {
        DimensionHandle::new(self.framework.id(), self.name())
    }

    /// Fix the identifier instead of letting the build assign one.
    pub fn with_identifier(mut self, identifier: u32) -> Result<Self> {
        if self.spec().identifier.is_some() {
            return Err(MeasureError::IdentifierAlreadySet {
                item: self.spec().to_string(),
                identifier,
            });
        }
        if let Some(owner) = self.framework.identifier_owner(identifier) {
            return Err(MeasureError::IdentifierInUse {
                identifier,
                owner: owner.to_string(),
            });
        }
        self.spec_mut().identifier = Some(identifier);
        Ok(self)
    }

    pub fn with_locale(self, locale: LocaleBuilder) -> Result<Self> {
        self.add_locale(locale, false)
    }

    /// Declare a locale and make it the dimension's default.
    pub fn with_default_locale(self, locale: LocaleBuilder) -> Result<Self> {
        self.add_locale(locale, true)
    }

    fn add_locale(mut self, locale: LocaleBuilder, is_default: bool) -> Result<Self> {
        let describe = self.spec().to_string();
        self.spec_mut()
            .item
            .add_locale(locale, is_default, &describe)?;
        Ok(self)
    }

    /// Keep this dimension out of further reduction even though it has rules.
    pub fn minimal(mut self) -> Self {
        self.spec_mut().minimal = true;
        self
    }

    /// Add a derivation rule. Every referenced handle must come from the
    /// same framework builder.
    pub fn with_rule(mut self, rule: DerivationRuleBuilder) -> Result<Self> {
        rule.check_owner(self.framework.id())?;
        self.spec_mut().rules.push(rule);
        Ok(self)
    }

    /// Add the dimensionless rule.
    pub fn with_empty_rule(mut self) -> Self {
        self.spec_mut().rules.push(DerivationRuleBuilder::new());
        self
    }
}

impl fmt::Display for DimensionBuilder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.spec(), f)
    }
}

impl fmt::Debug for DimensionBuilder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DimensionBuilder").field(self.spec()).finish()
    }
}
