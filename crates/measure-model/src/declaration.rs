//! Flat, serializable description of a framework.
//!
//! Rules refer to dimensions by name, so a declaration can be written by
//! hand (or loaded from JSON, TOML, ...) in any order and turned into a
//! framework with [`FrameworkDeclaration::build`].

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::builder::{DerivationRuleBuilder, LocaleBuilder, MeasurementFrameworkBuilder};
use crate::error::Result;
use crate::framework::MeasurementFramework;
use crate::kind::DerivationRuleKind;
use crate::locale::Locale;
use crate::localizable::{LocalizableItem, TextField};
use crate::rule::DimensionRule;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameworkDeclaration {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locales: Vec<LocaleDeclaration>,
    #[serde(default)]
    pub dimensions: Vec<DimensionDeclaration>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionDeclaration {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locales: Vec<LocaleDeclaration>,
    /// Keep the dimension minimal although it has rules.
    #[serde(default, skip_serializing_if = "is_false")]
    pub minimal: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<RuleDeclaration>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleDeclaration {
    /// Locale tag; empty for the root locale.
    #[serde(default)]
    pub locale: Locale,
    #[serde(default, skip_serializing_if = "is_false")]
    pub default: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

/// A product of terms; an empty list is the dimensionless rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleDeclaration {
    pub terms: Vec<RuleTerm>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleTerm {
    pub dimension: String,
    #[serde(default = "default_exponent")]
    pub exponent: i32,
}

fn default_exponent() -> i32 {
    1
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl FrameworkDeclaration {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            locales: Vec::new(),
            dimensions: Vec::new(),
        }
    }

    pub(crate) fn from_framework(framework: &MeasurementFramework) -> Self {
        let dimensions = framework
            .dimensions()
            .map(|dimension| DimensionDeclaration {
                name: dimension.name().to_string(),
                identifier: Some(dimension.identifier()),
                locales: LocaleDeclaration::from_item(dimension.item()),
                minimal: dimension.kind() == DerivationRuleKind::Minimal,
                rules: dimension
                    .derivation_rules()
                    .iter()
                    .map(|rule| RuleDeclaration {
                        terms: rule
                            .iter()
                            .map(|component| RuleTerm {
                                dimension: component.dimension().name().to_string(),
                                exponent: component.exponent(),
                            })
                            .collect(),
                    })
                    .collect(),
            })
            .collect();
        Self {
            name: framework.name().to_string(),
            locales: LocaleDeclaration::from_item(framework.item()),
            dimensions,
        }
    }

    /// Build the framework, resolving rule terms by dimension name.
    pub fn build(&self) -> Result<MeasurementFramework> {
        let mut builder = MeasurementFrameworkBuilder::new(self.name.as_str())?;
        for locale in &self.locales {
            if locale.default {
                builder.with_default_locale(locale.to_builder()?)?;
            } else {
                builder.with_locale(locale.to_builder()?)?;
            }
        }

        for declaration in &self.dimensions {
            let mut dimension = builder.dimension(declaration.name.as_str())?;
            if let Some(identifier) = declaration.identifier {
                dimension = dimension.with_identifier(identifier)?;
            }
            for locale in &declaration.locales {
                dimension = if locale.default {
                    dimension.with_default_locale(locale.to_builder()?)?
                } else {
                    dimension.with_locale(locale.to_builder()?)?
                };
            }
            if declaration.minimal {
                dimension = dimension.minimal();
            }
            for rule in &declaration.rules {
                dimension = dimension.with_rule(rule.to_builder())?;
            }
        }

        builder.build()
    }
}

impl LocaleDeclaration {
    pub fn new(locale: impl Into<Locale>) -> Self {
        Self {
            locale: locale.into(),
            default: false,
            caption: None,
            symbol: None,
            description: None,
            reference: None,
        }
    }

    fn from_item(item: &LocalizableItem) -> Vec<Self> {
        let mut locales: BTreeSet<&Locale> = item.locales();
        locales.extend(item.default_locale());
        locales
            .into_iter()
            .map(|locale| {
                let text = |field| item.declared(field, locale).map(str::to_string);
                Self {
                    locale: locale.clone(),
                    default: item.default_locale() == Some(locale),
                    caption: text(TextField::Caption),
                    symbol: text(TextField::Symbol),
                    description: text(TextField::Description),
                    reference: text(TextField::Reference),
                }
            })
            .collect()
    }

    fn to_builder(&self) -> Result<LocaleBuilder> {
        let mut builder = LocaleBuilder::new(self.locale.clone());
        if let Some(symbol) = &self.symbol {
            builder = builder.symbol(symbol.as_str())?;
        }
        if let Some(caption) = &self.caption {
            builder = builder.caption(caption.as_str());
        }
        if let Some(description) = &self.description {
            builder = builder.description(description.as_str());
        }
        if let Some(reference) = &self.reference {
            builder = builder.reference(reference.as_str());
        }
        Ok(builder)
    }
}

impl RuleDeclaration {
    fn to_builder(&self) -> DerivationRuleBuilder {
        self.terms
            .iter()
            .fold(DerivationRuleBuilder::new(), |builder, term| {
                builder.by_name(term.dimension.as_str(), term.exponent)
            })
    }
}
