//! Physical dimensions, derivation-rule algebra and measurement frameworks.
//!
//! A [`MeasurementFramework`] is declared through a
//! [`MeasurementFrameworkBuilder`] (or a serde [`FrameworkDeclaration`]) and
//! is immutable once built. Its dimensions can be:
//!
//! - **Looked up** by name, identifier or localized symbol
//! - **Combined** into [`DerivationRule`]s with `power`, `multiply` and `divide`
//! - **Reduced** to normalized, minimal and basic canonical forms
//! - **Grouped** by any of those forms through the framework's rule indices
//! - **Rendered** with the [`TextFormat`] mini-language

mod builder;
pub mod compare;
mod declaration;
mod dimension;
pub mod error;
mod framework;
mod index;
mod kind;
pub mod locale;
mod localizable;
mod rule;
pub mod text;

pub use builder::{
    DerivationRuleBuilder, DimensionBuilder, DimensionHandle, LocaleBuilder,
    MeasurementFrameworkBuilder,
};
pub use compare::{
    BasicRuleComparer, CanonicalForm, Comparer, ExactRuleComparer, Keyed, MinimalRuleComparer,
    NormalizedRuleComparer,
};
pub use declaration::{
    DimensionDeclaration, FrameworkDeclaration, LocaleDeclaration, RuleDeclaration, RuleTerm,
};
pub use dimension::Dimension;
pub use error::{ErrorCategory, MeasureError, Result, SymbolCollision};
pub use framework::{IndexedForm, MeasurementFramework};
pub use kind::DerivationRuleKind;
pub use locale::Locale;
pub use localizable::{LocalizableItem, TextField};
pub use rule::{DerivationRule, DerivationRuleComponent, DimensionRule};
pub use text::{BracketFormat, CasingFormat, ContentFormat, TextFormat};
