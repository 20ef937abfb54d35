//! Error types for framework construction, queries and rule algebra.

use std::fmt;

use thiserror::Error;

/// Broad classification of a [`MeasureError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorCategory {
    /// Malformed declarative input.
    Configuration,
    /// A derivation rule references a dimension that does not exist.
    Resolution,
    /// Declarations that are individually valid but contradict each other.
    Consistency,
    /// A lookup that found nothing.
    Query,
    /// A format specifier or textual dimension that cannot be interpreted.
    Format,
    /// Comparison or combination of objects that cannot be related.
    Comparison,
}

/// One `(locale, symbol)` pair claimed by more than one dimension.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SymbolCollision {
    pub locale: String,
    pub symbol: String,
    /// Names of every dimension using the symbol, in declaration order.
    pub dimensions: Vec<String>,
}

impl fmt::Display for SymbolCollision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} -> {}",
            self.locale,
            self.symbol,
            self.dimensions.join(", ")
        )
    }
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MeasureError {
    #[error("name '{name}' is not a valid identifier")]
    InvalidName { name: String },

    #[error("symbol '{symbol}' may only contain letters, marks, symbols and numbers")]
    InvalidSymbol { symbol: String },

    #[error("a dimension named '{name}' already exists")]
    DuplicateName { name: String },

    #[error("identifier of {item} cannot be set twice (attempted {identifier})")]
    IdentifierAlreadySet { item: String, identifier: u32 },

    #[error("identifier {identifier} is already used by {owner}")]
    IdentifierInUse { identifier: u32, owner: String },

    #[error("locale '{locale}' is already declared on {item}")]
    DuplicateLocale { item: String, locale: String },

    #[error("{item} already has default locale '{existing}', cannot make '{locale}' default")]
    DuplicateDefaultLocale {
        item: String,
        locale: String,
        existing: String,
    },

    #[error("dimension '{dimension}' is declared minimal but has no derivation rule")]
    MinimalWithoutRule { dimension: String },

    #[error("dimension '{dimension}' belongs to a different framework builder")]
    ForeignBuilder { dimension: String },

    #[error("dimension handle '{dimension}' is not declared in this builder")]
    UnknownHandle { dimension: String },

    #[error("cannot find dimension '{reference}' referenced by a rule of '{dimension}'")]
    UnresolvedDimension { dimension: String, reference: String },

    #[error("inconsistent rules found in dimension {dimension}: {first} and {second}")]
    InconsistentRules {
        dimension: String,
        first: String,
        second: String,
    },

    #[error("duplicate symbols found: {}", format_collisions(.collisions))]
    DuplicateSymbols { collisions: Vec<SymbolCollision> },

    #[error("circular derivation between dimensions: {}", .dimensions.join(" -> "))]
    CircularDerivation { dimensions: Vec<String> },

    #[error("exponent of dimension '{dimension}' overflows i32")]
    ExponentOverflow { dimension: String },

    #[error("element name {name} not found")]
    DimensionNameNotFound { name: String },

    #[error("element identifier {identifier} not found")]
    DimensionIdentifierNotFound { identifier: u32 },

    #[error("element symbol {symbol} not found for locale '{locale}'")]
    DimensionSymbolNotFound { symbol: String, locale: String },

    #[error("invalid format specifier '{spec}'")]
    InvalidFormatSpecifier { spec: String },

    #[error("there is no dimension which can be parsed from '{text}'")]
    UnparsableDimension { text: String },

    #[error("cannot relate objects that belong to different measurement frameworks")]
    ForeignFramework,

    #[error("cannot order a value against a missing {side} operand")]
    MissingOperand { side: &'static str },
}

impl MeasureError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            MeasureError::InvalidName { .. }
            | MeasureError::InvalidSymbol { .. }
            | MeasureError::DuplicateName { .. }
            | MeasureError::IdentifierAlreadySet { .. }
            | MeasureError::IdentifierInUse { .. }
            | MeasureError::DuplicateLocale { .. }
            | MeasureError::DuplicateDefaultLocale { .. }
            | MeasureError::MinimalWithoutRule { .. }
            | MeasureError::ForeignBuilder { .. }
            | MeasureError::UnknownHandle { .. } => ErrorCategory::Configuration,
            MeasureError::UnresolvedDimension { .. } => ErrorCategory::Resolution,
            MeasureError::InconsistentRules { .. }
            | MeasureError::DuplicateSymbols { .. }
            | MeasureError::CircularDerivation { .. }
            | MeasureError::ExponentOverflow { .. } => ErrorCategory::Consistency,
            MeasureError::DimensionNameNotFound { .. }
            | MeasureError::DimensionIdentifierNotFound { .. }
            | MeasureError::DimensionSymbolNotFound { .. } => ErrorCategory::Query,
            MeasureError::InvalidFormatSpecifier { .. }
            | MeasureError::UnparsableDimension { .. } => ErrorCategory::Format,
            MeasureError::ForeignFramework | MeasureError::MissingOperand { .. } => {
                ErrorCategory::Comparison
            }
        }
    }
}

fn format_collisions(collisions: &[SymbolCollision]) -> String {
    match collisions {
        [single] => single.to_string(),
        _ => {
            let mut out = String::new();
            for collision in collisions {
                out.push_str("\n\t");
                out.push_str(&collision.to_string());
            }
            out
        }
    }
}

pub type Result<T> = std::result::Result<T, MeasureError>;
