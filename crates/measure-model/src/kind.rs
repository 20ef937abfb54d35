use std::fmt;

use serde::{Deserialize, Serialize};

/// How fundamental a dimension or rule is.
///
/// The declaration order is the ordinal ranking `Basic < Minimal < Normalized < Exact`;
/// a kind "is minimal" when it ranks at or below [`DerivationRuleKind::Minimal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DerivationRuleKind {
    Basic,
    Minimal,
    Normalized,
    Exact,
}

impl DerivationRuleKind {
    pub fn is_base(self) -> bool {
        self == DerivationRuleKind::Basic
    }

    pub fn is_minimal(self) -> bool {
        self <= DerivationRuleKind::Minimal
    }

    pub fn is_normalized(self) -> bool {
        self <= DerivationRuleKind::Normalized
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DerivationRuleKind::Basic => "Basic",
            DerivationRuleKind::Minimal => "Minimal",
            DerivationRuleKind::Normalized => "Normalized",
            DerivationRuleKind::Exact => "Exact",
        }
    }
}

impl fmt::Display for DerivationRuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::DerivationRuleKind::{Basic, Exact, Minimal, Normalized};

    #[test]
    fn ordinal_ranking() {
        assert!(Basic < Minimal && Minimal < Normalized && Normalized < Exact);
        assert!(Basic.is_minimal() && Minimal.is_minimal() && !Normalized.is_minimal());
        assert!(Normalized.is_normalized() && !Exact.is_normalized());
        assert!(Basic.is_base() && !Minimal.is_base());
    }
}
