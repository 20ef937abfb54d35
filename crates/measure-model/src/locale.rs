//! Locale tags and their fallback chain.
//!
//! A locale is a dash-separated tag such as `es-AR`. Its parent drops the
//! last subtag (`es-AR` -> `es`), and every chain ends at the root locale,
//! represented by the empty tag.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Locale(String);

impl Locale {
    /// Create a locale from a tag. Underscores are accepted as separators.
    pub fn new(tag: impl AsRef<str>) -> Self {
        let tag = tag.as_ref().trim().replace('_', "-");
        Self(tag.trim_matches('-').to_string())
    }

    pub fn root() -> Self {
        Self(String::new())
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn parent(&self) -> Option<Locale> {
        if self.is_root() {
            return None;
        }
        match self.0.rfind('-') {
            Some(pos) => Some(Self(self.0[..pos].to_string())),
            None => Some(Self::root()),
        }
    }

    /// Iterate this locale and its ancestors, ending with the root locale.
    pub fn fallback_chain(&self) -> FallbackChain {
        FallbackChain {
            next: Some(self.clone()),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Locale {
    fn from(value: &str) -> Self {
        Locale::new(value)
    }
}

#[derive(Debug, Clone)]
pub struct FallbackChain {
    next: Option<Locale>,
}

impl Iterator for FallbackChain {
    type Item = Locale;

    fn next(&mut self) -> Option<Locale> {
        let current = self.next.take()?;
        self.next = current.parent();
        Some(current)
    }
}
