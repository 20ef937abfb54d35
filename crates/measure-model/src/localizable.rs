//! Named items carrying per-locale caption, symbol, description and reference.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::error::Result;
use crate::locale::Locale;
use crate::text::{ContentFormat, TextFormat};

/// One of the four independently localized texts of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextField {
    Caption,
    Symbol,
    Description,
    Reference,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalizableItem {
    name: String,
    default_locale: Option<Locale>,
    captions: BTreeMap<Locale, String>,
    symbols: BTreeMap<Locale, String>,
    descriptions: BTreeMap<Locale, String>,
    references: BTreeMap<Locale, String>,
}

impl LocalizableItem {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub(crate) fn set_default_locale(&mut self, locale: Locale) {
        self.default_locale = Some(locale);
    }

    pub(crate) fn insert(&mut self, field: TextField, locale: Locale, text: String) {
        self.texts_mut(field).insert(locale, text);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared default locale, if any.
    pub fn default_locale(&self) -> Option<&Locale> {
        self.default_locale.as_ref()
    }

    /// Locale used when none is requested: the declared default, else root.
    pub fn effective_locale(&self) -> Locale {
        self.default_locale.clone().unwrap_or_default()
    }

    /// Every locale for which at least one text is present.
    pub fn locales(&self) -> BTreeSet<&Locale> {
        self.captions
            .keys()
            .chain(self.symbols.keys())
            .chain(self.descriptions.keys())
            .chain(self.references.keys())
            .collect()
    }

    /// Text declared exactly for `locale`, without fallback.
    pub fn declared(&self, field: TextField, locale: &Locale) -> Option<&str> {
        self.texts(field).get(locale).map(String::as_str)
    }

    /// Walk the fallback chain of `locale` and return the first text present.
    pub fn localized(&self, field: TextField, locale: &Locale) -> Option<&str> {
        let texts = self.texts(field);
        locale
            .fallback_chain()
            .find_map(|candidate| texts.get(&candidate))
            .map(String::as_str)
    }

    pub fn caption(&self) -> Option<&str> {
        self.localized(TextField::Caption, &self.effective_locale())
    }

    pub fn symbol(&self) -> Option<&str> {
        self.localized(TextField::Symbol, &self.effective_locale())
    }

    pub fn description(&self) -> Option<&str> {
        self.localized(TextField::Description, &self.effective_locale())
    }

    pub fn reference(&self) -> Option<&str> {
        self.localized(TextField::Reference, &self.effective_locale())
    }

    pub fn caption_in(&self, locale: &Locale) -> Option<&str> {
        self.localized(TextField::Caption, locale)
    }

    pub fn symbol_in(&self, locale: &Locale) -> Option<&str> {
        self.localized(TextField::Symbol, locale)
    }

    pub fn description_in(&self, locale: &Locale) -> Option<&str> {
        self.localized(TextField::Description, locale)
    }

    pub fn reference_in(&self, locale: &Locale) -> Option<&str> {
        self.localized(TextField::Reference, locale)
    }

    /// Render the item. `None` uses the item's effective locale.
    ///
    /// Missing text renders as an empty string.
    pub fn format(&self, format: &TextFormat, locale: Option<&Locale>) -> String {
        let locale = locale.cloned().unwrap_or_else(|| self.effective_locale());
        let text: &str = match format.content {
            ContentFormat::Default => self
                .localized(TextField::Symbol, &locale)
                .filter(|s| !s.trim().is_empty())
                .or_else(|| {
                    self.localized(TextField::Caption, &locale)
                        .filter(|s| !s.trim().is_empty())
                })
                .unwrap_or(&self.name),
            ContentFormat::Name => &self.name,
            ContentFormat::Symbol => self.localized(TextField::Symbol, &locale).unwrap_or(""),
            ContentFormat::Caption => self.localized(TextField::Caption, &locale).unwrap_or(""),
            ContentFormat::Description => self
                .localized(TextField::Description, &locale)
                .unwrap_or(""),
            ContentFormat::Reference => self
                .localized(TextField::Reference, &locale)
                .unwrap_or(""),
        };
        format.decorate(text)
    }

    /// Parse `spec` with the format mini-language and render the item.
    pub fn format_with(&self, spec: &str, locale: Option<&Locale>) -> Result<String> {
        let format: TextFormat = spec.parse()?;
        Ok(self.format(&format, locale))
    }

    fn texts(&self, field: TextField) -> &BTreeMap<Locale, String> {
        match field {
            TextField::Caption => &self.captions,
            TextField::Symbol => &self.symbols,
            TextField::Description => &self.descriptions,
            TextField::Reference => &self.references,
        }
    }

    fn texts_mut(&mut self, field: TextField) -> &mut BTreeMap<Locale, String> {
        match field {
            TextField::Caption => &mut self.captions,
            TextField::Symbol => &mut self.symbols,
            TextField::Description => &mut self.descriptions,
            TextField::Reference => &mut self.references,
        }
    }
}

impl fmt::Display for LocalizableItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(&TextFormat::default(), None))
    }
}
