use crate::error::{MeasureError, Result};
use crate::locale::Locale;
use crate::localizable::{LocalizableItem, TextField};
use crate::text::{is_valid_identifier, is_valid_symbol};

/// Texts of one item for one locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleBuilder {
    locale: Locale,
    caption: Option<String>,
    symbol: Option<String>,
    description: Option<String>,
    reference: Option<String>,
}

impl LocaleBuilder {
    pub fn new(locale: impl Into<Locale>) -> Self {
        Self {
            locale: locale.into(),
            caption: None,
            symbol: None,
            description: None,
            reference: None,
        }
    }

    /// Texts for the root locale, reached last by every fallback chain.
    pub fn root() -> Self {
        Self::new(Locale::root())
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    pub fn caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    /// Set the symbol; it may only contain letters, marks, symbols and numbers.
    pub fn symbol(mut self, symbol: impl Into<String>) -> Result<Self> {
        let symbol = symbol.into();
        if !is_valid_symbol(&symbol) {
            return Err(MeasureError::InvalidSymbol { symbol });
        }
        self.symbol = Some(symbol);
        Ok(self)
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    pub(crate) fn texts(&self) -> [(TextField, Option<&String>); 4] {
        [
            (TextField::Caption, self.caption.as_ref()),
            (TextField::Symbol, self.symbol.as_ref()),
            (TextField::Description, self.description.as_ref()),
            (TextField::Reference, self.reference.as_ref()),
        ]
    }
}

/// Name plus declared locales; the part shared by every item builder.
#[derive(Debug, Clone)]
pub(crate) struct ItemDeclaration {
    pub(crate) name: String,
    pub(crate) locales: Vec<LocaleBuilder>,
    pub(crate) default_locale: Option<Locale>,
}

impl ItemDeclaration {
    pub(crate) fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if !is_valid_identifier(&name) {
            return Err(MeasureError::InvalidName { name });
        }
        Ok(Self {
            name,
            locales: Vec::new(),
            default_locale: None,
        })
    }

    /// `describe` names the owning builder in error messages.
    pub(crate) fn add_locale(
        &mut self,
        locale: LocaleBuilder,
        is_default: bool,
        describe: &str,
    ) -> Result<()> {
        if self.locales.iter().any(|l| l.locale == locale.locale) {
            return Err(MeasureError::DuplicateLocale {
                item: describe.to_string(),
                locale: locale.locale.to_string(),
            });
        }
        if is_default {
            if let Some(existing) = &self.default_locale {
                return Err(MeasureError::DuplicateDefaultLocale {
                    item: describe.to_string(),
                    locale: locale.locale.to_string(),
                    existing: existing.to_string(),
                });
            }
            self.default_locale = Some(locale.locale.clone());
        }
        self.locales.push(locale);
        Ok(())
    }

    pub(crate) fn to_item(&self) -> LocalizableItem {
        let mut item = LocalizableItem::new(self.name.clone());
        if let Some(locale) = &self.default_locale {
            item.set_default_locale(locale.clone());
        }
        for locale in &self.locales {
            for (field, text) in locale.texts() {
                if let Some(text) = text {
                    item.insert(field, locale.locale.clone(), text.clone());
                }
            }
        }
        item
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_is_validated() {
        assert!(LocaleBuilder::root().symbol("m").is_ok());
        let err = LocaleBuilder::root().symbol("m s").unwrap_err();
        assert!(matches!(err, MeasureError::InvalidSymbol { .. }));
        assert!(LocaleBuilder::root().symbol("").is_err());
    }

    #[test]
    fn locales_are_declared_once() {
        let mut item = ItemDeclaration::new("Length").unwrap();
        item.add_locale(LocaleBuilder::new("en"), true, "Dimension: Length")
            .unwrap();
        let duplicate = item
            .add_locale(LocaleBuilder::new("en"), false, "Dimension: Length")
            .unwrap_err();
        assert!(matches!(duplicate, MeasureError::DuplicateLocale { .. }));
        let second_default = item
            .add_locale(LocaleBuilder::new("es"), true, "Dimension: Length")
            .unwrap_err();
        assert!(matches!(
            second_default,
            MeasureError::DuplicateDefaultLocale { ref existing, .. } if existing == "en"
        ));
    }

    #[test]
    fn invalid_names_are_rejected() {
        assert!(matches!(
            ItemDeclaration::new("Electric Current"),
            Err(MeasureError::InvalidName { .. })
        ));
    }

    #[test]
    fn item_carries_texts_and_default_locale() {
        let mut declaration = ItemDeclaration::new("Length").unwrap();
        declaration
            .add_locale(
                LocaleBuilder::new("es").caption("longitud"),
                true,
                "Dimension: Length",
            )
            .unwrap();
        declaration
            .add_locale(LocaleBuilder::root().symbol("L").unwrap(), false, "Dimension: Length")
            .unwrap();
        let item = declaration.to_item();
        assert_eq!(item.caption(), Some("longitud"));
        assert_eq!(item.symbol(), Some("L"));
        assert_eq!(item.default_locale(), Some(&Locale::new("es")));
    }
}
