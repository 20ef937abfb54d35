//! Which parts of the catalog to include.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::catalog::AVAILABLE_LOCALES;
use crate::error::{Result, StandardsError};

/// Selects the dimension groups and translations carried by the catalog.
///
/// Base dimensions are always present. Missing TOML keys keep their
/// default value:
///
/// ```toml
/// electromagnetism = false
/// locales = ["es"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Plane and solid angle, declared minimal.
    pub angles: bool,
    /// Area, volume, speed, force, energy, power and friends.
    pub mechanics: bool,
    /// Charge, voltage, resistance, capacitance. Requires mechanics.
    pub electromagnetism: bool,
    /// Luminance, luminous flux, illuminance. Requires mechanics.
    pub photometry: bool,
    /// Translations to carry besides the root symbols; empty keeps all.
    pub locales: Vec<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            angles: true,
            mechanics: true,
            electromagnetism: true,
            photometry: true,
            locales: Vec::new(),
        }
    }
}

impl CatalogConfig {
    /// The seven base dimensions and nothing else.
    pub fn base_only() -> Self {
        Self {
            angles: false,
            mechanics: false,
            electromagnetism: false,
            photometry: false,
            ..Default::default()
        }
    }

    pub fn mechanics_only() -> Self {
        Self {
            angles: false,
            mechanics: true,
            electromagnetism: false,
            photometry: false,
            ..Default::default()
        }
    }

    pub fn with_locales<I, S>(mut self, locales: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.locales = locales.into_iter().map(Into::into).collect();
        self
    }

    /// Parse a config from TOML text and validate it.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(contents).map_err(|source| StandardsError::ParseConfig { source })?;
        config.validate()?;
        Ok(config)
    }

    /// Read a TOML config file and validate it.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| StandardsError::io(path, e))?;
        let config: Self = toml::from_str(&contents).map_err(|e| StandardsError::Toml {
            path: path.to_path_buf(),
            source: e,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.electromagnetism && !self.mechanics {
            return Err(StandardsError::invalid_config(
                "electromagnetism requires mechanics",
            ));
        }
        if self.photometry && !self.mechanics {
            return Err(StandardsError::invalid_config(
                "photometry requires mechanics",
            ));
        }
        if let Some(unknown) = self
            .locales
            .iter()
            .find(|locale| !AVAILABLE_LOCALES.contains(&locale.as_str()))
        {
            return Err(StandardsError::invalid_config(format!(
                "unsupported locale '{unknown}' (available: {})",
                AVAILABLE_LOCALES.join(", ")
            )));
        }
        Ok(())
    }

    /// True when translations for `locale` should be carried.
    pub fn includes_locale(&self, locale: &str) -> bool {
        self.locales.is_empty() || self.locales.iter().any(|l| l == locale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_overrides_defaults() {
        let config = CatalogConfig::from_toml_str(
            r#"
electromagnetism = false
locales = ["es"]
"#,
        )
        .unwrap();
        assert!(config.mechanics && config.angles && config.photometry);
        assert!(!config.electromagnetism);
        assert!(config.includes_locale("es"));
        assert!(!config.includes_locale("en"));
    }

    #[test]
    fn dependent_groups_need_mechanics() {
        let error = CatalogConfig::from_toml_str("mechanics = false").unwrap_err();
        assert!(matches!(error, StandardsError::InvalidConfig { .. }));
        assert!(CatalogConfig::base_only().validate().is_ok());
        let photometry = CatalogConfig {
            photometry: true,
            ..CatalogConfig::base_only()
        };
        assert!(photometry.validate().is_err());
    }

    #[test]
    fn unknown_locales_and_keys_are_rejected() {
        let error = CatalogConfig::mechanics_only()
            .with_locales(["de"])
            .validate()
            .unwrap_err();
        assert_eq!(
            error.to_string(),
            "invalid catalog config: unsupported locale 'de' (available: en, es)"
        );
        assert!(matches!(
            CatalogConfig::from_toml_str("angles = \"yes\""),
            Err(StandardsError::ParseConfig { .. })
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let error = CatalogConfig::load(Path::new("does/not/exist.toml")).unwrap_err();
        assert!(error.to_string().contains("does/not/exist.toml"));
    }
}
