//! A ready-made catalog of the International System of Quantities.

use std::path::Path;

use measure_model::{
    DimensionDeclaration, FrameworkDeclaration, LocaleDeclaration, MeasurementFramework,
    RuleDeclaration, RuleTerm,
};

use crate::config::CatalogConfig;
use crate::error::{Result, StandardsError};

/// Locales the catalog carries translations for.
pub const AVAILABLE_LOCALES: &[&str] = &["en", "es"];

/// Name of the catalog framework.
pub const CATALOG_NAME: &str = "ISQ";

type Rule = &'static [(&'static str, i32)];

struct Entry {
    name: &'static str,
    symbol: Option<&'static str>,
    en: &'static str,
    es: &'static str,
    minimal: bool,
    rules: &'static [Rule],
}

const fn base(
    name: &'static str,
    symbol: &'static str,
    en: &'static str,
    es: &'static str,
) -> Entry {
    Entry {
        name,
        symbol: Some(symbol),
        en,
        es,
        minimal: false,
        rules: &[],
    }
}

const fn derived(
    name: &'static str,
    en: &'static str,
    es: &'static str,
    rules: &'static [Rule],
) -> Entry {
    Entry {
        name,
        symbol: None,
        en,
        es,
        minimal: false,
        rules,
    }
}

const fn minimal(
    name: &'static str,
    en: &'static str,
    es: &'static str,
    rules: &'static [Rule],
) -> Entry {
    Entry {
        minimal: true,
        ..derived(name, en, es, rules)
    }
}

const BASE: &[Entry] = &[
    base("Length", "L", "length", "longitud"),
    base("Mass", "M", "mass", "masa"),
    base("Time", "T", "time", "tiempo"),
    base("ElectricCurrent", "I", "electric current", "corriente eléctrica"),
    base("Temperature", "Θ", "thermodynamic temperature", "temperatura termodinámica"),
    base("AmountOfSubstance", "N", "amount of substance", "cantidad de sustancia"),
    base("LuminousIntensity", "J", "luminous intensity", "intensidad luminosa"),
];

const ANGLES: &[Entry] = &[
    minimal("PlaneAngle", "plane angle", "ángulo plano", &[&[("Length", 1), ("Length", -1)]]),
    minimal("SolidAngle", "solid angle", "ángulo sólido", &[&[("PlaneAngle", 2)]]),
];

const MECHANICS: &[Entry] = &[
    derived("Area", "area", "área", &[&[("Length", 2)]]),
    derived("Volume", "volume", "volumen", &[&[("Length", 3)]]),
    derived("Speed", "speed", "velocidad", &[&[("Length", 1), ("Time", -1)]]),
    derived("Acceleration", "acceleration", "aceleración", &[&[("Speed", 1), ("Time", -1)]]),
    derived("Frequency", "frequency", "frecuencia", &[&[("Time", -1)]]),
    derived("Force", "force", "fuerza", &[&[("Mass", 1), ("Acceleration", 1)]]),
    derived("Pressure", "pressure", "presión", &[&[("Force", 1), ("Area", -1)]]),
    derived(
        "Energy",
        "energy",
        "energía",
        &[&[("Force", 1), ("Length", 1)], &[("Power", 1), ("Time", 1)]],
    ),
    derived("Power", "power", "potencia", &[&[("Energy", 1), ("Time", -1)]]),
    minimal("Torque", "torque", "par", &[&[("Force", 1), ("Length", 1)]]),
    derived("Momentum", "momentum", "cantidad de movimiento", &[&[("Mass", 1), ("Speed", 1)]]),
    derived("Density", "density", "densidad", &[&[("Mass", 1), ("Volume", -1)]]),
];

const ANGULAR_MECHANICS: &[Entry] = &[derived(
    "AngularVelocity",
    "angular velocity",
    "velocidad angular",
    &[&[("PlaneAngle", 1), ("Time", -1)]],
)];

const ELECTROMAGNETISM: &[Entry] = &[
    derived(
        "ElectricCharge",
        "electric charge",
        "carga eléctrica",
        &[&[("ElectricCurrent", 1), ("Time", 1)]],
    ),
    derived(
        "Voltage",
        "voltage",
        "tensión eléctrica",
        &[&[("Power", 1), ("ElectricCurrent", -1)]],
    ),
    derived(
        "Resistance",
        "resistance",
        "resistencia",
        &[&[("Voltage", 1), ("ElectricCurrent", -1)]],
    ),
    derived(
        "Capacitance",
        "capacitance",
        "capacidad",
        &[&[("ElectricCharge", 1), ("Voltage", -1)]],
    ),
];

const PHOTOMETRY: &[Entry] = &[derived(
    "Luminance",
    "luminance",
    "luminancia",
    &[&[("LuminousIntensity", 1), ("Area", -1)]],
)];

const ANGULAR_PHOTOMETRY: &[Entry] = &[
    derived(
        "LuminousFlux",
        "luminous flux",
        "flujo luminoso",
        &[&[("LuminousIntensity", 1), ("SolidAngle", 1)]],
    ),
    derived("Illuminance", "illuminance", "iluminancia", &[&[("LuminousFlux", 1), ("Area", -1)]]),
];

/// Declaration of the catalog selected by `config`.
pub fn declaration(config: &CatalogConfig) -> Result<FrameworkDeclaration> {
    config.validate()?;

    let groups: [(&str, bool, &[Entry]); 7] = [
        ("base", true, BASE),
        ("angles", config.angles, ANGLES),
        ("mechanics", config.mechanics, MECHANICS),
        ("angular mechanics", config.angles && config.mechanics, ANGULAR_MECHANICS),
        ("electromagnetism", config.electromagnetism, ELECTROMAGNETISM),
        ("photometry", config.photometry, PHOTOMETRY),
        ("angular photometry", config.photometry && config.angles, ANGULAR_PHOTOMETRY),
    ];

    let mut declaration = FrameworkDeclaration::new(CATALOG_NAME);
    declaration.locales = framework_locales(config);
    for (group, enabled, entries) in groups {
        if !enabled {
            tracing::debug!(group, "Skipping dimension group");
            continue;
        }
        tracing::debug!(group, count = entries.len(), "Adding dimension group");
        declaration
            .dimensions
            .extend(entries.iter().map(|entry| entry.declare(config)));
    }
    Ok(declaration)
}

/// Build the catalog selected by `config`.
pub fn build(config: &CatalogConfig) -> Result<MeasurementFramework> {
    let framework = declaration(config)?.build()?;
    tracing::info!(
        dimensions = framework.len(),
        "Built {} catalog",
        framework.name()
    );
    Ok(framework)
}

/// The full catalog with every group and translation.
pub fn isq() -> Result<MeasurementFramework> {
    build(&CatalogConfig::default())
}

/// Parse a framework declaration written in TOML.
pub fn declaration_from_toml_str(contents: &str) -> Result<FrameworkDeclaration> {
    toml::from_str(contents).map_err(|source| StandardsError::ParseConfig { source })
}

/// Read a TOML framework declaration from disk and build it.
pub fn load_framework(path: &Path) -> Result<MeasurementFramework> {
    let contents = std::fs::read_to_string(path).map_err(|e| StandardsError::io(path, e))?;
    let declaration: FrameworkDeclaration =
        toml::from_str(&contents).map_err(|e| StandardsError::Toml {
            path: path.to_path_buf(),
            source: e,
        })?;
    let framework = declaration.build()?;
    tracing::info!(
        path = %path.display(),
        dimensions = framework.len(),
        "Loaded framework declaration"
    );
    Ok(framework)
}

fn framework_locales(config: &CatalogConfig) -> Vec<LocaleDeclaration> {
    let captions = [
        ("en", "International System of Quantities"),
        ("es", "Sistema Internacional de Magnitudes"),
    ];
    let mut locales: Vec<LocaleDeclaration> = captions
        .into_iter()
        .filter(|(locale, _)| config.includes_locale(locale))
        .map(|(locale, caption)| LocaleDeclaration {
            caption: Some(caption.to_string()),
            ..LocaleDeclaration::new(locale)
        })
        .collect();
    if let Some(first) = locales.first_mut() {
        first.default = true;
    }
    locales
}

impl Entry {
    fn declare(&self, config: &CatalogConfig) -> DimensionDeclaration {
        let mut locales = Vec::new();
        if let Some(symbol) = self.symbol {
            locales.push(LocaleDeclaration {
                symbol: Some(symbol.to_string()),
                ..LocaleDeclaration::new("")
            });
        }
        for (locale, caption) in [("en", self.en), ("es", self.es)] {
            if config.includes_locale(locale) {
                locales.push(LocaleDeclaration {
                    caption: Some(caption.to_string()),
                    ..LocaleDeclaration::new(locale)
                });
            }
        }

        DimensionDeclaration {
            name: self.name.to_string(),
            identifier: None,
            locales,
            minimal: self.minimal,
            rules: self
                .rules
                .iter()
                .map(|terms| RuleDeclaration {
                    terms: terms
                        .iter()
                        .map(|&(dimension, exponent)| RuleTerm {
                            dimension: dimension.to_string(),
                            exponent,
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}
