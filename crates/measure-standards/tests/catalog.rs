use measure_model::{DerivationRuleKind, DimensionRule, Locale, MeasureError, TextFormat};
use measure_standards::{CatalogConfig, StandardsError, build, declaration_from_toml_str, isq};

#[test]
fn full_catalog_builds() {
    let framework = isq().unwrap();
    assert_eq!(framework.name(), "ISQ");
    assert_eq!(framework.to_string(), "International System of Quantities");
    assert_eq!(
        framework.format(&TextFormat::default(), Some(&Locale::new("es"))),
        "Sistema Internacional de Magnitudes"
    );

    let bases: Vec<_> = framework
        .dimensions()
        .filter(|d| d.kind() == DerivationRuleKind::Basic)
        .map(|d| d.name().to_string())
        .collect();
    insta::assert_debug_snapshot!(bases, @r#"
    [
        "Length",
        "Mass",
        "Time",
        "ElectricCurrent",
        "Temperature",
        "AmountOfSubstance",
        "LuminousIntensity",
    ]
    "#);
}

#[test]
fn energy_and_torque_share_only_their_basic_form() {
    let framework = isq().unwrap();
    let energy = framework.dimension_by_name("Energy").unwrap();
    let torque = framework.dimension_by_name("Torque").unwrap();

    assert_eq!(torque.kind(), DerivationRuleKind::Minimal);
    assert_ne!(energy.minimal_rule(), torque.minimal_rule());
    assert_eq!(energy.basic_rule(), torque.basic_rule());
    assert_eq!(energy.basic_rule().to_string(), "L^2·M / T^2");

    let by_basic: Vec<_> = framework
        .dimensions_by_basic_rule(&energy)
        .unwrap()
        .iter()
        .map(|d| d.name().to_string())
        .collect();
    assert_eq!(by_basic, ["Energy", "Torque"]);

    // Torque's declared rule still lands in the energy bucket.
    let by_minimal: Vec<_> = framework
        .dimensions_by_minimal_rule(&energy)
        .unwrap()
        .iter()
        .map(|d| d.name().to_string())
        .collect();
    assert_eq!(by_minimal, ["Energy", "Torque"]);
    let torque_only: Vec<_> = framework
        .dimensions_by_minimal_rule(&torque)
        .unwrap()
        .iter()
        .map(|d| d.name().to_string())
        .collect();
    assert_eq!(torque_only, ["Torque"]);
}

#[test]
fn angles_vanish_from_basic_forms() {
    let framework = isq().unwrap();
    let angular = framework.dimension_by_name("AngularVelocity").unwrap();
    let frequency = framework.dimension_by_name("Frequency").unwrap();
    assert_ne!(angular.minimal_rule(), frequency.minimal_rule());
    assert_eq!(angular.basic_rule(), frequency.basic_rule());

    let solid = framework.dimension_by_name("SolidAngle").unwrap();
    assert!(solid.basic_rule().is_empty());
}

#[test]
fn base_symbols_resolve_in_every_locale() {
    let framework = isq().unwrap();
    let temperature = framework
        .dimension_by_symbol("Θ", Some(&Locale::new("es-AR")))
        .unwrap();
    assert_eq!(temperature.name(), "Temperature");
    assert_eq!(
        framework.parse_dimension(" Speed ", None).unwrap().name(),
        "Speed"
    );
}

#[test]
fn electrical_units_reduce_to_base_dimensions() {
    let framework = isq().unwrap();
    let resistance = framework.dimension_by_name("Resistance").unwrap();
    assert_eq!(resistance.basic_rule().to_string(), "L^2·M / T^3·I^2");
}

#[test]
fn groups_follow_the_config() {
    let base = build(&CatalogConfig::base_only()).unwrap();
    assert_eq!(base.len(), 7);

    let mechanics = build(&CatalogConfig::mechanics_only()).unwrap();
    assert!(mechanics.get_dimension_by_name("Force").is_some());
    assert!(mechanics.get_dimension_by_name("PlaneAngle").is_none());
    assert!(mechanics.get_dimension_by_name("AngularVelocity").is_none());

    let photometry = CatalogConfig {
        angles: false,
        ..CatalogConfig::default()
    };
    let framework = build(&photometry).unwrap();
    assert!(framework.get_dimension_by_name("Luminance").is_some());
    assert!(framework.get_dimension_by_name("LuminousFlux").is_none());
}

#[test]
fn spanish_only_catalog_defaults_to_spanish() {
    let config = CatalogConfig::base_only().with_locales(["es"]);
    let framework = build(&config).unwrap();
    assert_eq!(framework.to_string(), "Sistema Internacional de Magnitudes");
    let length = framework.dimension_by_name("Length").unwrap();
    assert_eq!(length.item().caption_in(&Locale::new("en")), None);
    assert_eq!(length.item().caption_in(&Locale::new("es")), Some("longitud"));
}

#[test]
fn toml_declarations_build() {
    let declaration = declaration_from_toml_str(
        r#"
name = "Mechanics"

[[dimensions]]
name = "Length"
locales = [{ symbol = "m" }]

[[dimensions]]
name = "Time"
locales = [{ symbol = "s" }]

[[dimensions]]
name = "Speed"
rules = [[{ dimension = "Length" }, { dimension = "Time", exponent = -1 }]]
"#,
    )
    .unwrap();
    let framework = declaration.build().unwrap();
    let speed = framework.dimension_by_name("Speed").unwrap();
    assert_eq!(speed.basic_rule().to_string(), "m / s");
}

#[test]
fn model_errors_pass_through() {
    let declaration = declaration_from_toml_str(
        r#"
name = "Broken"

[[dimensions]]
name = "Speed"
rules = [[{ dimension = "Length" }]]
"#,
    )
    .unwrap();
    let error: StandardsError = declaration.build().unwrap_err().into();
    assert!(matches!(
        error,
        StandardsError::Model(MeasureError::UnresolvedDimension { .. })
    ));
}
