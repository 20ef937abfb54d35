use std::path::PathBuf;

use measure_standards::{CatalogConfig, StandardsError, load_framework};
use tempfile::TempDir;

fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn config_file_round_trips() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "catalog.toml",
        "photometry = false\nlocales = [\"en\"]\n",
    );
    let config = CatalogConfig::load(&path).unwrap();
    assert!(!config.photometry);
    assert_eq!(config.locales, ["en"]);
}

#[test]
fn framework_file_loads() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "framework.toml",
        r#"
name = "Tiny"

[[dimensions]]
name = "Length"

[[dimensions]]
name = "Area"
rules = [[{ dimension = "Length", exponent = 2 }]]
"#,
    );
    let framework = load_framework(&path).unwrap();
    assert_eq!(framework.len(), 2);
}

#[test]
fn malformed_file_reports_its_path() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "broken.toml", "name = [");
    let error = load_framework(&path).unwrap_err();
    assert!(matches!(error, StandardsError::Toml { .. }));
    assert!(error.to_string().contains("broken.toml"));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = TempDir::new().unwrap();
    let error = load_framework(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(error, StandardsError::Io { .. }));
}
