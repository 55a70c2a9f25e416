//! Integration tests for Settings loading with layered precedence.
//!
//! Precedence: defaults → global file → local `.labtable.toml` → env vars.
//! These tests pass an explicit global file, so the user's real config does
//! not interfere.

use std::fs;
use std::path::PathBuf;

use labtable::application::ApplicationError;
use labtable::config::{local_config_path, Settings};
use tempfile::TempDir;

#[test]
fn given_no_config_files_when_load_then_defaults() {
    // Arrange
    let dir = TempDir::new().unwrap();

    // Act
    let settings = Settings::load_from(None, Some(dir.path())).expect("load settings");

    // Assert
    assert_eq!(settings.renaming_offset, 1);
    assert!(!settings.csv.quote_all);
    assert_eq!(settings.output_dir, PathBuf::from("."));
}

#[test]
fn given_global_and_local_config_when_load_then_local_wins_per_field() {
    // Arrange
    let global_dir = TempDir::new().unwrap();
    let global_path = global_dir.path().join("labtable.toml");
    fs::write(
        &global_path,
        r#"
renaming_offset = 2
output_dir = "/srv/exports"

[csv]
quote_all = true
"#,
    )
    .unwrap();

    let project = TempDir::new().unwrap();
    fs::write(
        local_config_path(project.path()),
        r#"
[csv]
quote_all = false
"#,
    )
    .unwrap();

    // Act
    let settings =
        Settings::load_from(Some(&global_path), Some(project.path())).expect("load settings");

    // Assert
    assert_eq!(settings.renaming_offset, 2, "global value is kept");
    assert_eq!(settings.output_dir, PathBuf::from("/srv/exports"));
    assert!(!settings.csv.quote_all, "local value overrides global");
}

#[test]
fn given_output_dir_with_env_var_when_load_then_expanded() {
    // Arrange
    std::env::set_var("LABTABLE_TEST_EXPORT_ROOT", "/data/lab");
    let project = TempDir::new().unwrap();
    fs::write(
        local_config_path(project.path()),
        "output_dir = \"$LABTABLE_TEST_EXPORT_ROOT/csv\"\n",
    )
    .unwrap();

    // Act
    let settings = Settings::load_from(None, Some(project.path())).expect("load settings");

    // Assert
    assert_eq!(settings.output_dir, PathBuf::from("/data/lab/csv"));
}

#[test]
fn given_label_heading_env_var_when_load_then_overrides_files() {
    // Arrange
    let project = TempDir::new().unwrap();
    fs::write(
        local_config_path(project.path()),
        "label_heading = \"sample\"\n",
    )
    .unwrap();
    std::env::set_var("LABTABLE_LABEL_HEADING", "specimen");

    // Act
    let settings = Settings::load_from(None, Some(project.path()));
    std::env::remove_var("LABTABLE_LABEL_HEADING");

    // Assert
    assert_eq!(settings.expect("load settings").label_heading, "specimen");
}

#[test]
fn given_invalid_toml_when_load_then_config_error() {
    let project = TempDir::new().unwrap();
    fs::write(local_config_path(project.path()), "renaming_offset = \"two\"\n").unwrap();

    let err = Settings::load_from(None, Some(project.path())).unwrap_err();

    assert!(matches!(err, ApplicationError::Config { .. }));
}

#[test]
fn given_template_when_parsed_then_yields_defaults() {
    let template = Settings::template();

    let parsed: Settings = toml::from_str(&template).expect("template parses");

    assert_eq!(parsed, Settings::default());
}
