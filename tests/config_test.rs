//! Integration tests for Settings config loading.
//!
//! These tests run against temp config files only; none sets DEPTREE_* vars.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use deptree::application::services::InputFormat;
use deptree::application::ApplicationError;
use deptree::config::Settings;

#[test]
fn given_no_global_config_when_load_then_returns_defaults() {
    let dir = TempDir::new().unwrap();

    let settings = Settings::load_from(Some(&dir.path().join("missing.toml"))).unwrap();

    assert_eq!(settings, Settings::default());
    assert!(settings.show_ids);
}

#[test]
fn given_global_config_when_load_then_overrides_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("deptree.toml");
    fs::write(
        &path,
        r#"
default_format = "toml"
show_ids = false
records_file = "/srv/directory/departments.toml"
"#,
    )
    .unwrap();

    let settings = Settings::load_from(Some(&path)).unwrap();

    assert_eq!(settings.default_format, Some(InputFormat::Toml));
    assert!(!settings.show_ids);
    assert_eq!(
        settings.records_file,
        Some(PathBuf::from("/srv/directory/departments.toml"))
    );
}

#[test]
fn given_partial_global_config_when_load_then_keeps_other_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("deptree.toml");
    fs::write(&path, "default_format = \"json\"\n").unwrap();

    let settings = Settings::load_from(Some(&path)).unwrap();

    assert_eq!(settings.default_format, Some(InputFormat::Json));
    assert!(settings.show_ids);
    assert_eq!(settings.records_file, None);
}

#[test]
fn given_invalid_global_config_when_load_then_errors_with_config() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("deptree.toml");
    fs::write(&path, "default_format = \"xml\"\n").unwrap();

    let err = Settings::load_from(Some(&path)).unwrap_err();

    assert!(matches!(err, ApplicationError::Config { .. }));
}
