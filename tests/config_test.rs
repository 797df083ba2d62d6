//! Integration tests for Settings config loading with layered precedence.
//!
//! The global config path is passed explicitly, so the host's XDG config is
//! never read. TREEKIT_* variables are cleared before any test runs; the
//! environment layer is covered in config_env_test.rs.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use treekit::config::{Settings, Traversal};
use treekit::util::testing;
use treekit::SettingsError;

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
    let inherited: Vec<String> = env::vars()
        .map(|(key, _)| key)
        .filter(|key| key.starts_with("TREEKIT_"))
        .collect();
    for key in inherited {
        env::remove_var(key);
    }
}

fn write_config(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn given_no_config_files_when_loading_then_uses_defaults() {
    let settings = Settings::load_from(None, None).expect("load defaults");
    assert_eq!(settings, Settings::default());
}

#[test]
fn given_missing_global_file_when_loading_then_skips_it() {
    let dir = TempDir::new().unwrap();
    let global = dir.path().join("treekit.toml");

    let settings = Settings::load_from(Some(&global), None).expect("load defaults");

    assert_eq!(settings, Settings::default());
}

#[test]
fn given_global_file_when_loading_then_overrides_defaults() {
    let dir = TempDir::new().unwrap();
    let global = write_config(&dir, "global.toml", "traversal = \"iterative\"\n");

    let settings = Settings::load_from(Some(&global), None).expect("load settings");

    assert_eq!(
        settings,
        Settings {
            traversal: Traversal::Iterative,
            ..Settings::default()
        }
    );
}

#[test]
fn given_global_and_config_file_when_loading_then_file_wins() {
    let dir = TempDir::new().unwrap();
    let global = write_config(
        &dir,
        "global.toml",
        "traversal = \"iterative\"\nempty_marker = \"g\"\n",
    );
    let local = write_config(&dir, "local.toml", "empty_marker = \"l\"\n");

    let settings = Settings::load_from(Some(&global), Some(&local)).expect("load settings");

    assert_eq!(settings.traversal, Traversal::Iterative);
    assert_eq!(settings.empty_marker, "l");
}

#[test]
fn given_config_file_when_loading_then_overrides_defaults() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        "treekit.toml",
        "traversal = \"iterative\"\nempty_marker = \"-\"\n",
    );

    let settings = Settings::load_from(None, Some(&path)).expect("load settings");

    assert_eq!(settings.traversal, Traversal::Iterative);
    assert_eq!(settings.empty_marker, "-");
}

#[test]
fn given_partial_config_file_when_loading_then_keeps_other_defaults() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "treekit.toml", "empty_marker = \"nil\"\n");

    let settings = Settings::load_from(None, Some(&path)).expect("load settings");

    assert_eq!(settings.traversal, Traversal::Recursive);
    assert_eq!(settings.empty_marker, "nil");
}

#[test]
fn given_missing_config_file_when_loading_then_read_error() {
    let result = Settings::load_from(None, Some(Path::new("/nonexistent/treekit.toml")));
    assert!(matches!(result, Err(SettingsError::Read { .. })));
}

#[test]
fn given_invalid_traversal_in_file_when_loading_then_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "treekit.toml", "traversal = \"sideways\"\n");

    let result = Settings::load_from(None, Some(&path));

    match result {
        Err(SettingsError::Parse { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn given_effective_settings_when_rendering_toml_then_reloads_identically() {
    let dir = TempDir::new().unwrap();
    let settings = Settings {
        traversal: Traversal::Iterative,
        empty_marker: "x".to_string(),
    };
    let path = write_config(&dir, "treekit.toml", &settings.to_toml().unwrap());

    assert_eq!(Settings::load_from(None, Some(&path)).unwrap(), settings);
}
