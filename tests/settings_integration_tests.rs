//! Integration tests for SettingsStore and the persisted cache file
//!
//! These tests verify:
//! - Defaults when the file is absent or unusable
//! - Migration of legacy (name-keyed / unversioned) files
//! - Save/load round trips
//! - Save failures are contained

mod common;

use bossmodules::models::{CURRENT_SCHEMA_VERSION, DEFAULT_SITE_URL};
use bossmodules::{IgnoreTable, PersistedSettings, SettingsError, SettingsStore};
use camino::Utf8PathBuf;
use common::temp_store;
use std::fs;
use tempfile::TempDir;

fn write_settings(store: &SettingsStore, content: &str) {
    fs::create_dir_all(store.path().parent().unwrap()).unwrap();
    fs::write(store.path(), content).unwrap();
}

fn sample_settings() -> PersistedSettings {
    let mut table = IgnoreTable::new();
    table.insert(
        "MemoryV2".to_string(),
        vec!["SouvenirModule".to_string(), "simonsStages".to_string()],
    );
    table.insert("SouvenirModule".to_string(), Vec::new());

    PersistedSettings {
        site_url: "https://example.org/json/raw".to_string(),
        ignore_table: table,
        schema_version: CURRENT_SCHEMA_VERSION,
    }
}

#[test]
fn test_load_absent_file_gives_defaults() {
    let (store, _temp_dir) = temp_store();

    let settings = store.load();

    assert_eq!(settings.site_url, DEFAULT_SITE_URL);
    assert!(settings.ignore_table.is_empty());
    assert_eq!(settings.schema_version, CURRENT_SCHEMA_VERSION);
}

#[test]
fn test_save_and_load_round_trip() {
    let (store, _temp_dir) = temp_store();
    let settings = sample_settings();

    store.save(&settings);
    let loaded = store.load();

    assert_eq!(loaded, settings);
    // Key order survives as well
    let keys: Vec<&String> = loaded.ignore_table.keys().collect();
    assert_eq!(keys, vec!["MemoryV2", "SouvenirModule"]);
}

#[test]
fn test_legacy_version_discards_table_keeps_url() {
    let (store, _temp_dir) = temp_store();
    write_settings(
        &store,
        r#"{
  "SiteUrl": "https://mirror.example.org/raw",
  "IgnoredModuleIds": { "Forget Me Not": ["Souvenir"] },
  "Version": 1
}"#,
    );

    let settings = store.load();

    assert_eq!(settings.site_url, "https://mirror.example.org/raw");
    assert!(settings.ignore_table.is_empty());
    assert_eq!(settings.schema_version, CURRENT_SCHEMA_VERSION);
}

#[test]
fn test_name_keyed_legacy_file_migrates() {
    let (store, _temp_dir) = temp_store();
    write_settings(
        &store,
        r#"{
  "SiteUrl": "https://mirror.example.org/raw",
  "IgnoredModules": { "Forget Me Not": ["Souvenir", "Simon's Stages"] }
}"#,
    );

    let settings = store.load();

    assert_eq!(settings.site_url, "https://mirror.example.org/raw");
    assert!(settings.ignore_table.is_empty());
    assert_eq!(settings.schema_version, CURRENT_SCHEMA_VERSION);
}

#[test]
fn test_null_table_replaced() {
    let (store, _temp_dir) = temp_store();
    write_settings(
        &store,
        r#"{"SiteUrl": "https://x.example/raw", "IgnoredModuleIds": null, "Version": 2}"#,
    );

    let settings = store.load();

    assert_eq!(settings.site_url, "https://x.example/raw");
    assert!(settings.ignore_table.is_empty());
}

#[test]
fn test_corrupt_file_gives_defaults() {
    let (store, _temp_dir) = temp_store();
    write_settings(&store, "{ this is not json");

    assert!(matches!(store.try_load(), Err(SettingsError::Parse(_))));

    let settings = store.load();
    assert_eq!(settings, PersistedSettings::default());
}

#[test]
fn test_structurally_invalid_file_gives_defaults() {
    let (store, _temp_dir) = temp_store();
    write_settings(
        &store,
        r#"{"SiteUrl": 42, "IgnoredModuleIds": {"a": "not a list"}, "Version": 2}"#,
    );

    let settings = store.load();

    assert_eq!(settings, PersistedSettings::default());
}

#[test]
fn test_save_creates_missing_directories() {
    let temp_dir = TempDir::new().unwrap();
    let data_dir = Utf8PathBuf::try_from(temp_dir.path().to_path_buf())
        .unwrap()
        .join("does")
        .join("not")
        .join("exist");
    let store = SettingsStore::in_data_dir(&data_dir);

    store.try_save(&sample_settings()).unwrap();

    assert!(store.path().exists());
    assert_eq!(store.load(), sample_settings());
}

#[test]
fn test_save_failure_is_contained() {
    let temp_dir = TempDir::new().unwrap();
    let root = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();

    // A plain file where the Modsettings directory should be
    fs::write(root.join("Modsettings"), "in the way").unwrap();
    let store = SettingsStore::in_data_dir(&root);

    assert!(store.try_save(&sample_settings()).is_err());

    // Logged, not propagated
    store.save(&sample_settings());
    assert_eq!(store.load(), PersistedSettings::default());
}

#[test]
fn test_saved_file_layout() {
    let (store, _temp_dir) = temp_store();
    store.save(&sample_settings());

    let text = fs::read_to_string(store.path()).unwrap();
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();

    assert_eq!(json["SiteUrl"], "https://example.org/json/raw");
    assert_eq!(json["Version"], 2);
    assert_eq!(json["IgnoredModuleIds"]["MemoryV2"][0], "SouvenirModule");
    assert!(text.lines().count() > 1, "file should be indented");
}
