pub mod service;

pub use service::ServiceConfig;

use crate::models::{PersistedSettings, SettingsFile};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use std::io::Write;
use tempfile::NamedTempFile;
use thiserror::Error;

/// Directory under the host's data directory holding mod settings.
pub const SETTINGS_DIR: &str = "Modsettings";

/// File name of the persisted ignore cache.
pub const SETTINGS_FILE: &str = "BossModules.json";

/// Errors raised while reading or writing the persisted cache.
///
/// [`SettingsStore::load`] and [`SettingsStore::save`] recover from all of
/// these locally; the `try_*` variants expose them.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("I/O error on settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Settings could not be read")]
    Empty,
}

/// Codec for `BossModules.json`.
///
/// Loading never fails: a missing file yields defaults, a corrupt one is
/// logged and replaced with defaults, and an outdated one is migrated.
/// Saving never fails either; the in-memory settings stay authoritative.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: Utf8PathBuf,
}

impl SettingsStore {
    /// Create a store for an explicit settings file path.
    pub fn new<P: AsRef<Utf8Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Create a store at `<data_dir>/Modsettings/BossModules.json`.
    pub fn in_data_dir<P: AsRef<Utf8Path>>(data_dir: P) -> Self {
        Self::new(data_dir.as_ref().join(SETTINGS_DIR).join(SETTINGS_FILE))
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Load settings, substituting defaults on any failure.
    pub fn load(&self) -> PersistedSettings {
        match self.try_load() {
            Ok(Some(settings)) => {
                tracing::info!("Settings successfully loaded from {}", self.path);
                settings
            }
            Ok(None) => {
                tracing::info!("No settings file at {}, using defaults", self.path);
                PersistedSettings::default()
            }
            Err(e) => {
                tracing::warn!(
                    "Error loading settings file {}: {}. Creating new settings...",
                    self.path,
                    e
                );
                PersistedSettings::default()
            }
        }
    }

    /// Load settings, reporting why a present file could not be used.
    ///
    /// # Returns
    /// `Ok(None)` if the file does not exist, upgraded settings otherwise
    pub fn try_load(&self) -> Result<Option<PersistedSettings>, SettingsError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path)?;

        // A literal `null` document deserializes to None
        let file: Option<SettingsFile> = serde_json::from_str(&contents)?;
        let file = file.ok_or(SettingsError::Empty)?;

        Ok(Some(file.upgrade()))
    }

    /// Save settings, logging instead of propagating failures.
    pub fn save(&self, settings: &PersistedSettings) {
        match self.try_save(settings) {
            Ok(()) => tracing::info!("Saved settings to {}", self.path),
            Err(e) => tracing::warn!("Failed to save settings file {}: {}", self.path, e),
        }
    }

    /// Write settings as indented JSON, creating the parent directory.
    ///
    /// The file is replaced atomically through a temporary file in the same
    /// directory.
    pub fn try_save(&self, settings: &PersistedSettings) -> Result<(), SettingsError> {
        let parent = match self.path.parent() {
            Some(p) if !p.as_str().is_empty() => p,
            _ => Utf8Path::new("."),
        };

        if !parent.exists() {
            fs::create_dir_all(parent)?;
        }

        let encoded = serde_json::to_string_pretty(settings)?;

        let mut tmp = NamedTempFile::new_in(parent)?;
        tmp.write_all(encoded.as_bytes())?;
        tmp.flush()?;
        tmp.persist(&self.path).map_err(|e| SettingsError::Io(e.error))?;

        Ok(())
    }
}
