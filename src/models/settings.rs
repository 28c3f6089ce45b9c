use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Feed queried when no site URL has been configured.
pub const DEFAULT_SITE_URL: &str = "https://ktane.timwi.de/json/raw";

/// Current on-disk layout of `BossModules.json`.
///
/// Version 1 stored a name-keyed `IgnoredModules` object. Version 2 keys
/// everything by module ID.
pub const CURRENT_SCHEMA_VERSION: i64 = 2;

/// Module ID -> IDs of the modules it ignores, in feed order.
pub type IgnoreTable = IndexMap<String, Vec<String>>;

/// Settings persisted between runs in `Modsettings/BossModules.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedSettings {
    #[serde(rename = "SiteUrl")]
    pub site_url: String,

    #[serde(rename = "IgnoredModuleIds")]
    pub ignore_table: IgnoreTable,

    #[serde(rename = "Version")]
    pub schema_version: i64,
}

impl Default for PersistedSettings {
    fn default() -> Self {
        Self {
            site_url: DEFAULT_SITE_URL.to_string(),
            ignore_table: IgnoreTable::new(),
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }
}

/// Raw shape of the settings file as found on disk.
///
/// Every field is optional so that legacy and hand-edited files still parse;
/// [`SettingsFile::upgrade`] turns it into current settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsFile {
    #[serde(rename = "SiteUrl", default)]
    pub site_url: Option<String>,

    #[serde(rename = "IgnoredModuleIds", default)]
    pub ignore_table: Option<IgnoreTable>,

    /// Absent in files written before versioning was introduced.
    #[serde(rename = "Version", default)]
    pub schema_version: Option<i64>,
}

impl SettingsFile {
    /// Stored version, treating an unversioned file as the legacy layout.
    pub fn stored_version(&self) -> i64 {
        self.schema_version.unwrap_or(1)
    }

    /// Migrate to the current layout.
    ///
    /// An outdated version or a missing table discards the ignore table; the
    /// site URL always survives.
    pub fn upgrade(self) -> PersistedSettings {
        let stored_version = self.stored_version();
        let site_url = self
            .site_url
            .unwrap_or_else(|| DEFAULT_SITE_URL.to_string());

        let ignore_table = match self.ignore_table {
            _ if stored_version < CURRENT_SCHEMA_VERSION => {
                tracing::info!(
                    "Settings file has schema version {}, discarding ignore table (current is {})",
                    stored_version,
                    CURRENT_SCHEMA_VERSION
                );
                IgnoreTable::new()
            }
            Some(table) => table,
            None => {
                tracing::warn!("Settings file has a null list of ignored modules");
                IgnoreTable::new()
            }
        };

        PersistedSettings {
            site_url,
            ignore_table,
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }
}
