use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use std::time::Duration;

/// Default name of the optional host configuration file.
pub const SERVICE_CONFIG_FILE: &str = "BossModules.yaml";

/// Prefix of environment variables overriding the host configuration.
pub const ENV_PREFIX: &str = "BOSSMODULES";

/// Host-side configuration: where data and logs live and how the feed is
/// fetched.
///
/// Layered from defaults, an optional YAML file and `BOSSMODULES_*`
/// environment variables (e.g. `BOSSMODULES_DATA_DIR`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Private data directory; the cache lives in `Modsettings/` below it.
    pub data_dir: Utf8PathBuf,

    pub log_dir: Utf8PathBuf,

    pub debug_mode: bool,

    pub console_output: bool,

    /// Request timeout for the feed. `None` leaves it to the transport.
    pub request_timeout_secs: Option<u64>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            data_dir: Utf8PathBuf::from("."),
            log_dir: Utf8PathBuf::from("logs"),
            debug_mode: false,
            console_output: true,
            request_timeout_secs: None,
        }
    }
}

impl ServiceConfig {
    /// Load configuration from `path` (if it exists) and the environment.
    ///
    /// # Errors
    /// Fails if the file exists but is not valid YAML, or a value has the
    /// wrong type.
    pub fn load<P: AsRef<Utf8Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let config = Config::builder()
            .add_source(File::new(path.as_str(), FileFormat::Yaml).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .with_context(|| format!("Failed to read service config: {}", path))?;

        let service_config: ServiceConfig = config
            .try_deserialize()
            .with_context(|| format!("Failed to parse service config: {}", path))?;

        tracing::debug!("Loaded service config: {:?}", service_config);
        Ok(service_config)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}
