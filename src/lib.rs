// Boss Module Manager - keeps track of which boss modules should ignore each other
//
// This is the library crate: the persisted cache, the feed refresh pipeline and
// lookups. The binary crate (main.rs) is a small host around it.

pub mod config;
pub mod logging;
pub mod manager;
pub mod metrics;
pub mod models;
pub mod services;
pub mod state;

// Re-export commonly used types for convenience
pub use config::{ServiceConfig, SettingsError, SettingsStore};
pub use manager::{BossModuleManager, BossModuleService, RefreshOutcome};
pub use models::{IgnoreTable, NameIdIndex, PersistedSettings};
pub use services::{FeedTransport, FetchError, HttpTransport};
pub use state::{CacheState, IgnoreSnapshot, RefreshEvent};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
