//! Data models for the boss module manager.
//!
//! - [`PersistedSettings`]: what is written to `Modsettings/BossModules.json`
//! - [`SettingsFile`]: the lenient on-disk shape, upgraded into [`PersistedSettings`]
//! - [`ModuleDescriptor`]: one transient entry of the remote feed
//! - [`NameIdIndex`]: display name <-> module ID maps built from the feed
//!
//! # Identifier spaces
//!
//! The feed references modules both by display name and by stable module ID.
//! Everything persisted in the current schema is keyed by ID; names only
//! appear in [`NameIdIndex`].

pub mod feed;
pub mod index;
pub mod settings;

pub use feed::{FEED_MODULES_KEY, IgnoreListField, ModuleDescriptor};
pub use index::NameIdIndex;
pub use settings::{
    CURRENT_SCHEMA_VERSION, DEFAULT_SITE_URL, IgnoreTable, PersistedSettings, SettingsFile,
};
