//! Services module - the refresh pipeline and lookups, free of any host code.
//!
//! # Components
//!
//! - [`fetcher`]: GETs the feed through a [`FeedTransport`] and extracts the
//!   `KtaneModules` array, classifying failures as [`FetchError`]s
//! - [`normalizer`]: turns the module array into an ID-keyed
//!   [`IgnoreTable`](crate::models::IgnoreTable) plus a
//!   [`NameIdIndex`](crate::models::NameIdIndex)
//! - [`lookup`]: answers "what does module X ignore", accepting display
//!   names in either apostrophe spelling or module IDs
//!
//! None of these keep state; [`crate::state::CacheState`] owns the data and
//! [`crate::manager::BossModuleManager`] sequences the calls.

pub mod fetcher;
pub mod lookup;
pub mod normalizer;

pub use fetcher::{
    FeedResponse, FeedTransport, FetchError, HttpTransport, TransportError, extract_modules,
    fetch_modules,
};
pub use lookup::{resolve_ignore_list, resolve_module_id, swap_apostrophes};
pub use normalizer::{NormalizedFeed, normalize_descriptors, normalize_modules};
