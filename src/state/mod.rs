// State management module
//
// This module provides the CacheState which owns the ignore data shared between
// lookups and refreshes, the readiness flag, and the refresh event channel.

use crate::models::{NameIdIndex, PersistedSettings};
use crate::services::lookup;
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::{broadcast, watch};

/// Everything a lookup needs, published as one immutable unit.
///
/// A refresh builds a complete new snapshot and swaps it in; lookups holding
/// the previous `Arc` keep a consistent view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreSnapshot {
    pub settings: PersistedSettings,
    pub index: NameIdIndex,
}

impl IgnoreSnapshot {
    /// Snapshot for freshly loaded settings; no feed has been seen yet.
    pub fn from_settings(settings: PersistedSettings) -> Self {
        Self {
            settings,
            index: NameIdIndex::new(),
        }
    }

    pub fn resolve_ignore_list(&self, identifier: &str, want_ids: bool) -> Option<Vec<String>> {
        lookup::resolve_ignore_list(&self.settings.ignore_table, &self.index, identifier, want_ids)
    }
}

/// Events emitted as refresh attempts progress
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RefreshEvent {
    /// A fetch has been issued; the readiness flag is cleared
    Started,

    /// A new table has been swapped in
    Applied { modules: usize },

    /// The attempt ended without touching the data
    Failed { reason: String },
}

/// Shared, exclusively-mutated cache state
///
/// - The current [`IgnoreSnapshot`] behind `RwLock<Arc<_>>`; publishing
///   replaces the `Arc` in a single write, so readers see either the old or
///   the new snapshot, never a mix
/// - The readiness flag as a `watch` channel, so callers can poll it or await it
/// - A `broadcast` channel of [`RefreshEvent`]s
///
/// Only [`crate::manager::BossModuleManager`] publishes snapshots or flips
/// the flag.
pub struct CacheState {
    snapshot: Arc<RwLock<Arc<IgnoreSnapshot>>>,

    loaded_tx: Arc<watch::Sender<bool>>,

    /// Multiple subscribers can listen for refresh events
    event_tx: broadcast::Sender<RefreshEvent>,
}

impl CacheState {
    /// Create state around loaded settings, not yet marked loaded
    ///
    /// # Returns
    /// A new CacheState with a broadcast channel buffer of 100 events
    pub fn new(settings: PersistedSettings) -> Self {
        let (event_tx, _) = broadcast::channel(100);
        let (loaded_tx, _) = watch::channel(false);
        Self {
            snapshot: Arc::new(RwLock::new(Arc::new(IgnoreSnapshot::from_settings(settings)))),
            loaded_tx: Arc::new(loaded_tx),
            event_tx,
        }
    }

    /// Current snapshot. Cheap: clones the `Arc`, not the data.
    pub fn snapshot(&self) -> Arc<IgnoreSnapshot> {
        let guard = self.snapshot.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Execute a function against the current snapshot
    ///
    /// # Example
    /// ```ignore
    /// let url = cache_state.read(|snapshot| snapshot.settings.site_url.clone());
    /// ```
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&IgnoreSnapshot) -> R,
    {
        f(&self.snapshot())
    }

    /// Replace the current snapshot in one step
    ///
    /// # Returns
    /// The snapshot now being served
    pub fn publish(&self, snapshot: IgnoreSnapshot) -> Arc<IgnoreSnapshot> {
        let next = Arc::new(snapshot);
        let mut guard = self.snapshot.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::clone(&next);
        next
    }

    pub fn is_loaded(&self) -> bool {
        *self.loaded_tx.borrow()
    }

    pub fn mark_loading(&self) {
        self.loaded_tx.send_replace(false);
    }

    pub fn mark_loaded(&self) {
        self.loaded_tx.send_replace(true);
    }

    /// Resolve once the readiness flag is set (immediately if it already is)
    pub async fn wait_until_loaded(&self) {
        let mut rx = self.loaded_tx.subscribe();
        // The sender lives as long as self, so this only returns once loaded
        let _ = rx.wait_for(|loaded| *loaded).await;
    }

    /// Subscribe to refresh events
    ///
    /// Returns a receiver that will get notified of all future events.
    pub fn subscribe(&self) -> broadcast::Receiver<RefreshEvent> {
        self.event_tx.subscribe()
    }

    pub fn emit(&self, event: RefreshEvent) {
        // Ignore send errors - it's OK if no one is listening
        let _ = self.event_tx.send(event);
    }
}

impl Default for CacheState {
    fn default() -> Self {
        Self::new(PersistedSettings::default())
    }
}

// Make CacheState cloneable for sharing with refresh tasks
impl Clone for CacheState {
    fn clone(&self) -> Self {
        Self {
            snapshot: Arc::clone(&self.snapshot),
            loaded_tx: Arc::clone(&self.loaded_tx),
            event_tx: self.event_tx.clone(),
        }
    }
}
