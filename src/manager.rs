//! The refresh orchestrator and the surface exposed to hosts.
//!
//! # Refresh state machine
//!
//! ```text
//! Idle -> Fetching -> Applying -> Idle
//!                  \-> Failed  -> Idle
//! ```
//!
//! Entering `Fetching` clears the readiness flag. `Failed` leaves the data
//! untouched. `Applying` normalizes the feed, swaps the new snapshot in with
//! one write and saves it under the same lock, and only then sets the flag.
//! Both exits set the flag, so a host waiting on
//! [`BossModuleService::loaded`] is never stuck.
//!
//! Refreshes are never self-scheduled and never deduplicated: triggering a
//! second refresh while one is in flight starts an independent attempt, and
//! the last one to finish wins, in memory and on disk.

use crate::config::SettingsStore;
use crate::metrics::Metrics;
use crate::models::{CURRENT_SCHEMA_VERSION, PersistedSettings};
use crate::services::{FeedTransport, FetchError, HttpTransport, NormalizedFeed};
use crate::services::{fetch_modules, normalize_modules};
use crate::state::{CacheState, IgnoreSnapshot, RefreshEvent};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;
use tokio::runtime::Handle;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

/// The operations a host may call.
///
/// Read-only apart from [`refresh`](Self::refresh): the table cannot be
/// edited from outside.
pub trait BossModuleService: Send + Sync {
    /// Display names of the modules `module` ignores, or `None` if unknown.
    fn get_ignored_modules(&self, module: &str) -> Option<Vec<String>>;

    /// IDs of the modules `module` ignores, or `None` if unknown.
    fn get_ignored_module_ids(&self, module: &str) -> Option<Vec<String>>;

    /// Start a refresh in the background and return immediately.
    fn refresh(&self);

    /// Whether at least one refresh attempt has completed since the last
    /// one started.
    fn loaded(&self) -> bool;
}

/// How a refresh attempt ended
#[derive(Debug)]
pub enum RefreshOutcome {
    /// A new table with this many entries is being served
    Applied { modules: usize },

    /// The fetch failed; the previous data is still being served
    Failed(FetchError),
}

impl RefreshOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, RefreshOutcome::Applied { .. })
    }
}

struct ManagerInner<T> {
    store: SettingsStore,
    transport: T,
    state: CacheState,
    metrics: Metrics,
    runtime: Handle,

    /// Held across publish and save so the file always matches the
    /// snapshot being served
    persist_lock: Mutex<()>,
}

/// Keeps the ignore table in memory, refreshes it from the feed, and answers
/// lookups.
///
/// Cheap to clone; clones share the same cache.
pub struct BossModuleManager<T: FeedTransport = HttpTransport> {
    inner: Arc<ManagerInner<T>>,
}

impl<T: FeedTransport> BossModuleManager<T> {
    /// Load persisted settings and build the manager without refreshing.
    ///
    /// # Arguments
    /// * `store` - Codec for the persisted cache file
    /// * `transport` - Used for every feed request
    /// * `runtime` - Handle to the tokio runtime refresh tasks are spawned on
    pub fn new(store: SettingsStore, transport: T, runtime: Handle) -> Self {
        let settings = store.load();
        tracing::info!(
            "Loaded {} cached ignore lists, feed at {}",
            settings.ignore_table.len(),
            settings.site_url
        );

        Self {
            inner: Arc::new(ManagerInner {
                store,
                transport,
                state: CacheState::new(settings),
                metrics: Metrics::new(),
                runtime,
                persist_lock: Mutex::new(()),
            }),
        }
    }

    /// Load persisted settings and kick off the first refresh.
    pub fn start(store: SettingsStore, transport: T, runtime: Handle) -> Self {
        let manager = Self::new(store, transport, runtime);
        tracing::info!("Service is active");
        manager.spawn_refresh();
        manager
    }

    /// Start a refresh on the runtime.
    ///
    /// The readiness flag is cleared before this returns. The handle may be
    /// dropped; the refresh still runs to completion.
    pub fn spawn_refresh(&self) -> JoinHandle<RefreshOutcome> {
        self.begin_refresh();
        let this = self.clone();
        self.inner
            .runtime
            .spawn(async move { this.complete_refresh().await })
    }

    /// Run a refresh on the current task and wait for it.
    pub async fn refresh_now(&self) -> RefreshOutcome {
        self.begin_refresh();
        self.complete_refresh().await
    }

    fn begin_refresh(&self) {
        self.inner.state.mark_loading();
        self.inner.metrics.record_refresh_started();
        self.inner.state.emit(RefreshEvent::Started);
    }

    async fn complete_refresh(&self) -> RefreshOutcome {
        let started = Instant::now();
        let site_url = self.inner.state.read(|s| s.settings.site_url.clone());

        let modules = match fetch_modules(&self.inner.transport, &site_url).await {
            Ok(modules) => modules,
            Err(e) => {
                tracing::warn!("{}", e);
                self.inner.metrics.record_refresh_failed(started.elapsed());
                self.inner.state.emit(RefreshEvent::Failed {
                    reason: e.to_string(),
                });
                self.inner.state.mark_loaded();
                return RefreshOutcome::Failed(e);
            }
        };

        let NormalizedFeed {
            ignore_table,
            index,
        } = normalize_modules(&modules);

        tracing::info!("List successfully loaded: {} modules", ignore_table.len());
        for (id, ignored) in &ignore_table {
            tracing::debug!("{} => {}", id, ignored.join(", "));
        }

        let module_count = ignore_table.len();
        {
            let _persist = self
                .inner
                .persist_lock
                .lock()
                .unwrap_or_else(PoisonError::into_inner);

            let snapshot = self.inner.state.publish(IgnoreSnapshot {
                settings: PersistedSettings {
                    site_url,
                    ignore_table,
                    schema_version: CURRENT_SCHEMA_VERSION,
                },
                index,
            });

            // Small file, written inline on the worker
            self.inner.store.save(&snapshot.settings);
        }

        self.inner.metrics.record_refresh_applied(started.elapsed());
        self.inner.state.emit(RefreshEvent::Applied {
            modules: module_count,
        });
        self.inner.state.mark_loaded();

        RefreshOutcome::Applied {
            modules: module_count,
        }
    }

    /// Resolve `module` (display name or ID) and return its ignore list.
    pub fn ignored_modules(&self, module: &str, want_ids: bool) -> Option<Vec<String>> {
        let result = self
            .inner
            .state
            .snapshot()
            .resolve_ignore_list(module, want_ids);

        self.inner.metrics.record_lookup(result.is_some());
        if result.is_some() {
            tracing::debug!("Request for {}’s ignore list successful.", module);
        } else {
            tracing::info!("Request for {}’s ignore list failed.", module);
        }

        result
    }

    pub fn is_loaded(&self) -> bool {
        self.inner.state.is_loaded()
    }

    /// Resolve once the current (or next) refresh attempt has completed.
    pub async fn wait_until_loaded(&self) {
        self.inner.state.wait_until_loaded().await;
    }

    /// Current snapshot of settings and index.
    pub fn snapshot(&self) -> Arc<IgnoreSnapshot> {
        self.inner.state.snapshot()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RefreshEvent> {
        self.inner.state.subscribe()
    }

    pub fn metrics(&self) -> &Metrics {
        &self.inner.metrics
    }

    pub fn store(&self) -> &SettingsStore {
        &self.inner.store
    }
}

impl<T: FeedTransport> Clone for BossModuleManager<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: FeedTransport> BossModuleService for BossModuleManager<T> {
    fn get_ignored_modules(&self, module: &str) -> Option<Vec<String>> {
        self.ignored_modules(module, false)
    }

    fn get_ignored_module_ids(&self, module: &str) -> Option<Vec<String>> {
        self.ignored_modules(module, true)
    }

    fn refresh(&self) {
        self.spawn_refresh();
    }

    fn loaded(&self) -> bool {
        self.is_loaded()
    }
}
