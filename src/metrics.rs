// Refresh and lookup metrics
//
// Lightweight counters for monitoring how the cache is being used

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Service metrics
///
/// Uses atomic operations for thread-safe metric tracking without locks.
/// Refresh tasks and lookup callers record into the same instance.
#[derive(Debug)]
pub struct Metrics {
    /// Refresh attempts issued
    pub refreshes_started: AtomicU64,

    /// Refreshes that swapped in a new table
    pub refreshes_applied: AtomicU64,

    /// Refreshes that ended on a fetch error
    pub refreshes_failed: AtomicU64,

    /// Total time spent in completed refreshes, in milliseconds
    pub total_refresh_time_ms: AtomicU64,

    pub lookup_hits: AtomicU64,

    pub lookup_misses: AtomicU64,

    start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            refreshes_started: AtomicU64::new(0),
            refreshes_applied: AtomicU64::new(0),
            refreshes_failed: AtomicU64::new(0),
            total_refresh_time_ms: AtomicU64::new(0),
            lookup_hits: AtomicU64::new(0),
            lookup_misses: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn record_refresh_started(&self) {
        self.refreshes_started.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_refresh_applied(&self, duration: Duration) {
        self.refreshes_applied.fetch_add(1, Ordering::Relaxed);
        self.record_refresh_time(duration);
    }

    pub fn record_refresh_failed(&self, duration: Duration) {
        self.refreshes_failed.fetch_add(1, Ordering::Relaxed);
        self.record_refresh_time(duration);
    }

    fn record_refresh_time(&self, duration: Duration) {
        self.total_refresh_time_ms
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    /// Record the outcome of one lookup
    pub fn record_lookup(&self, hit: bool) {
        if hit {
            self.lookup_hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.lookup_misses.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Average duration of a completed refresh in milliseconds
    pub fn avg_refresh_time_ms(&self) -> f64 {
        let total = self.total_refresh_time_ms.load(Ordering::Relaxed);
        let count = self.refreshes_applied.load(Ordering::Relaxed)
            + self.refreshes_failed.load(Ordering::Relaxed);
        if count > 0 {
            total as f64 / count as f64
        } else {
            0.0
        }
    }

    /// Log metrics summary
    pub fn log_summary(&self) {
        tracing::info!("=== Boss Module Manager Metrics ===");
        tracing::info!("Uptime: {:.2}s", self.uptime().as_secs_f64());
        tracing::info!(
            "Refreshes: {} started, {} applied, {} failed (avg: {:.2}ms)",
            self.refreshes_started.load(Ordering::Relaxed),
            self.refreshes_applied.load(Ordering::Relaxed),
            self.refreshes_failed.load(Ordering::Relaxed),
            self.avg_refresh_time_ms()
        );
        tracing::info!(
            "Lookups: {} hits, {} misses",
            self.lookup_hits.load(Ordering::Relaxed),
            self.lookup_misses.load(Ordering::Relaxed)
        );
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
