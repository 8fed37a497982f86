//! Cache Statistics Module
//!
//! Tracks cache activity: hits, stale serves, misses, refresh outcomes and
//! expirations. Counters are best-effort observability, not part of the
//! cache contract.

use serde::Serialize;

// == Cache Stats ==
/// Tracks cache activity counters.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Number of successful retrievals (fresh and stale serves combined)
    pub hits: u64,
    /// Subset of hits served past their deadline while a refresh was fired
    pub stale_hits: u64,
    /// Number of failed retrievals (key absent or expired without refresh)
    pub misses: u64,
    /// Number of refresh invocations issued
    pub refreshes: u64,
    /// Number of refresh invocations that reported an error (each one evicts
    /// its entry)
    pub refresh_failures: u64,
    /// Number of refresh-less entries reclaimed after expiry
    pub expirations: u64,
    /// Current number of entries in the cache
    pub total_entries: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Increments the hit counter.
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    /// Records a stale serve: counted as a hit, tracked separately.
    pub fn record_stale_hit(&mut self) {
        self.hits += 1;
        self.stale_hits += 1;
    }

    /// Increments the miss counter.
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    /// Increments the refresh-invocation counter.
    pub fn record_refresh(&mut self) {
        self.refreshes += 1;
    }

    /// Increments the refresh-failure counter.
    pub fn record_refresh_failure(&mut self) {
        self.refresh_failures += 1;
    }

    /// Increments the expiration counter.
    pub fn record_expiration(&mut self) {
        self.expirations += 1;
    }

    /// Updates the total entries count.
    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}
