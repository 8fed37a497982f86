//! Cache Handle Module
//!
//! The shared, cloneable face of the cache. A [`Cache`] owns the store
//! behind an `Arc<RwLock<_>>`; every mutation of the entry map happens under
//! the write lock, and refresh callbacks surfaced by a read or a sweep are
//! spawned as fire-and-forget tasks once the lock is released.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;

use crate::cache::store::{CacheStore, Lookup};
use crate::cache::{CacheStats, RefreshFn, DEFAULT_TTL_MS, SWEEP_INTERVAL_MS};
use crate::tasks::spawn_refresh;

// == Cache ==
/// Shared handle to a TTL cache with stale-while-revalidate refresh.
///
/// Cloning is cheap and every clone operates on the same underlying store.
/// Construct one per process (or per test) rather than sharing module-level
/// state.
#[derive(Clone, Debug)]
pub struct Cache {
    store: Arc<RwLock<CacheStore>>,
}

impl Cache {
    // == Constructor ==
    /// Creates a cache with the given default TTL and sweep interval, both
    /// in milliseconds.
    pub fn new(default_ttl_ms: u64, sweep_interval_ms: u64) -> Self {
        Self {
            store: Arc::new(RwLock::new(CacheStore::new(
                default_ttl_ms,
                sweep_interval_ms,
            ))),
        }
    }

    // == Get ==
    /// Retrieves the value for `key`, if it has not expired.
    ///
    /// An expired entry with a refresh callback is served as-is: the stale
    /// value comes back immediately while the refresh runs in the
    /// background. Callers never block on a refresh and may receive a value
    /// that is out of date by up to the time the refresh takes to complete.
    /// An expired entry without a refresh callback is deleted and `None` is
    /// returned.
    ///
    /// Concurrent reads of the same stale key each fire their own refresh;
    /// nothing deduplicates invocations in flight.
    pub async fn get(&self, key: &str) -> Option<Value> {
        let outcome = self.store.write().await.lookup(key);

        match outcome {
            Lookup::Miss => None,
            Lookup::Hit(value) => Some(value),
            Lookup::Stale { value, job } => {
                spawn_refresh(Arc::clone(&self.store), job);
                Some(value)
            }
        }
    }

    // == Put ==
    /// Stores `value` under `key`, replacing any existing entry and its
    /// refresh state. Returns the stored value, so a computation can be
    /// cached and used in one expression.
    ///
    /// A `ttl_ms` of `None` or `0` falls back to the cache default. If the
    /// opportunistic sweep deadline has passed, a full sweep runs before
    /// this call returns.
    pub async fn put(
        &self,
        key: impl Into<String>,
        value: Value,
        ttl_ms: Option<u64>,
        refresh: Option<RefreshFn>,
    ) -> Value {
        let (stored, jobs) = self
            .store
            .write()
            .await
            .insert(key.into(), value, ttl_ms, refresh);

        for job in jobs {
            spawn_refresh(Arc::clone(&self.store), job);
        }

        stored
    }

    // == Del ==
    /// Removes `key`. Returns the number of entries removed (0 or 1).
    /// Idempotent.
    pub async fn del(&self, key: &str) -> usize {
        self.store.write().await.remove(key)
    }

    // == Del Expired ==
    /// Sweeps the whole cache now: expired entries with a refresh callback
    /// are revalidated in the background, the rest are deleted. Returns the
    /// number of entries classified expired at scan time.
    pub async fn del_expired(&self) -> usize {
        let (count, jobs) = self.store.write().await.sweep();

        for job in jobs {
            spawn_refresh(Arc::clone(&self.store), job);
        }

        count
    }

    // == Flush ==
    /// Deletes every entry unconditionally and returns the prior count.
    pub async fn flush(&self) -> usize {
        self.store.write().await.flush()
    }

    // == Expired ==
    /// Pure predicate: has `key` expired? Absent keys count as expired.
    pub async fn expired(&self, key: &str) -> bool {
        self.store.read().await.is_expired(key)
    }

    // == Ttl Remaining ==
    /// Remaining TTL in milliseconds for `key`, if present.
    pub async fn ttl_remaining_ms(&self, key: &str) -> Option<u64> {
        self.store.read().await.ttl_remaining_ms(key)
    }

    // == Stats ==
    /// Returns a snapshot of the activity counters.
    pub async fn stats(&self) -> CacheStats {
        self.store.read().await.stats()
    }

    // == Length ==
    /// Returns the current number of entries, expired-but-unswept included.
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    /// Returns true if the cache is empty.
    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }
}

impl Default for Cache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL_MS, SWEEP_INTERVAL_MS)
    }
}
