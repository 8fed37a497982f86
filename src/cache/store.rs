//! Cache Store Module
//!
//! The synchronous core of the cache: a key/value map with lazy TTL
//! expiration, an opportunistic write-triggered sweep, and classification of
//! stale entries into refresh jobs for the async layer to run.

use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;

use crate::cache::entry::{current_timestamp_ms, CacheEntry};
use crate::cache::refresh::{RefreshFn, RefreshJob};
use crate::cache::CacheStats;

// == Lookup Outcome ==
/// Result of classifying a key during a read.
pub enum Lookup {
    /// Key absent, or expired with no refresh callback (already deleted)
    Miss,
    /// Key present and live
    Hit(Value),
    /// Key present but past its deadline with a refresh callback attached:
    /// the stale value is served immediately and `job` must be spawned by
    /// the caller once the map lock is released.
    Stale {
        /// The stale value to serve
        value: Value,
        /// The refresh to fire in the background
        job: RefreshJob,
    },
}

// == Cache Store ==
/// Key/value storage with TTL expiration and stale-while-revalidate
/// classification.
///
/// All methods are synchronous; the store never blocks, performs I/O, or
/// spawns tasks itself. Stale reads and sweeps hand back [`RefreshJob`]s for
/// the owner to execute.
#[derive(Debug)]
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// Deadline for the next opportunistic full sweep; advanced only as a
    /// side effect of `insert`
    next_sweep_at: u64,
    /// Activity counters
    stats: CacheStats,
    /// TTL in milliseconds applied when a write supplies none
    default_ttl_ms: u64,
    /// Interval in milliseconds between opportunistic sweeps
    sweep_interval_ms: u64,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a new CacheStore.
    ///
    /// # Arguments
    /// * `default_ttl_ms` - TTL applied when a write supplies none
    /// * `sweep_interval_ms` - minimum spacing between write-triggered sweeps
    pub fn new(default_ttl_ms: u64, sweep_interval_ms: u64) -> Self {
        Self {
            entries: HashMap::new(),
            next_sweep_at: current_timestamp_ms() + sweep_interval_ms,
            stats: CacheStats::new(),
            default_ttl_ms,
            sweep_interval_ms,
        }
    }

    // == Lookup ==
    /// Classifies a key for a read.
    ///
    /// - absent key: miss, no side effect
    /// - live entry: hit, value cloned out
    /// - expired entry with refresh: stale serve; the entry stays in place
    ///   and the returned job carries the refresh to fire
    /// - expired entry without refresh: deleted, miss
    ///
    /// Reads never trigger a sweep.
    pub fn lookup(&mut self, key: &str) -> Lookup {
        let Some(entry) = self.entries.get(key) else {
            self.stats.record_miss();
            return Lookup::Miss;
        };

        if !entry.is_expired() {
            self.stats.record_hit();
            return Lookup::Hit(entry.value.clone());
        }

        if let Some(refresh) = &entry.refresh {
            // Optimistic path: serve the stale value immediately and let the
            // caller revalidate in the background.
            let job = RefreshJob {
                key: key.to_string(),
                ttl_ms: entry.ttl_ms,
                refresh: refresh.clone(),
            };
            self.stats.record_stale_hit();
            self.stats.record_refresh();
            return Lookup::Stale {
                value: entry.value.clone(),
                job,
            };
        }

        // Expired and not refreshable: reclaim on touch.
        self.entries.remove(key);
        self.stats.record_expiration();
        self.stats.record_miss();
        self.stats.set_total_entries(self.entries.len());
        Lookup::Miss
    }

    // == Insert ==
    /// Stores a key-value pair, unconditionally replacing any existing entry
    /// and discarding its prior refresh state.
    ///
    /// A `ttl_ms` of `None` or `0` falls back to the store default. The
    /// deadline is always computed from now.
    ///
    /// Returns the stored value (pass-through, for cache-aside use) together
    /// with any refresh jobs produced by the opportunistic sweep: if the
    /// sweep deadline has passed, a full sweep runs before this method
    /// returns and the next sweep is scheduled one interval out.
    pub fn insert(
        &mut self,
        key: String,
        value: Value,
        ttl_ms: Option<u64>,
        refresh: Option<RefreshFn>,
    ) -> (Value, Vec<RefreshJob>) {
        let ttl_ms = match ttl_ms {
            Some(0) | None => self.default_ttl_ms,
            Some(ttl) => ttl,
        };

        let entry = CacheEntry::new(value.clone(), ttl_ms, refresh);
        self.entries.insert(key, entry);
        self.stats.set_total_entries(self.entries.len());

        let now = current_timestamp_ms();
        let jobs = if now > self.next_sweep_at {
            let (count, jobs) = self.sweep();
            self.next_sweep_at = now + self.sweep_interval_ms;
            debug!(expired = count, "opportunistic sweep ran on write");
            jobs
        } else {
            Vec::new()
        };

        (value, jobs)
    }

    // == Remove ==
    /// Removes an entry by key.
    ///
    /// Returns the number of entries removed (0 or 1). Idempotent.
    pub fn remove(&mut self, key: &str) -> usize {
        let count = usize::from(self.entries.remove(key).is_some());
        self.stats.set_total_entries(self.entries.len());
        count
    }

    // == Sweep ==
    /// Scans every entry and reclaims or revalidates the expired ones:
    /// entries with a refresh callback are classified into jobs (and stay in
    /// the map, still serving stale), the rest are deleted immediately.
    ///
    /// Returns the number of entries classified expired at scan time plus
    /// the refresh jobs. The count is taken at classification: an entry
    /// counted here may still exist afterwards if its refresh succeeds.
    ///
    /// Does not touch the sweep schedule; that bookkeeping lives in
    /// [`CacheStore::insert`].
    pub fn sweep(&mut self) -> (usize, Vec<RefreshJob>) {
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        let count = expired_keys.len();
        let mut jobs = Vec::new();

        for key in expired_keys {
            let (ttl_ms, refresh) = {
                let entry = &self.entries[&key];
                (entry.ttl_ms, entry.refresh.clone())
            };
            if let Some(refresh) = refresh {
                self.stats.record_refresh();
                jobs.push(RefreshJob {
                    key,
                    ttl_ms,
                    refresh,
                });
            } else {
                self.entries.remove(&key);
                self.stats.record_expiration();
            }
        }

        self.stats.set_total_entries(self.entries.len());
        (count, jobs)
    }

    // == Flush ==
    /// Deletes every entry unconditionally, live, expired and mid-refresh
    /// alike. Returns the prior entry count.
    ///
    /// In-flight refreshes are not cancelled; one that completes later will
    /// re-insert the key it was refreshing.
    pub fn flush(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        self.stats.set_total_entries(0);
        count
    }

    // == Is Expired ==
    /// Pure predicate: has this key expired? Absent keys count as expired.
    /// No side effects.
    pub fn is_expired(&self, key: &str) -> bool {
        match self.entries.get(key) {
            Some(entry) => entry.is_expired(),
            None => true,
        }
    }

    // == Refresh Completion ==
    /// Applies a successful refresh outcome.
    ///
    /// If the entry is still present its value is replaced and the deadline
    /// reset from now using the entry's own ttl. If it is gone (deleted or
    /// flushed while the refresh was in flight) it is re-inserted from the
    /// job captured at trigger time.
    pub fn complete_refresh(&mut self, job: &RefreshJob, new_value: Value) {
        match self.entries.get_mut(&job.key) {
            Some(entry) => {
                entry.value = new_value;
                entry.expires_at = current_timestamp_ms() + entry.ttl_ms;
            }
            None => {
                let entry =
                    CacheEntry::new(new_value, job.ttl_ms, Some(job.refresh.clone()));
                self.entries.insert(job.key.clone(), entry);
                self.stats.set_total_entries(self.entries.len());
            }
        }
    }

    /// Applies a failed refresh outcome: the entry is evicted, with no retry
    /// scheduled.
    pub fn fail_refresh(&mut self, key: &str) {
        self.entries.remove(key);
        self.stats.record_refresh_failure();
        self.stats.set_total_entries(self.entries.len());
    }

    // == Ttl Remaining ==
    /// Remaining TTL in milliseconds for a key, if present.
    pub fn ttl_remaining_ms(&self, key: &str) -> Option<u64> {
        self.entries.get(key).map(CacheEntry::ttl_remaining_ms)
    }

    // == Stats ==
    /// Returns a snapshot of the activity counters.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Length ==
    /// Returns the current number of entries, expired-but-unswept included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::refresh::refresh_fn;
    use crate::cache::{DEFAULT_TTL_MS, SWEEP_INTERVAL_MS};
    use serde_json::json;
    use std::thread::sleep;
    use std::time::Duration;

    fn test_store() -> CacheStore {
        CacheStore::new(DEFAULT_TTL_MS, SWEEP_INTERVAL_MS)
    }

    fn noop_refresh() -> RefreshFn {
        refresh_fn(|_key: String| async move { Ok(json!("refreshed")) })
    }

    #[test]
    fn test_store_new() {
        let store = test_store();
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_insert_and_lookup() {
        let mut store = test_store();

        store.insert("key1".to_string(), json!("value1"), None, None);

        match store.lookup("key1") {
            Lookup::Hit(value) => assert_eq!(value, json!("value1")),
            _ => panic!("expected a hit"),
        }
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_insert_returns_value() {
        let mut store = test_store();

        let (value, jobs) = store.insert("key1".to_string(), json!({"a": 1}), None, None);
        assert_eq!(value, json!({"a": 1}));
        assert!(jobs.is_empty());
    }

    #[test]
    fn test_store_lookup_missing() {
        let mut store = test_store();

        assert!(matches!(store.lookup("nonexistent"), Lookup::Miss));
    }

    #[test]
    fn test_store_falsy_values_are_storable() {
        let mut store = test_store();

        store.insert("zero".to_string(), json!(0), None, None);
        store.insert("null".to_string(), Value::Null, None, None);

        match store.lookup("zero") {
            Lookup::Hit(value) => assert_eq!(value, json!(0)),
            _ => panic!("expected a hit for zero"),
        }
        match store.lookup("null") {
            Lookup::Hit(value) => assert_eq!(value, Value::Null),
            _ => panic!("expected a hit for null"),
        }
    }

    #[test]
    fn test_store_default_ttl_applied() {
        let mut store = test_store();

        store.insert("implicit".to_string(), json!(1), None, None);
        store.insert("zero_ttl".to_string(), json!(2), Some(0), None);
        store.insert("explicit".to_string(), json!(3), Some(250), None);

        assert_eq!(store.entries["implicit"].ttl_ms, DEFAULT_TTL_MS);
        assert_eq!(store.entries["zero_ttl"].ttl_ms, DEFAULT_TTL_MS);
        assert_eq!(store.entries["explicit"].ttl_ms, 250);
    }

    #[test]
    fn test_store_overwrite_resets_entry() {
        let mut store = test_store();

        store.insert(
            "key1".to_string(),
            json!("value1"),
            Some(50),
            Some(noop_refresh()),
        );
        store.insert("key1".to_string(), json!("value2"), None, None);

        assert_eq!(store.len(), 1);
        let entry = &store.entries["key1"];
        assert_eq!(entry.value, json!("value2"));
        assert_eq!(entry.ttl_ms, DEFAULT_TTL_MS);
        assert!(entry.refresh.is_none(), "overwrite discards refresh state");
    }

    #[test]
    fn test_store_remove() {
        let mut store = test_store();

        store.insert("key1".to_string(), json!("value1"), None, None);

        assert_eq!(store.remove("key1"), 1);
        assert_eq!(store.remove("key1"), 0);
        assert_eq!(store.remove("never_put"), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_expired_entry_deleted_on_lookup() {
        let mut store = test_store();

        store.insert("key1".to_string(), json!("value1"), Some(20), None);

        sleep(Duration::from_millis(30));

        assert!(matches!(store.lookup("key1"), Lookup::Miss));
        assert!(store.is_empty(), "expired refresh-less entry is reclaimed");

        // Exactly-once expiry: a later sweep finds nothing left to count.
        let (count, jobs) = store.sweep();
        assert_eq!(count, 0);
        assert!(jobs.is_empty());
    }

    #[test]
    fn test_store_stale_lookup_serves_old_value() {
        let mut store = test_store();

        store.insert(
            "key1".to_string(),
            json!("stale_value"),
            Some(20),
            Some(noop_refresh()),
        );

        sleep(Duration::from_millis(30));

        match store.lookup("key1") {
            Lookup::Stale { value, job } => {
                assert_eq!(value, json!("stale_value"));
                assert_eq!(job.key, "key1");
                assert_eq!(job.ttl_ms, 20);
            }
            _ => panic!("expected a stale serve"),
        }
        // The entry survives the stale read; only the refresh outcome
        // decides its fate.
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_is_expired_predicate() {
        let mut store = test_store();

        assert!(store.is_expired("never_put"));

        store.insert("live".to_string(), json!(1), Some(60_000), None);
        store.insert("short".to_string(), json!(2), Some(20), None);

        assert!(!store.is_expired("live"));

        sleep(Duration::from_millis(30));

        assert!(store.is_expired("short"));
        // Pure predicate: the expired entry was not reclaimed.
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_store_sweep_classifies_and_reclaims() {
        let mut store = test_store();

        store.insert("plain_expired".to_string(), json!(1), Some(20), None);
        store.insert(
            "refreshable_expired".to_string(),
            json!(2),
            Some(20),
            Some(noop_refresh()),
        );
        store.insert("live".to_string(), json!(3), Some(60_000), None);

        sleep(Duration::from_millis(30));

        let (count, jobs) = store.sweep();

        // Both expired entries are counted at classification time.
        assert_eq!(count, 2);
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].key, "refreshable_expired");

        // The refreshable entry stays; the plain one is gone.
        assert_eq!(store.len(), 2);
        assert!(store.entries.contains_key("refreshable_expired"));
        assert!(store.entries.contains_key("live"));
    }

    #[test]
    fn test_store_insert_triggers_due_sweep() {
        let mut store = CacheStore::new(DEFAULT_TTL_MS, 20);

        store.insert("old".to_string(), json!(1), Some(20), None);
        assert_eq!(store.len(), 1);

        // Pass both the entry ttl and the sweep deadline.
        sleep(Duration::from_millis(40));

        let (_, jobs) = store.insert("new".to_string(), json!(2), None, None);
        assert!(jobs.is_empty());
        assert_eq!(store.len(), 1, "the due sweep reclaimed the old entry");
        assert!(store.entries.contains_key("new"));
    }

    #[test]
    fn test_store_flush() {
        let mut store = test_store();

        store.insert("live".to_string(), json!(1), Some(60_000), None);
        store.insert("expired".to_string(), json!(2), Some(20), None);
        store.insert(
            "refreshable".to_string(),
            json!(3),
            Some(20),
            Some(noop_refresh()),
        );

        sleep(Duration::from_millis(30));

        // Expired-but-unswept entries count towards the flush total.
        assert_eq!(store.flush(), 3);
        assert!(store.is_empty());
        assert_eq!(store.flush(), 0);
    }

    #[test]
    fn test_store_complete_refresh_updates_live_entry() {
        let mut store = test_store();

        store.insert(
            "key1".to_string(),
            json!("old"),
            Some(40),
            Some(noop_refresh()),
        );
        let job = RefreshJob {
            key: "key1".to_string(),
            ttl_ms: 40,
            refresh: noop_refresh(),
        };

        sleep(Duration::from_millis(50));
        assert!(store.is_expired("key1"));

        store.complete_refresh(&job, json!("new"));

        // Deadline reset from now using the entry's own ttl.
        assert!(!store.is_expired("key1"));
        match store.lookup("key1") {
            Lookup::Hit(value) => assert_eq!(value, json!("new")),
            _ => panic!("expected a hit after refresh"),
        }
    }

    #[test]
    fn test_store_complete_refresh_resurrects_flushed_key() {
        let mut store = test_store();

        let job = RefreshJob {
            key: "gone".to_string(),
            ttl_ms: 60_000,
            refresh: noop_refresh(),
        };

        // The key was flushed while the refresh was in flight; completion is
        // a direct map write and re-inserts it.
        store.complete_refresh(&job, json!("revived"));

        assert_eq!(store.len(), 1);
        match store.lookup("gone") {
            Lookup::Hit(value) => assert_eq!(value, json!("revived")),
            _ => panic!("expected the resurrected entry"),
        }
    }

    #[test]
    fn test_store_fail_refresh_evicts() {
        let mut store = test_store();

        store.insert(
            "key1".to_string(),
            json!("old"),
            Some(60_000),
            Some(noop_refresh()),
        );

        store.fail_refresh("key1");

        assert!(store.is_empty());
        assert_eq!(store.stats().refresh_failures, 1);
    }

    #[test]
    fn test_store_stats_tracking() {
        let mut store = test_store();

        store.insert("key1".to_string(), json!(1), None, None);
        let _ = store.lookup("key1"); // hit
        let _ = store.lookup("missing"); // miss

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.total_entries, 1);

        store.insert(
            "stale".to_string(),
            json!(2),
            Some(20),
            Some(noop_refresh()),
        );
        sleep(Duration::from_millis(30));
        let _ = store.lookup("stale"); // stale serve + refresh issued

        let stats = store.stats();
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.stale_hits, 1);
        assert_eq!(stats.refreshes, 1);
    }

    #[test]
    fn test_store_ttl_remaining() {
        let mut store = test_store();

        assert!(store.ttl_remaining_ms("missing").is_none());

        store.insert("key1".to_string(), json!(1), Some(60_000), None);
        let remaining = store.ttl_remaining_ms("key1").unwrap();
        assert!(remaining <= 60_000);
        assert!(remaining >= 59_000);
    }
}
