//! Background Refresh Task
//!
//! Runs one refresh callback to completion and posts the outcome back to the
//! store: success replaces the value and resets the deadline, failure evicts
//! the key.

use std::sync::Arc;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::cache::{CacheStore, RefreshJob};

/// Spawns a fire-and-forget task executing `job`.
///
/// The caller (a stale read or a sweep) has already returned the stale value
/// by the time this runs; nobody awaits the handle. The write lock is only
/// taken once the callback has resolved, so a slow or hung refresh never
/// blocks the cache; it just leaves its entry stale-serving until it
/// resolves, if ever. No timeout is enforced and no retry is scheduled.
///
/// # Arguments
/// * `store` - shared store the outcome is posted back to
/// * `job` - key, ttl and callback captured when the entry was classified
///   stale
pub fn spawn_refresh(store: Arc<RwLock<CacheStore>>, job: RefreshJob) -> JoinHandle<()> {
    tokio::spawn(async move {
        let result = (job.refresh)(job.key.clone()).await;

        match result {
            Ok(new_value) => {
                let mut store = store.write().await;
                store.complete_refresh(&job, new_value);
                debug!(key = %job.key, "refresh completed");
            }
            Err(err) => {
                let mut store = store.write().await;
                store.fail_refresh(&job.key);
                warn!(key = %job.key, error = %err, "refresh failed, entry evicted");
            }
        }
    })
}
