//! Refresh Callback Module
//!
//! Types for the per-entry background refresh mechanism. A refresh callback
//! recomputes the value for an expired key; its failure evicts the key.

use std::future::Future;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use serde_json::Value;

/// Outcome of one refresh invocation. `Ok` carries the replacement value,
/// `Err` evicts the entry.
pub type RefreshResult = anyhow::Result<Value>;

/// Boxed future produced by a refresh callback.
pub type RefreshFuture = BoxFuture<'static, RefreshResult>;

/// A caller-supplied asynchronous refresh callback.
///
/// The callback receives the cache key and resolves to the replacement value
/// or an error. It is shared (`Arc`) because the entry keeps it across
/// refresh cycles while spawned tasks hold their own handle to it.
pub type RefreshFn = Arc<dyn Fn(String) -> RefreshFuture + Send + Sync>;

// == Adapter ==
/// Lifts a plain async closure into a [`RefreshFn`].
///
/// # Example
/// ```
/// use serde_json::json;
/// use stale_cache::cache::refresh_fn;
///
/// let refresh = refresh_fn(|key: String| async move {
///     Ok(json!(format!("recomputed for {key}")))
/// });
/// ```
pub fn refresh_fn<F, Fut>(f: F) -> RefreshFn
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = RefreshResult> + Send + 'static,
{
    Arc::new(move |key| f(key).boxed())
}

// == Refresh Job ==
/// Everything a spawned refresh task needs to run one callback and post the
/// outcome back to the store.
///
/// The ttl and callback are captured at trigger time so a completion can
/// re-insert the entry even if the key was flushed or deleted while the
/// refresh was in flight.
#[derive(Clone)]
pub struct RefreshJob {
    /// Key being refreshed
    pub key: String,
    /// TTL the entry carried when the refresh was triggered
    pub ttl_ms: u64,
    /// The callback itself
    pub refresh: RefreshFn,
}
