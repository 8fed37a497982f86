//! Cache Module
//!
//! Provides in-memory caching with lazy TTL expiration, write-triggered
//! opportunistic sweeping and optional stale-while-revalidate refresh.

mod entry;
mod handle;
mod refresh;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use handle::Cache;
pub use refresh::{refresh_fn, RefreshFn, RefreshFuture, RefreshJob, RefreshResult};
pub use stats::CacheStats;
pub use store::{CacheStore, Lookup};

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// TTL in milliseconds applied when a write supplies none (1 hour)
pub const DEFAULT_TTL_MS: u64 = 3_600_000;

/// Minimum spacing in milliseconds between write-triggered sweeps (4 hours)
pub const SWEEP_INTERVAL_MS: u64 = 14_400_000;
