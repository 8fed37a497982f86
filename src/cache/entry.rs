//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL and optional
//! background refresh support.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::Value;

use crate::cache::refresh::RefreshFn;

// == Cache Entry ==
/// Represents a single cache entry with value and expiry metadata.
///
/// Entries are owned exclusively by the store; readers always receive a clone
/// of the value, never a reference into the map.
#[derive(Clone)]
pub struct CacheEntry {
    /// The stored value
    pub value: Value,
    /// Expiration timestamp (Unix milliseconds)
    pub expires_at: u64,
    /// TTL in milliseconds, reused to compute the next deadline after a
    /// successful refresh
    pub ttl_ms: u64,
    /// Optional refresh callback invoked when the entry is read or swept
    /// past its deadline. Absence means expire = delete.
    pub refresh: Option<RefreshFn>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry expiring `ttl_ms` milliseconds from now.
    pub fn new(value: Value, ttl_ms: u64, refresh: Option<RefreshFn>) -> Self {
        Self {
            value,
            expires_at: current_timestamp_ms() + ttl_ms,
            ttl_ms,
            refresh,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// Boundary condition: an entry is expired only when the current time is
    /// strictly greater than the deadline. An entry observed exactly at
    /// `expires_at` is still live.
    pub fn is_expired(&self) -> bool {
        current_timestamp_ms() > self.expires_at
    }

    // == Time To Live ==
    /// Returns remaining TTL in milliseconds.
    ///
    /// # Returns
    /// - `0` if the deadline has passed
    /// - the remaining milliseconds otherwise
    pub fn ttl_remaining_ms(&self) -> u64 {
        self.expires_at.saturating_sub(current_timestamp_ms())
    }
}

impl fmt::Debug for CacheEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheEntry")
            .field("value", &self.value)
            .field("expires_at", &self.expires_at)
            .field("ttl_ms", &self.ttl_ms)
            .field("refresh", &self.refresh.is_some())
            .finish()
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}
