//! Response DTOs for the cache server API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;
use serde_json::Value;

use crate::cache::CacheStats;

/// Response body for the GET operation (GET /get/:key)
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    /// The requested key
    pub key: String,
    /// The stored value
    pub value: Value,
}

impl GetResponse {
    /// Creates a new GetResponse
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Response body for the PUT operation (PUT /put)
///
/// Echoes the stored value, mirroring the library's pass-through contract.
#[derive(Debug, Clone, Serialize)]
pub struct PutResponse {
    /// The key that was stored
    pub key: String,
    /// The value as stored
    pub value: Value,
}

impl PutResponse {
    /// Creates a new PutResponse
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Response body for the DELETE operation (DELETE /del/:key)
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// The key that was targeted
    pub key: String,
    /// Number of entries removed (0 or 1)
    pub deleted: usize,
}

impl DeleteResponse {
    /// Creates a new DeleteResponse
    pub fn new(key: impl Into<String>, deleted: usize) -> Self {
        Self {
            key: key.into(),
            deleted,
        }
    }
}

/// Response body for the sweep endpoint (POST /sweep)
#[derive(Debug, Clone, Serialize)]
pub struct SweepResponse {
    /// Number of entries classified expired at scan time
    pub expired: usize,
}

/// Response body for the flush endpoint (POST /flush)
#[derive(Debug, Clone, Serialize)]
pub struct FlushResponse {
    /// Number of entries removed
    pub flushed: usize,
}

/// Response body for the expiry predicate (GET /expired/:key)
#[derive(Debug, Clone, Serialize)]
pub struct ExpiredResponse {
    /// The queried key
    pub key: String,
    /// Whether the key has expired (absent keys count as expired)
    pub expired: bool,
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Number of successful retrievals (fresh and stale combined)
    pub hits: u64,
    /// Subset of hits served past their deadline
    pub stale_hits: u64,
    /// Number of failed retrievals
    pub misses: u64,
    /// Number of refresh invocations issued
    pub refreshes: u64,
    /// Number of refresh invocations that reported an error
    pub refresh_failures: u64,
    /// Number of refresh-less entries reclaimed after expiry
    pub expirations: u64,
    /// Current number of entries in cache
    pub total_entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl StatsResponse {
    /// Creates a new StatsResponse from a stats snapshot
    pub fn new(stats: &CacheStats) -> Self {
        Self {
            hits: stats.hits,
            stale_hits: stats.stale_hits,
            misses: stats.misses,
            refreshes: stats.refreshes,
            refresh_failures: stats.refresh_failures,
            expirations: stats.expirations,
            total_entries: stats.total_entries,
            hit_rate: stats.hit_rate(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
