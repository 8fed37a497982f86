//! API Handlers
//!
//! HTTP request handlers for each cache server endpoint.
//!
//! Refresh callbacks are an in-process, library-level feature; the HTTP
//! surface covers plain TTL entries, for which expiry means deletion.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::cache::Cache;
use crate::error::{CacheError, Result};
use crate::models::{
    DeleteResponse, ExpiredResponse, FlushResponse, GetResponse, HealthResponse,
    PutRequest, PutResponse, StatsResponse, SweepResponse,
};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Shared cache handle
    pub cache: Cache,
}

impl AppState {
    /// Creates a new AppState with the given cache handle.
    pub fn new(cache: Cache) -> Self {
        Self { cache }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self::new(Cache::new(config.default_ttl_ms, config.sweep_interval_ms))
    }
}

/// Handler for PUT /put
///
/// Stores a key-value pair with optional TTL and echoes the stored value.
pub async fn put_handler(
    State(state): State<AppState>,
    Json(req): Json<PutRequest>,
) -> Result<Json<PutResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let value = state.cache.put(req.key.clone(), req.value, req.ttl_ms, None).await;

    Ok(Json(PutResponse::new(req.key, value)))
}

/// Handler for GET /get/:key
///
/// Retrieves a value from the cache by key; absent or expired keys are 404.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    match state.cache.get(&key).await {
        Some(value) => Ok(Json(GetResponse::new(key, value))),
        None => Err(CacheError::NotFound(key)),
    }
}

/// Handler for DELETE /del/:key
///
/// Deletes a key. Idempotent: deleting a missing key succeeds with a count
/// of zero.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<DeleteResponse> {
    let deleted = state.cache.del(&key).await;

    Json(DeleteResponse::new(key, deleted))
}

/// Handler for POST /sweep
///
/// Runs a full sweep now and reports how many entries were classified
/// expired.
pub async fn sweep_handler(State(state): State<AppState>) -> Json<SweepResponse> {
    let expired = state.cache.del_expired().await;

    Json(SweepResponse { expired })
}

/// Handler for POST /flush
pub async fn flush_handler(State(state): State<AppState>) -> Json<FlushResponse> {
    let flushed = state.cache.flush().await;

    Json(FlushResponse { flushed })
}

/// Handler for GET /expired/:key
pub async fn expired_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<ExpiredResponse> {
    let expired = state.cache.expired(&key).await;

    Json(ExpiredResponse { key, expired })
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.cache.stats().await;

    Json(StatsResponse::new(&stats))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
