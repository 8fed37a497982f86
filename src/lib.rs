//! Stale Cache - A lightweight in-memory TTL cache
//!
//! Provides lazy expiration, opportunistic write-triggered sweeping and
//! optional stale-while-revalidate background refresh, with an embeddable
//! [`Cache`] handle and a small REST server around it.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::{refresh_fn, Cache, RefreshFn};
pub use config::Config;
