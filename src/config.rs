//! Configuration Module
//!
//! Handles loading and managing server configuration from environment
//! variables.

use std::env;

use crate::cache::{DEFAULT_TTL_MS, SWEEP_INTERVAL_MS};

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible
/// defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// TTL in milliseconds applied to writes that supply none
    pub default_ttl_ms: u64,
    /// Minimum spacing in milliseconds between write-triggered sweeps
    pub sweep_interval_ms: u64,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `DEFAULT_TTL_MS` - fallback TTL in milliseconds (default: 3600000)
    /// - `SWEEP_INTERVAL_MS` - sweep spacing in milliseconds (default: 14400000)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Self {
        Self {
            default_ttl_ms: env::var("DEFAULT_TTL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TTL_MS),
            sweep_interval_ms: env::var("SWEEP_INTERVAL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(SWEEP_INTERVAL_MS),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_ttl_ms: DEFAULT_TTL_MS,
            sweep_interval_ms: SWEEP_INTERVAL_MS,
            server_port: 3000,
        }
    }
}
