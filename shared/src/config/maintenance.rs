//! Scheduled session maintenance configuration

use serde::{Deserialize, Serialize};

/// Controls the periodic sweep over persisted refresh tokens
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MaintenanceConfig {
    /// Whether the background sweep runs at all
    pub enabled: bool,

    /// How often to run the sweep (in seconds)
    pub interval_seconds: u64,

    /// Revoked rows older than this many days are deleted
    pub revoked_retention_days: i64,
}

impl Default for MaintenanceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_seconds: 86400, // daily
            revoked_retention_days: 30,
        }
    }
}

impl MaintenanceConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            enabled: std::env::var("SESSION_CLEANUP_ENABLED")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(defaults.enabled),
            interval_seconds: std::env::var("SESSION_CLEANUP_INTERVAL_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.interval_seconds),
            revoked_retention_days: std::env::var("SESSION_REVOKED_RETENTION_DAYS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.revoked_retention_days),
        }
    }
}
