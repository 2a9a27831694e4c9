//! Periodic maintenance of refresh-token records
//!
//! Each cycle sweeps expired sessions into the revoked state and then deletes
//! revoked rows older than the retention window.

use std::sync::Arc;

use chrono::{Duration, Utc};
use mk_shared::MaintenanceConfig;
use tracing::{error, info, warn};

use crate::errors::DomainError;
use crate::repositories::SessionRepository;

use super::service::SessionManager;

/// Configuration for the session cleanup service
#[derive(Debug, Clone)]
pub struct SessionCleanupConfig {
    /// How often to run cleanup (in seconds)
    pub interval_seconds: u64,
    /// How long revoked rows are kept (in days)
    pub revoked_retention_days: i64,
    /// Whether to enable automatic cleanup
    pub enabled: bool,
}

impl Default for SessionCleanupConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 24 * 3600,
            revoked_retention_days: 30,
            enabled: true,
        }
    }
}

impl From<&MaintenanceConfig> for SessionCleanupConfig {
    fn from(config: &MaintenanceConfig) -> Self {
        Self {
            interval_seconds: config.interval_seconds,
            revoked_retention_days: config.revoked_retention_days,
            enabled: config.enabled,
        }
    }
}

/// Service that runs the expiry sweep on a timer
pub struct SessionCleanupService<R: SessionRepository + 'static> {
    sessions: Arc<SessionManager<R>>,
    config: SessionCleanupConfig,
}

impl<R: SessionRepository> SessionCleanupService<R> {
    pub fn new(sessions: Arc<SessionManager<R>>, config: SessionCleanupConfig) -> Self {
        Self { sessions, config }
    }

    /// Run a single cleanup cycle
    ///
    /// A failing step is recorded in the result and does not stop later steps.
    pub async fn run_cleanup(&self) -> Result<CleanupResult, DomainError> {
        if !self.config.enabled {
            return Ok(CleanupResult::default());
        }

        info!("Starting session cleanup cycle");

        let mut result = CleanupResult::default();

        match self.sessions.purge_expired().await {
            Ok(count) => result.expired_sessions_revoked = count,
            Err(e) => {
                error!("Failed to sweep expired sessions: {}", e);
                result.errors.push(format!("Expiry sweep error: {}", e));
            }
        }

        let cutoff = Utc::now() - Duration::days(self.config.revoked_retention_days);
        match self.sessions.purge_revoked_before(cutoff).await {
            Ok(count) => result.revoked_sessions_deleted = count,
            Err(e) => {
                error!("Failed to delete old revoked sessions: {}", e);
                result
                    .errors
                    .push(format!("Revoked session cleanup error: {}", e));
            }
        }

        info!(
            "Session cleanup completed - Expired: {}, Deleted: {}",
            result.expired_sessions_revoked, result.revoked_sessions_deleted
        );

        Ok(result)
    }

    /// Start the cleanup service as a background task
    pub fn start_background_task(self: Arc<Self>) -> Option<tokio::task::JoinHandle<()>> {
        if !self.config.enabled {
            warn!("Session cleanup service is disabled");
            return None;
        }

        let interval = std::time::Duration::from_secs(self.config.interval_seconds.max(1));

        Some(tokio::spawn(async move {
            info!(
                "Session cleanup service started - will run every {} seconds",
                self.config.interval_seconds
            );

            let mut interval_timer = tokio::time::interval(interval);

            loop {
                interval_timer.tick().await;

                match self.run_cleanup().await {
                    Ok(result) => {
                        if !result.errors.is_empty() {
                            warn!("Cleanup completed with errors: {:?}", result.errors);
                        }
                    }
                    Err(e) => {
                        error!("Session cleanup cycle failed: {}", e);
                    }
                }
            }
        }))
    }
}

/// Result of a cleanup cycle
#[derive(Debug, Default)]
pub struct CleanupResult {
    /// Number of expired sessions marked revoked
    pub expired_sessions_revoked: u64,
    /// Number of old revoked rows deleted
    pub revoked_sessions_deleted: u64,
    /// Any errors encountered during cleanup
    pub errors: Vec<String>,
}

impl CleanupResult {
    /// Check if the cleanup was successful (no errors)
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn total_cleaned(&self) -> u64 {
        self.expired_sessions_revoked + self.revoked_sessions_deleted
    }
}
