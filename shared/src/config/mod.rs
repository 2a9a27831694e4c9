//! Configuration module with business-specific sub-modules
//!
//! - `auth` - JWT secrets, token lifetimes and the refresh cookie
//! - `database` - Database connection and pool configuration
//! - `environment` - Environment detection and logging configuration
//! - `maintenance` - Scheduled session maintenance
//! - `server` - HTTP server configuration

pub mod auth;
pub mod database;
pub mod environment;
pub mod maintenance;
pub mod server;

use serde::{Deserialize, Serialize};

pub use auth::{AuthConfig, JwtConfig, SessionConfig};
pub use database::DatabaseConfig;
pub use environment::{Environment, LoggingConfig};
pub use maintenance::MaintenanceConfig;
pub use server::ServerConfig;

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub maintenance: MaintenanceConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::development()
    }
}

impl AppConfig {
    /// Create configuration for development environment
    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            auth: AuthConfig::default(),
            maintenance: MaintenanceConfig::default(),
            logging: LoggingConfig::for_environment(Environment::Development),
        }
    }

    /// Load configuration from environment variables
    ///
    /// Every section falls back to its development default when a variable
    /// is absent. In production the refresh cookie is always marked `Secure`.
    pub fn from_env() -> Self {
        let environment = Environment::from_env();
        let mut auth = AuthConfig::from_env();
        if environment.is_production() {
            auth.session.secure = true;
        }

        let config = Self {
            environment,
            server: ServerConfig::from_env(),
            database: DatabaseConfig::from_env(),
            auth,
            maintenance: MaintenanceConfig::from_env(),
            logging: LoggingConfig::from_env(environment),
        };
        config.warn_on_insecure_defaults();
        config
    }

    /// Log a warning for every development default still in use
    pub fn warn_on_insecure_defaults(&self) {
        if self.auth.jwt.is_using_default_secrets() {
            if self.environment.is_production() {
                tracing::error!("JWT secrets are still set to development defaults in production");
            } else {
                tracing::warn!("Using development JWT secrets; set JWT_ACCESS_SECRET and JWT_REFRESH_SECRET");
            }
        }
        if self.auth.jwt.access_secret == self.auth.jwt.refresh_secret {
            tracing::warn!("Access and refresh tokens share one signing secret");
        }
    }
}
