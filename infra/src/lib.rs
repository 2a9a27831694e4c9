//! # Infrastructure Layer
//!
//! This crate implements the infrastructure layer for the MiloKhelo backend.
//! It provides the MySQL implementations of the core's repository traits.
//!
//! ## Architecture
//!
//! - **Database**: connection pool, embedded migrations, and the MySQL
//!   session repository and user directory built on SQLx
//!
//! ## Features
//!
//! - `mysql`: Enable MySQL database support (default)

// Re-export core types for convenience
pub use mk_core::errors::*;

/// Database module - MySQL implementations using SQLx
#[cfg(feature = "mysql")]
pub mod database;

/// Configuration consumed by the infrastructure layer
pub mod config {
    pub use mk_shared::config::DatabaseConfig;
}

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration error
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
