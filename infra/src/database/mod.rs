//! Database module - MySQL implementations using SQLx
//!
//! This module provides:
//! - Connection pool management and embedded migrations
//! - Mapping of SQLx errors onto domain errors
//! - MySQL implementations of the core repository traits

pub mod connection;
pub mod error;
pub mod mysql;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use connection::{DatabasePool, PoolStatistics};
pub use error::map_sqlx_error;
pub use mysql::{MySqlSessionRepository, MySqlUserDirectory};
