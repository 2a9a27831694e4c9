//! MySQL-specific database implementations
//!
//! This module contains MySQL implementations of repository traits
//! using SQLx for database operations.

pub mod session_repository_impl;
pub mod user_directory_impl;

// Re-export the MySQL implementations
pub use session_repository_impl::MySqlSessionRepository;
pub use user_directory_impl::MySqlUserDirectory;
