//! Token services
//!
//! This module handles:
//! - Stateless access token issuing and verification
//! - Refresh session creation, validation, rotation and revocation
//! - Background sweeping of expired and old revoked sessions

mod cleanup;
mod config;
mod issuer;
mod service;

#[cfg(test)]
mod tests;

pub use cleanup::{CleanupResult, SessionCleanupConfig, SessionCleanupService};
pub use config::TokenServiceConfig;
pub use issuer::AccessTokenIssuer;
pub use service::SessionManager;
