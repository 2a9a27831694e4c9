//! Authentication service module
//!
//! Orchestrates the account lifecycle on top of the user directory, the
//! access token issuer and the refresh session manager:
//! - Registration and login
//! - Refresh with compromise detection
//! - Logout, logout everywhere and selective session revocation

mod config;
mod service;


pub use config::AuthServiceConfig;
pub use service::{AuthOutcome, AuthService, RefreshOutcome};
