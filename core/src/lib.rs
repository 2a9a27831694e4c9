//! # MiloKhelo Core
//!
//! Authentication core for the MiloKhelo backend: refresh-token rotation,
//! session management and stateless access tokens. Contains domain entities,
//! business services, repository interfaces and error types.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::{
    AccountEvent, IssuedSession, NewUser, RefreshTokenRecord, RevocationReason, UserIdentity,
    ValidatedSession,
};
pub use errors::{AuthError, DomainError, DomainResult, TokenError};
pub use repositories::{SessionRepository, UserDirectory};
pub use services::{AccessTokenIssuer, AuthService, SessionCleanupService, SessionManager};
