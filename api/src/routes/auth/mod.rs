//! Authentication route handlers
//!
//! - Registration and login
//! - Refresh-token rotation
//! - Logout of one or all sessions
//! - Session listing and selective revocation
//! - Profile of the authenticated user

pub mod cookie;
pub mod login;
pub mod logout;
pub mod me;
pub mod refresh;
pub mod register;
pub mod sessions;

use std::sync::Arc;

use mk_core::repositories::{SessionRepository, UserDirectory};
use mk_core::services::{AccessTokenIssuer, AuthService};

pub use cookie::RefreshCookie;

/// Shared state of the authentication routes
pub struct AppState<U, R>
where
    U: UserDirectory,
    R: SessionRepository,
{
    pub auth_service: Arc<AuthService<U, R>>,
    /// Verifies bearer tokens for the protected routes
    pub issuer: Arc<AccessTokenIssuer>,
    pub refresh_cookie: RefreshCookie,
}

impl<U, R> AppState<U, R>
where
    U: UserDirectory,
    R: SessionRepository,
{
    pub fn new(
        auth_service: Arc<AuthService<U, R>>,
        issuer: Arc<AccessTokenIssuer>,
        refresh_cookie: RefreshCookie,
    ) -> Self {
        Self {
            auth_service,
            issuer,
            refresh_cookie,
        }
    }
}
