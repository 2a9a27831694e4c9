//! Configuration for the authentication service

use crate::services::token::TokenServiceConfig;

/// Configuration for the authentication service
#[derive(Debug, Clone)]
pub struct AuthServiceConfig {
    /// Seconds after a rotation during which a replay of the old token is
    /// treated as a client race rather than theft
    pub reuse_grace_seconds: i64,
    /// Whether to allow registration of new users
    pub allow_registration: bool,
    /// Minimum accepted password length at registration
    pub min_password_length: usize,
}

impl Default for AuthServiceConfig {
    fn default() -> Self {
        Self {
            reuse_grace_seconds: 10,
            allow_registration: true,
            min_password_length: 8,
        }
    }
}

impl From<&TokenServiceConfig> for AuthServiceConfig {
    fn from(config: &TokenServiceConfig) -> Self {
        Self {
            reuse_grace_seconds: config.reuse_grace_seconds,
            ..Self::default()
        }
    }
}
