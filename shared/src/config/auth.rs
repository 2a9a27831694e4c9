//! Authentication configuration: JWT signing and the refresh-token cookie

use serde::{Deserialize, Serialize};

const DEFAULT_ACCESS_SECRET: &str = "development-access-secret-change-in-production";
const DEFAULT_REFRESH_SECRET: &str = "development-refresh-secret-change-in-production";

/// JWT signing configuration
///
/// Access and refresh tokens are signed with separate secrets so that one
/// kind can never be accepted in place of the other.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// Secret used to sign access tokens
    pub access_secret: String,

    /// Secret used to sign refresh tokens
    pub refresh_secret: String,

    /// Access token expiry time in seconds
    pub access_token_expiry: i64,

    /// Refresh token expiry time in seconds
    pub refresh_token_expiry: i64,

    /// JWT issuer claim
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            access_secret: String::from(DEFAULT_ACCESS_SECRET),
            refresh_secret: String::from(DEFAULT_REFRESH_SECRET),
            access_token_expiry: 900,     // 15 minutes
            refresh_token_expiry: 604800, // 7 days
            issuer: String::from("milokhelo"),
        }
    }
}

impl JwtConfig {
    /// Create a JWT configuration with explicit secrets
    pub fn new(access_secret: impl Into<String>, refresh_secret: impl Into<String>) -> Self {
        Self {
            access_secret: access_secret.into(),
            refresh_secret: refresh_secret.into(),
            ..Default::default()
        }
    }

    /// Set access token expiry in minutes
    pub fn with_access_expiry_minutes(mut self, minutes: i64) -> Self {
        self.access_token_expiry = minutes * 60;
        self
    }

    /// Set refresh token expiry in days
    pub fn with_refresh_expiry_days(mut self, days: i64) -> Self {
        self.refresh_token_expiry = days * 86400;
        self
    }

    /// Check if either secret is still the development default
    pub fn is_using_default_secrets(&self) -> bool {
        self.access_secret == DEFAULT_ACCESS_SECRET || self.refresh_secret == DEFAULT_REFRESH_SECRET
    }
}

/// Refresh-token cookie and session policy
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Name of the cookie carrying the refresh token
    pub cookie_name: String,

    /// Cookie `Secure` flag (HTTPS only)
    pub secure: bool,

    /// Cookie `SameSite` attribute
    pub same_site: String,

    /// Cookie `HttpOnly` flag
    #[serde(default = "default_http_only")]
    pub http_only: bool,

    /// Window in seconds after a rotation during which replaying the
    /// rotated-away token is treated as a client retry rather than theft
    #[serde(default = "default_reuse_grace_seconds")]
    pub reuse_grace_seconds: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: String::from("refreshToken"),
            secure: false,
            same_site: String::from("Strict"),
            http_only: default_http_only(),
            reuse_grace_seconds: default_reuse_grace_seconds(),
        }
    }
}

/// Complete authentication configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuthConfig {
    pub jwt: JwtConfig,

    #[serde(default)]
    pub session: SessionConfig,
}

impl AuthConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = JwtConfig::default();
        let access_secret = std::env::var("JWT_ACCESS_SECRET")
            .unwrap_or(defaults.access_secret);
        let refresh_secret = std::env::var("JWT_REFRESH_SECRET")
            .unwrap_or(defaults.refresh_secret);
        let access_token_expiry = std::env::var("JWT_ACCESS_TOKEN_EXPIRY")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.access_token_expiry);
        let refresh_token_expiry = std::env::var("JWT_REFRESH_TOKEN_EXPIRY")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.refresh_token_expiry);

        let session_defaults = SessionConfig::default();
        let session = SessionConfig {
            cookie_name: std::env::var("REFRESH_COOKIE_NAME")
                .unwrap_or(session_defaults.cookie_name),
            secure: std::env::var("REFRESH_COOKIE_SECURE")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(session_defaults.secure),
            reuse_grace_seconds: std::env::var("REFRESH_REUSE_GRACE_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(session_defaults.reuse_grace_seconds),
            ..session_defaults
        };

        Self {
            jwt: JwtConfig {
                access_secret,
                refresh_secret,
                access_token_expiry,
                refresh_token_expiry,
                issuer: defaults.issuer,
            },
            session,
        }
    }
}

fn default_http_only() -> bool {
    true
}

fn default_reuse_grace_seconds() -> i64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_config_default() {
        let config = JwtConfig::default();
        assert_eq!(config.access_token_expiry, 900);
        assert_eq!(config.refresh_token_expiry, 604800);
        assert_ne!(config.access_secret, config.refresh_secret);
        assert!(config.is_using_default_secrets());
    }

    #[test]
    fn test_jwt_config_builders() {
        let config = JwtConfig::new("a", "b")
            .with_access_expiry_minutes(5)
            .with_refresh_expiry_days(1);

        assert_eq!(config.access_token_expiry, 300);
        assert_eq!(config.refresh_token_expiry, 86400);
        assert!(!config.is_using_default_secrets());
    }

    #[test]
    fn test_session_config_default_is_strict_http_only() {
        let config = SessionConfig::default();
        assert_eq!(config.cookie_name, "refreshToken");
        assert_eq!(config.same_site, "Strict");
        assert!(config.http_only);
    }
}
