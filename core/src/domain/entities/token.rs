//! JWT claim sets for access and refresh tokens.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Access token expiration time (15 minutes)
pub const ACCESS_TOKEN_EXPIRY_MINUTES: i64 = 15;

/// Refresh token expiration time (7 days)
pub const REFRESH_TOKEN_EXPIRY_DAYS: i64 = 7;

/// JWT issuer
pub const JWT_ISSUER: &str = "milokhelo";

/// Audience of access tokens
pub const ACCESS_AUDIENCE: &str = "milokhelo-api";

/// Audience of refresh tokens
pub const REFRESH_AUDIENCE: &str = "milokhelo-refresh";

/// Claims carried by a short-lived access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject (user ID)
    pub sub: String,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Not before timestamp
    pub nbf: i64,

    pub iss: String,

    pub aud: String,

    /// JWT ID (unique identifier for the token)
    pub jti: String,
}

impl AccessClaims {
    /// Creates access token claims for `user_id` valid for `lifetime`
    pub fn new(user_id: Uuid, issuer: &str, lifetime: Duration) -> Self {
        let now = Utc::now();
        let expiry = now + lifetime;

        Self {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: expiry.timestamp(),
            nbf: now.timestamp(),
            iss: issuer.to_string(),
            aud: ACCESS_AUDIENCE.to_string(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Gets the user ID from the claims
    pub fn user_id(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.sub)
    }
}

/// Claims carried by a refresh token
///
/// `jti` is the per-issuance token id. Two refresh tokens never share it,
/// which makes every serialized refresh token distinct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshClaims {
    /// Subject (user ID)
    pub sub: String,

    /// Rotation family shared by every descendant of one login
    pub family_id: String,

    /// Token id
    pub jti: String,

    pub iat: i64,

    pub exp: i64,

    pub iss: String,

    pub aud: String,
}

impl RefreshClaims {
    /// Creates refresh token claims issued at `issued_at` and expiring at `expires_at`
    pub fn new(
        user_id: Uuid,
        family_id: Uuid,
        token_id: Uuid,
        issuer: &str,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            sub: user_id.to_string(),
            family_id: family_id.to_string(),
            jti: token_id.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            iss: issuer.to_string(),
            aud: REFRESH_AUDIENCE.to_string(),
        }
    }

    pub fn user_id(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.sub)
    }

    pub fn family_id(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.family_id)
    }
}

/// Identity proven by a verified access token
///
/// Handlers receive this value explicitly; it is never stored in ambient
/// request state beyond the extractor that hands it over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
}
