//! Stateless access-token issuing and verification

use chrono::Duration;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tracing::debug;
use uuid::Uuid;

use crate::domain::entities::token::{AccessClaims, AuthenticatedUser, ACCESS_AUDIENCE};
use crate::errors::{DomainError, TokenError};

use super::config::TokenServiceConfig;

/// Mints and verifies short-lived bearer tokens
///
/// Keys are derived once at construction and never change afterwards.
pub struct AccessTokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: String,
    lifetime: Duration,
}

impl AccessTokenIssuer {
    pub fn new(config: &TokenServiceConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_audience(&[ACCESS_AUDIENCE]);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(config.access_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.access_secret.as_bytes()),
            validation,
            issuer: config.issuer.clone(),
            lifetime: Duration::seconds(config.access_token_expiry_seconds),
        }
    }

    /// Issues an access token for a user
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The signed token
    /// * `Err(DomainError)` - Signing failed
    pub fn issue(&self, user_id: Uuid) -> Result<String, DomainError> {
        let claims = AccessClaims::new(user_id, &self.issuer, self.lifetime);
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|_| DomainError::Token(TokenError::TokenGenerationFailed))
    }

    /// Verifies an access token
    ///
    /// Bad signatures, malformed payloads and expired tokens all produce the
    /// same `InvalidCredential` error.
    pub fn verify(&self, token: &str) -> Result<AuthenticatedUser, DomainError> {
        let data = decode::<AccessClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                debug!(reason = ?e.kind(), "Access token rejected");
                DomainError::Token(TokenError::InvalidCredential)
            })?;

        let user_id = data.claims.user_id().map_err(|_| {
            debug!("Access token subject is not a user id");
            DomainError::Token(TokenError::InvalidCredential)
        })?;

        Ok(AuthenticatedUser { user_id })
    }

    /// Access token lifetime in seconds
    pub fn expires_in_seconds(&self) -> i64 {
        self.lifetime.num_seconds()
    }
}
