//! Refresh session manager: issuing, validating, rotating and revoking refresh tokens

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::entities::session::{
    IssuedSession, RefreshTokenRecord, RevocationReason, ValidatedSession,
};
use crate::domain::entities::token::{RefreshClaims, REFRESH_AUDIENCE};
use crate::domain::events::AccountEvent;
use crate::errors::{DomainError, TokenError};
use crate::repositories::SessionRepository;
use crate::services::events::{publish_or_log, AccountEventPublisher, NoOpEventPublisher};

use super::config::TokenServiceConfig;

/// Service owning the lifecycle of persisted refresh tokens
pub struct SessionManager<R: SessionRepository> {
    repository: Arc<R>,
    events: Arc<dyn AccountEventPublisher>,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: String,
    lifetime: Duration,
}

impl<R: SessionRepository> SessionManager<R> {
    /// Creates a new session manager
    ///
    /// # Arguments
    ///
    /// * `repository` - Refresh-token record store
    /// * `config` - Token configuration; only the refresh secret and lifetime are used
    pub fn new(repository: Arc<R>, config: &TokenServiceConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_audience(&[REFRESH_AUDIENCE]);
        validation.validate_exp = true;
        validation.leeway = 0;

        Self {
            repository,
            events: Arc::new(NoOpEventPublisher),
            encoding_key: EncodingKey::from_secret(config.refresh_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.refresh_secret.as_bytes()),
            validation,
            issuer: config.issuer.clone(),
            lifetime: Duration::seconds(config.refresh_token_expiry_seconds),
        }
    }

    /// Attach an event publisher
    pub fn with_events(mut self, events: Arc<dyn AccountEventPublisher>) -> Self {
        self.events = events;
        self
    }

    /// Creates a session for a user
    ///
    /// A fresh family is started unless `family_id` is given.
    ///
    /// # Returns
    ///
    /// * `Ok(IssuedSession)` - The new refresh token and its metadata
    /// * `Err(DomainError)` - Signing or persisting failed
    pub async fn create_session(
        &self,
        user_id: Uuid,
        family_id: Option<Uuid>,
    ) -> Result<IssuedSession, DomainError> {
        let issued = self.issue(user_id, family_id).await?;

        publish_or_log(
            self.events.as_ref(),
            AccountEvent::SessionCreated {
                user_id,
                family_id: issued.family_id,
                record_id: issued.record_id,
                at: Utc::now(),
            },
        )
        .await;

        Ok(issued)
    }

    async fn issue(
        &self,
        user_id: Uuid,
        family_id: Option<Uuid>,
    ) -> Result<IssuedSession, DomainError> {
        let now = Utc::now();
        let expires_at = now + self.lifetime;
        let family_id = family_id.unwrap_or_else(Uuid::new_v4);
        let token_id = Uuid::new_v4();

        let claims = RefreshClaims::new(user_id, family_id, token_id, &self.issuer, now, expires_at);
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|_| DomainError::Token(TokenError::TokenGenerationFailed))?;

        let record = RefreshTokenRecord::new(token.clone(), user_id, family_id, now, expires_at);
        let record = self.repository.insert(record).await.map_err(|e| match e {
            DomainError::Conflict { .. } => DomainError::Token(TokenError::TokenGenerationFailed),
            other => other,
        })?;

        debug!(%user_id, %family_id, record_id = %record.id, "Refresh token issued");

        Ok(IssuedSession {
            token,
            user_id,
            family_id,
            record_id: record.id,
            token_id,
            expires_at,
        })
    }

    fn decode_claims(&self, token: &str) -> Option<RefreshClaims> {
        match decode::<RefreshClaims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => Some(data.claims),
            Err(e) => {
                debug!(reason = ?e.kind(), "Refresh token envelope rejected");
                None
            }
        }
    }

    /// Validates a refresh token against its signature and the store
    ///
    /// # Returns
    ///
    /// * `Ok(Some(ValidatedSession))` - The token is signed, stored, unrevoked and unexpired
    /// * `Ok(None)` - The token is not usable
    /// * `Err(DomainError)` - The store could not be consulted
    pub async fn validate_session(
        &self,
        token: &str,
    ) -> Result<Option<ValidatedSession>, DomainError> {
        let claims = match self.decode_claims(token) {
            Some(claims) => claims,
            None => {
                warn!("Refresh token failed envelope verification");
                return Ok(None);
            }
        };

        let record = match self.repository.find_by_token(token).await? {
            Some(record) => record,
            None => {
                warn!(subject = %claims.sub, "Refresh token not found in store");
                return Ok(None);
            }
        };

        if record.is_revoked {
            warn!(
                record_id = %record.id,
                reason = ?record.revoked_reason,
                "Revoked refresh token presented"
            );
            return Ok(None);
        }

        if record.is_expired_at(Utc::now()) {
            info!(record_id = %record.id, "Expired refresh token presented");
            return Ok(None);
        }

        if claims.sub != record.user_id.to_string()
            || claims.family_id != record.family_id.to_string()
        {
            warn!(record_id = %record.id, "Refresh token claims disagree with stored record");
            return Ok(None);
        }

        Ok(Some(ValidatedSession {
            user_id: record.user_id,
            record,
        }))
    }

    /// Exchanges a valid refresh token for its successor in the same family
    ///
    /// The old record is revoked with `rotated` through a compare-and-set
    /// before the successor is issued, so among concurrent rotations of the
    /// same token exactly one succeeds.
    ///
    /// # Returns
    ///
    /// * `Ok(IssuedSession)` - The successor
    /// * `Err(DomainError::Token(TokenError::RotationFailure))` - The token was not usable
    pub async fn rotate_session(&self, old_token: &str) -> Result<IssuedSession, DomainError> {
        let validated = match self.validate_session(old_token).await? {
            Some(validated) => validated,
            None => return Err(DomainError::Token(TokenError::RotationFailure)),
        };
        let old = validated.record;

        let now = Utc::now();
        if !self
            .repository
            .mark_revoked(old.id, RevocationReason::Rotated, now)
            .await?
        {
            warn!(record_id = %old.id, "Lost rotation race for refresh token");
            return Err(DomainError::Token(TokenError::RotationFailure));
        }

        let issued = self.issue(old.user_id, Some(old.family_id)).await?;

        info!(
            user_id = %old.user_id,
            family_id = %old.family_id,
            previous_id = %old.id,
            record_id = %issued.record_id,
            "Refresh token rotated"
        );

        publish_or_log(
            self.events.as_ref(),
            AccountEvent::SessionRotated {
                user_id: old.user_id,
                family_id: old.family_id,
                previous_id: old.id,
                record_id: issued.record_id,
                at: now,
            },
        )
        .await;

        Ok(issued)
    }

    /// Revokes the record carrying `token`
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - This call revoked the token
    /// * `Ok(false)` - Unknown or already revoked token
    pub async fn revoke_session(
        &self,
        token: &str,
        reason: RevocationReason,
    ) -> Result<bool, DomainError> {
        match self.repository.find_by_token(token).await? {
            Some(record) => self.revoke_record(&record, reason).await,
            None => Ok(false),
        }
    }

    /// Revokes one of a user's own sessions by record id
    ///
    /// A record owned by someone else behaves as if it did not exist.
    pub async fn revoke_session_by_id(
        &self,
        user_id: Uuid,
        record_id: Uuid,
        reason: RevocationReason,
    ) -> Result<bool, DomainError> {
        match self.repository.find_by_id(record_id).await? {
            Some(record) if record.user_id == user_id => self.revoke_record(&record, reason).await,
            Some(_) => {
                warn!(%user_id, %record_id, "Attempt to revoke another user's session");
                Ok(false)
            }
            None => Ok(false),
        }
    }

    async fn revoke_record(
        &self,
        record: &RefreshTokenRecord,
        reason: RevocationReason,
    ) -> Result<bool, DomainError> {
        let now = Utc::now();
        let revoked = self.repository.mark_revoked(record.id, reason, now).await?;

        if revoked {
            info!(record_id = %record.id, user_id = %record.user_id, %reason, "Refresh token revoked");
            publish_or_log(
                self.events.as_ref(),
                AccountEvent::SessionRevoked {
                    user_id: record.user_id,
                    record_id: record.id,
                    reason,
                    at: now,
                },
            )
            .await;
        }

        Ok(revoked)
    }

    /// Revokes every active session of a user
    ///
    /// # Returns
    ///
    /// * `Ok(u64)` - Number of sessions this call revoked
    pub async fn revoke_all_sessions(
        &self,
        user_id: Uuid,
        reason: RevocationReason,
    ) -> Result<u64, DomainError> {
        let now = Utc::now();
        let count = self
            .repository
            .revoke_all_for_user(user_id, reason, now)
            .await?;

        info!(%user_id, count, %reason, "Revoked all sessions of user");

        publish_or_log(
            self.events.as_ref(),
            AccountEvent::AllSessionsRevoked {
                user_id,
                count,
                reason,
                at: now,
            },
        )
        .await;

        Ok(count)
    }

    /// Revokes every active session of a rotation family
    pub async fn revoke_family(
        &self,
        family_id: Uuid,
        reason: RevocationReason,
    ) -> Result<u64, DomainError> {
        let now = Utc::now();
        let count = self
            .repository
            .revoke_all_for_family(family_id, reason, now)
            .await?;

        warn!(%family_id, count, %reason, "Revoked token family");

        publish_or_log(
            self.events.as_ref(),
            AccountEvent::FamilyRevoked {
                family_id,
                count,
                reason,
                at: now,
            },
        )
        .await;

        Ok(count)
    }

    /// Unrevoked sessions of a user, newest first
    pub async fn list_active_sessions(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<RefreshTokenRecord>, DomainError> {
        self.repository.find_active_by_user(user_id).await
    }

    /// Marks every unrevoked record past its expiry as revoked with `expired`
    ///
    /// Running it twice in a row reports zero the second time.
    pub async fn purge_expired(&self) -> Result<u64, DomainError> {
        let now = Utc::now();
        let count = self.repository.revoke_expired(now).await?;

        if count > 0 {
            info!(count, "Expired refresh tokens swept");
            publish_or_log(
                self.events.as_ref(),
                AccountEvent::ExpiredSessionsPurged { count, at: now },
            )
            .await;
        }

        Ok(count)
    }

    /// Deletes revoked records whose revocation is older than `cutoff`
    pub async fn purge_revoked_before(&self, cutoff: DateTime<Utc>) -> Result<u64, DomainError> {
        let count = self.repository.delete_revoked_before(cutoff).await?;
        if count > 0 {
            info!(count, %cutoff, "Old revoked refresh tokens deleted");
        }
        Ok(count)
    }

    /// Looks up a correctly signed token whose record was rotated away
    ///
    /// # Returns
    ///
    /// * `Ok(Some(RefreshTokenRecord))` - The token is a rotated predecessor
    /// * `Ok(None)` - Anything else
    pub async fn detect_reuse(
        &self,
        token: &str,
    ) -> Result<Option<RefreshTokenRecord>, DomainError> {
        if self.decode_claims(token).is_none() {
            return Ok(None);
        }

        Ok(self
            .repository
            .find_by_token(token)
            .await?
            .filter(|record| record.was_rotated()))
    }
}
