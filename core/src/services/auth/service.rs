//! Main authentication service implementation

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{info, warn};
use uuid::Uuid;
use validator::ValidateEmail;

use crate::domain::entities::session::{IssuedSession, RefreshTokenRecord, RevocationReason};
use crate::domain::entities::token::AuthenticatedUser;
use crate::domain::entities::user::{NewUser, NotificationPreferences, UserIdentity};
use crate::domain::events::AccountEvent;
use crate::errors::{AuthError, DomainError, DomainResult, TokenError};
use crate::repositories::{SessionRepository, UserDirectory};
use crate::services::events::{publish_or_log, AccountEventPublisher, NoOpEventPublisher};
use crate::services::token::{AccessTokenIssuer, SessionManager};

use super::config::AuthServiceConfig;

/// Tokens handed out at login or registration
#[derive(Debug, Clone)]
pub struct AuthOutcome {
    pub user: UserIdentity,
    pub access_token: String,
    /// Access token lifetime in seconds
    pub access_expires_in: i64,
    pub session: IssuedSession,
}

/// Tokens handed out by a successful refresh
#[derive(Debug, Clone)]
pub struct RefreshOutcome {
    pub user_id: Uuid,
    pub access_token: String,
    pub access_expires_in: i64,
    pub session: IssuedSession,
}

/// Authentication service for managing the complete account lifecycle
pub struct AuthService<U, R>
where
    U: UserDirectory,
    R: SessionRepository,
{
    /// User directory owning accounts and password verification
    directory: Arc<U>,
    /// Refresh session manager
    sessions: Arc<SessionManager<R>>,
    /// Access token issuer
    issuer: Arc<AccessTokenIssuer>,
    events: Arc<dyn AccountEventPublisher>,
    config: AuthServiceConfig,
}

impl<U, R> AuthService<U, R>
where
    U: UserDirectory,
    R: SessionRepository,
{
    /// Create a new authentication service
    ///
    /// # Arguments
    ///
    /// * `directory` - User directory
    /// * `sessions` - Refresh session manager
    /// * `issuer` - Access token issuer
    /// * `config` - Service configuration
    pub fn new(
        directory: Arc<U>,
        sessions: Arc<SessionManager<R>>,
        issuer: Arc<AccessTokenIssuer>,
        config: AuthServiceConfig,
    ) -> Self {
        Self {
            directory,
            sessions,
            issuer,
            events: Arc::new(NoOpEventPublisher),
            config,
        }
    }

    /// Attach an event publisher
    pub fn with_events(mut self, events: Arc<dyn AccountEventPublisher>) -> Self {
        self.events = events;
        self
    }

    /// Session manager used by this service
    pub fn sessions(&self) -> &Arc<SessionManager<R>> {
        &self.sessions
    }

    /// Register a new account and sign it in
    ///
    /// # Returns
    ///
    /// * `Ok(AuthOutcome)` - Account created and tokens issued
    /// * `Err(DomainError::Auth(AuthError::EmailTaken))` - Email already registered
    /// * `Err(DomainError::Validation)` - Input rejected
    pub async fn register(&self, new_user: NewUser) -> DomainResult<AuthOutcome> {
        if !self.config.allow_registration {
            return Err(DomainError::Validation {
                message: "Registration is disabled".to_string(),
            });
        }
        self.validate_new_user(&new_user)?;

        let user = self.directory.register(new_user).await?;
        info!(user_id = %user.id, "User registered");

        publish_or_log(
            self.events.as_ref(),
            AccountEvent::UserRegistered {
                user_id: user.id,
                email: user.email.clone(),
                at: Utc::now(),
            },
        )
        .await;

        self.sign_in(user).await
    }

    fn validate_new_user(&self, new_user: &NewUser) -> DomainResult<()> {
        if new_user.name.trim().is_empty() {
            return Err(DomainError::Validation {
                message: "Name must not be empty".to_string(),
            });
        }
        if !new_user.email.validate_email() {
            return Err(DomainError::Validation {
                message: "Invalid email address".to_string(),
            });
        }
        if new_user.password.chars().count() < self.config.min_password_length {
            return Err(DomainError::Validation {
                message: format!(
                    "Password must be at least {} characters",
                    self.config.min_password_length
                ),
            });
        }
        Ok(())
    }

    /// Authenticate with email and password
    ///
    /// Unknown email and wrong password are reported identically.
    pub async fn login(&self, email: &str, password: &str) -> DomainResult<AuthOutcome> {
        let user = match self.directory.verify_credentials(email, password).await? {
            Some(user) => user,
            None => {
                warn!("Login rejected: invalid credentials");
                return Err(AuthError::InvalidCredentials.into());
            }
        };

        self.sign_in(user).await
    }

    async fn sign_in(&self, user: UserIdentity) -> DomainResult<AuthOutcome> {
        let session = self.sessions.create_session(user.id, None).await?;
        let access_token = self.issuer.issue(user.id)?;

        info!(user_id = %user.id, family_id = %session.family_id, "User signed in");

        publish_or_log(
            self.events.as_ref(),
            AccountEvent::UserLoggedIn {
                user_id: user.id,
                family_id: session.family_id,
                at: Utc::now(),
            },
        )
        .await;

        Ok(AuthOutcome {
            user,
            access_token,
            access_expires_in: self.issuer.expires_in_seconds(),
            session,
        })
    }

    /// Exchange a refresh token for a new access token and a rotated refresh token
    ///
    /// When the presented token was already rotated away and the rotation
    /// happened longer ago than the grace window, its whole family is revoked.
    /// Every failure is reported as `RotationFailure`.
    pub async fn refresh(&self, refresh_token: &str) -> DomainResult<RefreshOutcome> {
        match self.sessions.rotate_session(refresh_token).await {
            Ok(session) => {
                let access_token = self.issuer.issue(session.user_id)?;
                Ok(RefreshOutcome {
                    user_id: session.user_id,
                    access_token,
                    access_expires_in: self.issuer.expires_in_seconds(),
                    session,
                })
            }
            Err(DomainError::Token(TokenError::RotationFailure)) => {
                if let Err(e) = self.handle_reuse(refresh_token).await {
                    warn!(error = %e, "Reuse check failed after rejected refresh");
                }
                Err(TokenError::RotationFailure.into())
            }
            Err(e) => Err(e),
        }
    }

    async fn handle_reuse(&self, refresh_token: &str) -> DomainResult<()> {
        let record = match self.sessions.detect_reuse(refresh_token).await? {
            Some(record) => record,
            None => return Ok(()),
        };

        let now = Utc::now();
        let rotated_at = record.revoked_at.unwrap_or(record.issued_at);
        if now - rotated_at <= Duration::seconds(self.config.reuse_grace_seconds) {
            info!(
                record_id = %record.id,
                family_id = %record.family_id,
                "Rotated refresh token replayed within grace window"
            );
            return Ok(());
        }

        warn!(
            record_id = %record.id,
            user_id = %record.user_id,
            family_id = %record.family_id,
            "Rotated refresh token replayed, revoking family"
        );

        self.sessions
            .revoke_family(record.family_id, RevocationReason::Compromise)
            .await?;

        publish_or_log(
            self.events.as_ref(),
            AccountEvent::SessionCompromised {
                user_id: record.user_id,
                family_id: record.family_id,
                record_id: record.id,
                at: now,
            },
        )
        .await;

        Ok(())
    }

    /// Revoke the presented refresh token, if any
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - A session was revoked
    /// * `Ok(false)` - Nothing to revoke
    pub async fn logout(&self, refresh_token: Option<&str>) -> DomainResult<bool> {
        match refresh_token {
            Some(token) if !token.is_empty() => {
                self.sessions
                    .revoke_session(token, RevocationReason::Logout)
                    .await
            }
            _ => Ok(false),
        }
    }

    /// Revoke every session of a user
    pub async fn logout_all(&self, user_id: Uuid) -> DomainResult<u64> {
        self.sessions
            .revoke_all_sessions(user_id, RevocationReason::LogoutAll)
            .await
    }

    /// Active sessions of a user, newest first
    pub async fn list_sessions(&self, user_id: Uuid) -> DomainResult<Vec<RefreshTokenRecord>> {
        self.sessions.list_active_sessions(user_id).await
    }

    /// Revoke one of the caller's sessions by id
    pub async fn revoke_session(&self, user_id: Uuid, session_id: Uuid) -> DomainResult<()> {
        if self
            .sessions
            .revoke_session_by_id(user_id, session_id, RevocationReason::ManualRevoke)
            .await?
        {
            Ok(())
        } else {
            Err(DomainError::NotFound {
                resource: format!("session {}", session_id),
            })
        }
    }

    /// Verify an access token
    pub fn authenticate(&self, access_token: &str) -> DomainResult<AuthenticatedUser> {
        self.issuer.verify(access_token)
    }

    /// Identity and notification preferences of the authenticated user
    pub async fn current_user(
        &self,
        user_id: Uuid,
    ) -> DomainResult<(UserIdentity, NotificationPreferences)> {
        let user = self
            .directory
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::Auth(AuthError::UserNotFound))?;
        let preferences = self
            .directory
            .notification_preferences(user_id)
            .await?
            .unwrap_or_default();

        Ok((user, preferences))
    }
}
