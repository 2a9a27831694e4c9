//! User directory trait: the identity source the authentication core consults.
//!
//! The directory owns user storage and password hashing. The core only ever
//! sees `UserIdentity` values.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::user::{NewUser, NotificationPreferences, UserIdentity};
use crate::errors::DomainError;

/// Read/write access to user accounts
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Check an email/password pair
    ///
    /// # Arguments
    /// * `email` - Login email, matched case-insensitively
    /// * `password` - Plaintext password as submitted
    ///
    /// # Returns
    /// * `Ok(Some(UserIdentity))` - Credentials are correct
    /// * `Ok(None)` - Unknown email or wrong password, indistinguishably
    /// * `Err(DomainError)` - The directory could not be consulted
    async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<UserIdentity>, DomainError>;

    /// Find a user by id
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<UserIdentity>, DomainError>;

    /// Notification flags of a user
    ///
    /// # Returns
    /// * `Ok(Some(NotificationPreferences))` - User exists
    /// * `Ok(None)` - No such user
    async fn notification_preferences(
        &self,
        user_id: Uuid,
    ) -> Result<Option<NotificationPreferences>, DomainError>;

    /// Create a user account
    ///
    /// # Returns
    /// * `Ok(UserIdentity)` - The new account
    /// * `Err(DomainError::Auth(AuthError::EmailTaken))` - Email already registered
    async fn register(&self, new_user: NewUser) -> Result<UserIdentity, DomainError>;
}
