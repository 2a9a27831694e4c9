//! Mock implementation of UserDirectory for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::user::{NewUser, NotificationPreferences, UserIdentity};
use crate::errors::{AuthError, DomainError};

use super::trait_::UserDirectory;

#[derive(Clone)]
struct StoredUser {
    identity: UserIdentity,
    password: String,
    preferences: NotificationPreferences,
}

/// Mock user directory for testing
///
/// Passwords are compared as plain strings.
#[derive(Clone, Default)]
pub struct MockUserDirectory {
    users: Arc<RwLock<HashMap<Uuid, StoredUser>>>,
}

impl MockUserDirectory {
    /// Create a new mock directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a user directly and return its identity
    pub async fn add_user(&self, name: &str, email: &str, password: &str) -> UserIdentity {
        let identity = UserIdentity {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_lowercase(),
        };
        self.users.write().await.insert(
            identity.id,
            StoredUser {
                identity: identity.clone(),
                password: password.to_string(),
                preferences: NotificationPreferences::default(),
            },
        );
        identity
    }

    /// Replace a user's notification flags
    pub async fn set_preferences(&self, user_id: Uuid, preferences: NotificationPreferences) {
        if let Some(user) = self.users.write().await.get_mut(&user_id) {
            user.preferences = preferences;
        }
    }
}

#[async_trait]
impl UserDirectory for MockUserDirectory {
    async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<UserIdentity>, DomainError> {
        let email = email.trim().to_lowercase();
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.identity.email == email && u.password == password)
            .map(|u| u.identity.clone()))
    }

    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<UserIdentity>, DomainError> {
        let users = self.users.read().await;
        Ok(users.get(&user_id).map(|u| u.identity.clone()))
    }

    async fn notification_preferences(
        &self,
        user_id: Uuid,
    ) -> Result<Option<NotificationPreferences>, DomainError> {
        let users = self.users.read().await;
        Ok(users.get(&user_id).map(|u| u.preferences))
    }

    async fn register(&self, new_user: NewUser) -> Result<UserIdentity, DomainError> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.identity.email == new_user.email) {
            return Err(AuthError::EmailTaken.into());
        }

        let identity = UserIdentity {
            id: Uuid::new_v4(),
            name: new_user.name,
            email: new_user.email,
        };
        users.insert(
            identity.id,
            StoredUser {
                identity: identity.clone(),
                password: new_user.password,
                preferences: NotificationPreferences::default(),
            },
        );
        Ok(identity)
    }
}
