//! MySQL implementation of the UserDirectory trait.
//!
//! Passwords are stored as bcrypt hashes. Hashing and verification run on
//! the blocking thread pool.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use mk_core::domain::entities::user::{NewUser, NotificationPreferences, UserIdentity};
use mk_core::errors::{AuthError, DomainError};
use mk_core::repositories::UserDirectory;

use crate::database::error::map_sqlx_error;

/// MySQL implementation of UserDirectory
pub struct MySqlUserDirectory {
    /// Database connection pool
    pool: MySqlPool,
    /// bcrypt cost factor used for new passwords
    bcrypt_cost: u32,
}

impl MySqlUserDirectory {
    /// Create a new MySQL user directory with the default bcrypt cost
    pub fn new(pool: MySqlPool) -> Self {
        Self {
            pool,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }

    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    fn normalize_email(email: &str) -> String {
        email.trim().to_lowercase()
    }

    /// Convert database row to UserIdentity
    fn row_to_identity(row: &sqlx::mysql::MySqlRow) -> Result<UserIdentity, DomainError> {
        let id: String = row.try_get("id").map_err(|e| DomainError::Internal {
            message: format!("Failed to get id: {}", e),
        })?;

        Ok(UserIdentity {
            id: Uuid::parse_str(&id).map_err(|e| DomainError::Internal {
                message: format!("Invalid user UUID: {}", e),
            })?,
            name: row.try_get("name").map_err(|e| DomainError::Internal {
                message: format!("Failed to get name: {}", e),
            })?,
            email: row.try_get("email").map_err(|e| DomainError::Internal {
                message: format!("Failed to get email: {}", e),
            })?,
        })
    }

    async fn verify_password(password: String, hash: String) -> Result<bool, DomainError> {
        tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Password verification task failed: {}", e),
            })?
            .map_err(|e| DomainError::Internal {
                message: format!("Stored password hash is unreadable: {}", e),
            })
    }

    async fn hash_password(password: String, cost: u32) -> Result<String, DomainError> {
        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Password hashing task failed: {}", e),
            })?
            .map_err(|e| DomainError::Internal {
                message: format!("Password hashing failed: {}", e),
            })
    }
}

#[async_trait]
impl UserDirectory for MySqlUserDirectory {
    async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<UserIdentity>, DomainError> {
        let query = r#"
            SELECT id, name, email, password_hash
            FROM users
            WHERE email = ?
            LIMIT 1
        "#;

        let row = sqlx::query(query)
            .bind(Self::normalize_email(email))
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        let row = match row {
            Some(row) => row,
            None => return Ok(None),
        };

        let hash: String = row
            .try_get("password_hash")
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to get password_hash: {}", e),
            })?;

        if Self::verify_password(password.to_string(), hash).await? {
            Ok(Some(Self::row_to_identity(&row)?))
        } else {
            Ok(None)
        }
    }

    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<UserIdentity>, DomainError> {
        let query = "SELECT id, name, email FROM users WHERE id = ? LIMIT 1";

        let row = sqlx::query(query)
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.as_ref().map(Self::row_to_identity).transpose()
    }

    async fn notification_preferences(
        &self,
        user_id: Uuid,
    ) -> Result<Option<NotificationPreferences>, DomainError> {
        let query = r#"
            SELECT receive_match_reminders, receive_email_notifications
            FROM users
            WHERE id = ?
            LIMIT 1
        "#;

        let row = sqlx::query(query)
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.map(|row| {
            Ok(NotificationPreferences {
                receive_match_reminders: row.try_get("receive_match_reminders").map_err(
                    |e| DomainError::Internal {
                        message: format!("Failed to get receive_match_reminders: {}", e),
                    },
                )?,
                receive_email_notifications: row.try_get("receive_email_notifications").map_err(
                    |e| DomainError::Internal {
                        message: format!("Failed to get receive_email_notifications: {}", e),
                    },
                )?,
            })
        })
        .transpose()
    }

    async fn register(&self, new_user: NewUser) -> Result<UserIdentity, DomainError> {
        let identity = UserIdentity {
            id: Uuid::new_v4(),
            name: new_user.name.trim().to_string(),
            email: Self::normalize_email(&new_user.email),
        };
        let password_hash = Self::hash_password(new_user.password, self.bcrypt_cost).await?;
        let now = Utc::now();

        let query = r#"
            INSERT INTO users (
                id, name, email, password_hash,
                receive_match_reminders, receive_email_notifications,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, TRUE, TRUE, ?, ?)
        "#;

        sqlx::query(query)
            .bind(identity.id.to_string())
            .bind(&identity.name)
            .bind(&identity.email)
            .bind(password_hash)
            .bind(now)
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| match map_sqlx_error(e) {
                DomainError::Conflict { .. } => DomainError::Auth(AuthError::EmailTaken),
                other => other,
            })?;

        tracing::info!(user_id = %identity.id, "User account created");

        Ok(identity)
    }
}
