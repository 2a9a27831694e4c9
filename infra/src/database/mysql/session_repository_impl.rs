//! MySQL implementation of the SessionRepository trait.
//!
//! Refresh tokens are stored verbatim in `token_value`; a SHA-256 digest of
//! the value is stored alongside and carries the uniqueness constraint.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use mk_core::domain::entities::session::{RefreshTokenRecord, RevocationReason};
use mk_core::errors::DomainError;
use mk_core::repositories::SessionRepository;

use crate::database::error::map_sqlx_error;

const SELECT_COLUMNS: &str = r#"
    SELECT id, token_value, user_id, family_id, issued_at, expires_at,
           is_revoked, revoked_at, revoked_reason
    FROM refresh_tokens
"#;

/// MySQL implementation of SessionRepository
pub struct MySqlSessionRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlSessionRepository {
    /// Create a new MySQL session repository
    ///
    /// # Arguments
    /// * `pool` - MySQL connection pool from SQLx
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// SHA-256 hex digest of a token value
    pub fn token_digest(token_value: &str) -> String {
        hex::encode(Sha256::digest(token_value.as_bytes()))
    }

    fn parse_uuid(row: &sqlx::mysql::MySqlRow, column: &str) -> Result<Uuid, DomainError> {
        let raw: String = row.try_get(column).map_err(|e| DomainError::Internal {
            message: format!("Failed to get {}: {}", column, e),
        })?;
        Uuid::parse_str(&raw).map_err(|e| DomainError::Internal {
            message: format!("Invalid UUID in {}: {}", column, e),
        })
    }

    /// Convert database row to RefreshTokenRecord
    fn row_to_record(row: &sqlx::mysql::MySqlRow) -> Result<RefreshTokenRecord, DomainError> {
        let internal = |column: &str, e: sqlx::Error| DomainError::Internal {
            message: format!("Failed to get {}: {}", column, e),
        };

        let revoked_reason: Option<String> = row
            .try_get("revoked_reason")
            .map_err(|e| internal("revoked_reason", e))?;
        let revoked_reason = revoked_reason
            .map(|s| s.parse::<RevocationReason>())
            .transpose()
            .map_err(|message| DomainError::Internal { message })?;

        Ok(RefreshTokenRecord {
            id: Self::parse_uuid(row, "id")?,
            token_value: row
                .try_get("token_value")
                .map_err(|e| internal("token_value", e))?,
            user_id: Self::parse_uuid(row, "user_id")?,
            family_id: Self::parse_uuid(row, "family_id")?,
            issued_at: row
                .try_get::<DateTime<Utc>, _>("issued_at")
                .map_err(|e| internal("issued_at", e))?,
            expires_at: row
                .try_get::<DateTime<Utc>, _>("expires_at")
                .map_err(|e| internal("expires_at", e))?,
            is_revoked: row
                .try_get("is_revoked")
                .map_err(|e| internal("is_revoked", e))?,
            revoked_at: row
                .try_get::<Option<DateTime<Utc>>, _>("revoked_at")
                .map_err(|e| internal("revoked_at", e))?,
            revoked_reason,
        })
    }

    async fn fetch_many(
        &self,
        filter: &str,
        id: Uuid,
    ) -> Result<Vec<RefreshTokenRecord>, DomainError> {
        let query = format!(
            "{} WHERE {} = ? AND is_revoked = FALSE ORDER BY issued_at DESC",
            SELECT_COLUMNS, filter
        );

        let rows = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        rows.iter().map(Self::row_to_record).collect()
    }
}

#[async_trait]
impl SessionRepository for MySqlSessionRepository {
    async fn insert(&self, record: RefreshTokenRecord) -> Result<RefreshTokenRecord, DomainError> {
        let query = r#"
            INSERT INTO refresh_tokens (
                id, token_value, token_digest, user_id, family_id,
                issued_at, expires_at, is_revoked, revoked_at, revoked_reason
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(record.id.to_string())
            .bind(&record.token_value)
            .bind(Self::token_digest(&record.token_value))
            .bind(record.user_id.to_string())
            .bind(record.family_id.to_string())
            .bind(record.issued_at)
            .bind(record.expires_at)
            .bind(record.is_revoked)
            .bind(record.revoked_at)
            .bind(record.revoked_reason.map(|r| r.as_str()))
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(record)
    }

    async fn find_by_token(
        &self,
        token_value: &str,
    ) -> Result<Option<RefreshTokenRecord>, DomainError> {
        let query = format!("{} WHERE token_digest = ? LIMIT 1", SELECT_COLUMNS);

        let row = sqlx::query(&query)
            .bind(Self::token_digest(token_value))
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        match row {
            Some(row) => {
                let record = Self::row_to_record(&row)?;
                // Guard against a digest collision
                Ok((record.token_value == token_value).then_some(record))
            }
            None => Ok(None),
        }
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<RefreshTokenRecord>, DomainError> {
        let query = format!("{} WHERE id = ? LIMIT 1", SELECT_COLUMNS);

        let row = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.as_ref().map(Self::row_to_record).transpose()
    }

    async fn find_active_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<RefreshTokenRecord>, DomainError> {
        self.fetch_many("user_id", user_id).await
    }

    async fn find_active_by_family(
        &self,
        family_id: Uuid,
    ) -> Result<Vec<RefreshTokenRecord>, DomainError> {
        self.fetch_many("family_id", family_id).await
    }

    async fn mark_revoked(
        &self,
        id: Uuid,
        reason: RevocationReason,
        at: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        let query = r#"
            UPDATE refresh_tokens
            SET is_revoked = TRUE, revoked_at = ?, revoked_reason = ?
            WHERE id = ? AND is_revoked = FALSE
        "#;

        let result = sqlx::query(query)
            .bind(at)
            .bind(reason.as_str())
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() == 1)
    }

    async fn revoke_all_for_user(
        &self,
        user_id: Uuid,
        reason: RevocationReason,
        at: DateTime<Utc>,
    ) -> Result<u64, DomainError> {
        let query = r#"
            UPDATE refresh_tokens
            SET is_revoked = TRUE, revoked_at = ?, revoked_reason = ?
            WHERE user_id = ? AND is_revoked = FALSE
        "#;

        let result = sqlx::query(query)
            .bind(at)
            .bind(reason.as_str())
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected())
    }

    async fn revoke_all_for_family(
        &self,
        family_id: Uuid,
        reason: RevocationReason,
        at: DateTime<Utc>,
    ) -> Result<u64, DomainError> {
        let query = r#"
            UPDATE refresh_tokens
            SET is_revoked = TRUE, revoked_at = ?, revoked_reason = ?
            WHERE family_id = ? AND is_revoked = FALSE
        "#;

        let result = sqlx::query(query)
            .bind(at)
            .bind(reason.as_str())
            .bind(family_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected())
    }

    async fn revoke_expired(&self, now: DateTime<Utc>) -> Result<u64, DomainError> {
        let query = r#"
            UPDATE refresh_tokens
            SET is_revoked = TRUE, revoked_at = ?, revoked_reason = ?
            WHERE is_revoked = FALSE AND expires_at < ?
        "#;

        let result = sqlx::query(query)
            .bind(now)
            .bind(RevocationReason::Expired.as_str())
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected())
    }

    async fn delete_revoked_before(&self, cutoff: DateTime<Utc>) -> Result<u64, DomainError> {
        let query = r#"
            DELETE FROM refresh_tokens
            WHERE is_revoked = TRUE AND revoked_at < ?
        "#;

        let result = sqlx::query(query)
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected())
    }
}
