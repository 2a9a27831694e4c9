//! Session repository trait defining the interface for refresh-token record persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::session::{RefreshTokenRecord, RevocationReason};
use crate::errors::DomainError;

/// Repository trait for refresh-token records
///
/// Records are looked up by their exact serialized token value. The store
/// must enforce uniqueness of that value and must implement `mark_revoked`
/// as a compare-and-set so that concurrent rotations of one token produce a
/// single winner.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Persist a new record
    ///
    /// # Arguments
    /// * `record` - The record to insert
    ///
    /// # Returns
    /// * `Ok(RefreshTokenRecord)` - The stored record
    /// * `Err(DomainError::Conflict)` - A record with the same token value exists
    /// * `Err(DomainError::StoreUnavailable)` - The store could not be reached
    async fn insert(&self, record: RefreshTokenRecord) -> Result<RefreshTokenRecord, DomainError>;

    /// Find a record by its exact token value
    ///
    /// # Arguments
    /// * `token_value` - The serialized refresh token
    ///
    /// # Returns
    /// * `Ok(Some(RefreshTokenRecord))` - Record found, in whatever state it is in
    /// * `Ok(None)` - No record carries this value
    async fn find_by_token(&self, token_value: &str)
        -> Result<Option<RefreshTokenRecord>, DomainError>;

    /// Find a record by id
    async fn find_by_id(&self, id: Uuid) -> Result<Option<RefreshTokenRecord>, DomainError>;

    /// All unrevoked records of a user, newest first
    ///
    /// Records past their expiry that have not been swept yet are included.
    async fn find_active_by_user(&self, user_id: Uuid)
        -> Result<Vec<RefreshTokenRecord>, DomainError>;

    /// All unrevoked records of a rotation family, newest first
    async fn find_active_by_family(
        &self,
        family_id: Uuid,
    ) -> Result<Vec<RefreshTokenRecord>, DomainError>;

    /// Revoke a record if, and only if, it is still unrevoked
    ///
    /// # Arguments
    /// * `id` - Record id
    /// * `reason` - Reason written to the record
    /// * `at` - Revocation timestamp written to the record
    ///
    /// # Returns
    /// * `Ok(true)` - This call performed the revocation
    /// * `Ok(false)` - The record is unknown or was already revoked
    async fn mark_revoked(
        &self,
        id: Uuid,
        reason: RevocationReason,
        at: DateTime<Utc>,
    ) -> Result<bool, DomainError>;

    /// Revoke every unrevoked record of a user
    ///
    /// # Returns
    /// * `Ok(u64)` - Number of records this call revoked
    async fn revoke_all_for_user(
        &self,
        user_id: Uuid,
        reason: RevocationReason,
        at: DateTime<Utc>,
    ) -> Result<u64, DomainError> {
        let mut count = 0;
        for record in self.find_active_by_user(user_id).await? {
            if self.mark_revoked(record.id, reason, at).await? {
                count += 1;
            }
        }
        Ok(count)
    }

    /// Revoke every unrevoked record of a family
    async fn revoke_all_for_family(
        &self,
        family_id: Uuid,
        reason: RevocationReason,
        at: DateTime<Utc>,
    ) -> Result<u64, DomainError> {
        let mut count = 0;
        for record in self.find_active_by_family(family_id).await? {
            if self.mark_revoked(record.id, reason, at).await? {
                count += 1;
            }
        }
        Ok(count)
    }

    /// Mark every unrevoked record whose expiry is before `now` as revoked with `expired`
    ///
    /// # Returns
    /// * `Ok(u64)` - Number of records swept
    async fn revoke_expired(&self, now: DateTime<Utc>) -> Result<u64, DomainError>;

    /// Delete revoked records whose revocation happened before `cutoff`
    ///
    /// # Returns
    /// * `Ok(u64)` - Number of rows removed
    async fn delete_revoked_before(&self, cutoff: DateTime<Utc>) -> Result<u64, DomainError>;
}
