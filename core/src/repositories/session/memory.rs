//! In-memory implementation of SessionRepository for tests and local runs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::session::{RefreshTokenRecord, RevocationReason};
use crate::errors::DomainError;

use super::r#trait::SessionRepository;

#[derive(Default)]
struct Store {
    records: HashMap<Uuid, RefreshTokenRecord>,
    by_token: HashMap<String, Uuid>,
}

/// Session repository backed by a `HashMap` behind a single write lock
///
/// Holding the write lock across check and update makes `mark_revoked` a
/// true compare-and-set.
#[derive(Clone, Default)]
pub struct InMemorySessionRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records in any state
    pub async fn len(&self) -> usize {
        self.store.read().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Overwrite a record's expiry, used to simulate the passage of time
    pub async fn set_expires_at(&self, id: Uuid, expires_at: DateTime<Utc>) -> bool {
        let mut store = self.store.write().await;
        match store.records.get_mut(&id) {
            Some(record) => {
                record.expires_at = expires_at;
                true
            }
            None => false,
        }
    }

    /// Overwrite a revoked record's revocation time
    pub async fn set_revoked_at(&self, id: Uuid, revoked_at: DateTime<Utc>) -> bool {
        let mut store = self.store.write().await;
        match store.records.get_mut(&id) {
            Some(record) if record.is_revoked => {
                record.revoked_at = Some(revoked_at);
                true
            }
            _ => false,
        }
    }

    fn newest_first(mut records: Vec<RefreshTokenRecord>) -> Vec<RefreshTokenRecord> {
        records.sort_by(|a, b| b.issued_at.cmp(&a.issued_at));
        records
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn insert(&self, record: RefreshTokenRecord) -> Result<RefreshTokenRecord, DomainError> {
        let mut store = self.store.write().await;

        if store.by_token.contains_key(&record.token_value) || store.records.contains_key(&record.id)
        {
            return Err(DomainError::Conflict {
                message: "Refresh token already exists".to_string(),
            });
        }

        store.by_token.insert(record.token_value.clone(), record.id);
        store.records.insert(record.id, record.clone());
        Ok(record)
    }

    async fn find_by_token(
        &self,
        token_value: &str,
    ) -> Result<Option<RefreshTokenRecord>, DomainError> {
        let store = self.store.read().await;
        Ok(store
            .by_token
            .get(token_value)
            .and_then(|id| store.records.get(id))
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<RefreshTokenRecord>, DomainError> {
        let store = self.store.read().await;
        Ok(store.records.get(&id).cloned())
    }

    async fn find_active_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<RefreshTokenRecord>, DomainError> {
        let store = self.store.read().await;
        Ok(Self::newest_first(
            store
                .records
                .values()
                .filter(|r| r.user_id == user_id && !r.is_revoked)
                .cloned()
                .collect(),
        ))
    }

    async fn find_active_by_family(
        &self,
        family_id: Uuid,
    ) -> Result<Vec<RefreshTokenRecord>, DomainError> {
        let store = self.store.read().await;
        Ok(Self::newest_first(
            store
                .records
                .values()
                .filter(|r| r.family_id == family_id && !r.is_revoked)
                .cloned()
                .collect(),
        ))
    }

    async fn mark_revoked(
        &self,
        id: Uuid,
        reason: RevocationReason,
        at: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        let mut store = self.store.write().await;
        Ok(store
            .records
            .get_mut(&id)
            .map(|record| record.revoke(reason, at))
            .unwrap_or(false))
    }

    async fn revoke_all_for_user(
        &self,
        user_id: Uuid,
        reason: RevocationReason,
        at: DateTime<Utc>,
    ) -> Result<u64, DomainError> {
        let mut store = self.store.write().await;
        let mut count = 0;
        for record in store.records.values_mut() {
            if record.user_id == user_id && record.revoke(reason, at) {
                count += 1;
            }
        }
        Ok(count)
    }

    async fn revoke_all_for_family(
        &self,
        family_id: Uuid,
        reason: RevocationReason,
        at: DateTime<Utc>,
    ) -> Result<u64, DomainError> {
        let mut store = self.store.write().await;
        let mut count = 0;
        for record in store.records.values_mut() {
            if record.family_id == family_id && record.revoke(reason, at) {
                count += 1;
            }
        }
        Ok(count)
    }

    async fn revoke_expired(&self, now: DateTime<Utc>) -> Result<u64, DomainError> {
        let mut store = self.store.write().await;
        let mut count = 0;
        for record in store.records.values_mut() {
            if record.expires_at < now && record.revoke(RevocationReason::Expired, now) {
                count += 1;
            }
        }
        Ok(count)
    }

    async fn delete_revoked_before(&self, cutoff: DateTime<Utc>) -> Result<u64, DomainError> {
        let mut store = self.store.write().await;
        let stale: Vec<(Uuid, String)> = store
            .records
            .values()
            .filter(|r| r.is_revoked && r.revoked_at.map(|at| at < cutoff).unwrap_or(false))
            .map(|r| (r.id, r.token_value.clone()))
            .collect();

        for (id, token_value) in &stale {
            store.records.remove(id);
            store.by_token.remove(token_value);
        }
        Ok(stale.len() as u64)
    }
}
