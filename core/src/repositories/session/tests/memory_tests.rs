//! Unit tests for the in-memory session repository

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::domain::entities::session::{RefreshTokenRecord, RevocationReason};
use crate::errors::DomainError;
use crate::repositories::session::{InMemorySessionRepository, SessionRepository};

fn record(token: &str, user_id: Uuid, family_id: Uuid) -> RefreshTokenRecord {
    RefreshTokenRecord::issue_now(token.to_string(), user_id, family_id)
}

#[tokio::test]
async fn test_insert_and_find_by_token() {
    let repo = InMemorySessionRepository::new();
    let user_id = Uuid::new_v4();
    let saved = repo
        .insert(record("tok-1", user_id, Uuid::new_v4()))
        .await
        .unwrap();

    let found = repo.find_by_token("tok-1").await.unwrap().unwrap();
    assert_eq!(found.id, saved.id);
    assert_eq!(found.user_id, user_id);

    assert!(repo.find_by_token("tok-2").await.unwrap().is_none());
    assert_eq!(repo.find_by_id(saved.id).await.unwrap(), Some(saved));
}

#[tokio::test]
async fn test_duplicate_token_value_is_conflict() {
    let repo = InMemorySessionRepository::new();
    let user_id = Uuid::new_v4();
    repo.insert(record("dup", user_id, Uuid::new_v4()))
        .await
        .unwrap();

    let result = repo.insert(record("dup", user_id, Uuid::new_v4())).await;
    assert!(matches!(result, Err(DomainError::Conflict { .. })));
    assert_eq!(repo.len().await, 1);
}

#[tokio::test]
async fn test_mark_revoked_is_compare_and_set() {
    let repo = InMemorySessionRepository::new();
    let saved = repo
        .insert(record("cas", Uuid::new_v4(), Uuid::new_v4()))
        .await
        .unwrap();
    let now = Utc::now();

    assert!(repo
        .mark_revoked(saved.id, RevocationReason::Rotated, now)
        .await
        .unwrap());
    assert!(!repo
        .mark_revoked(saved.id, RevocationReason::Logout, now)
        .await
        .unwrap());
    assert!(!repo
        .mark_revoked(Uuid::new_v4(), RevocationReason::Logout, now)
        .await
        .unwrap());

    let stored = repo.find_by_id(saved.id).await.unwrap().unwrap();
    assert_eq!(stored.revoked_reason, Some(RevocationReason::Rotated));
}

#[tokio::test]
async fn test_active_by_user_is_newest_first() {
    let repo = InMemorySessionRepository::new();
    let user_id = Uuid::new_v4();
    let family_id = Uuid::new_v4();
    let now = Utc::now();

    for (i, token) in ["a", "b", "c"].iter().enumerate() {
        let issued = now - Duration::minutes(10 - i as i64);
        repo.insert(RefreshTokenRecord::new(
            token.to_string(),
            user_id,
            family_id,
            issued,
            issued + Duration::days(7),
        ))
        .await
        .unwrap();
    }
    repo.insert(record("other", Uuid::new_v4(), Uuid::new_v4()))
        .await
        .unwrap();

    let active = repo.find_active_by_user(user_id).await.unwrap();
    let tokens: Vec<&str> = active.iter().map(|r| r.token_value.as_str()).collect();
    assert_eq!(tokens, vec!["c", "b", "a"]);
}

#[tokio::test]
async fn test_revoke_all_for_user_and_family() {
    let repo = InMemorySessionRepository::new();
    let user_id = Uuid::new_v4();
    let family_a = Uuid::new_v4();
    let family_b = Uuid::new_v4();
    let now = Utc::now();

    repo.insert(record("a1", user_id, family_a)).await.unwrap();
    repo.insert(record("a2", user_id, family_a)).await.unwrap();
    repo.insert(record("b1", user_id, family_b)).await.unwrap();

    let revoked = repo
        .revoke_all_for_family(family_a, RevocationReason::Compromise, now)
        .await
        .unwrap();
    assert_eq!(revoked, 2);
    assert_eq!(repo.find_active_by_family(family_a).await.unwrap().len(), 0);
    assert_eq!(repo.find_active_by_family(family_b).await.unwrap().len(), 1);

    let revoked = repo
        .revoke_all_for_user(user_id, RevocationReason::LogoutAll, now)
        .await
        .unwrap();
    assert_eq!(revoked, 1);

    // Already-revoked records keep their first reason
    let a1 = repo.find_by_token("a1").await.unwrap().unwrap();
    assert_eq!(a1.revoked_reason, Some(RevocationReason::Compromise));
}

#[tokio::test]
async fn test_revoke_expired_and_delete_revoked_before() {
    let repo = InMemorySessionRepository::new();
    let user_id = Uuid::new_v4();
    let now = Utc::now();

    let stale = repo
        .insert(record("stale", user_id, Uuid::new_v4()))
        .await
        .unwrap();
    repo.insert(record("fresh", user_id, Uuid::new_v4()))
        .await
        .unwrap();
    repo.set_expires_at(stale.id, now - Duration::seconds(1)).await;

    assert_eq!(repo.revoke_expired(now).await.unwrap(), 1);
    assert_eq!(repo.revoke_expired(now).await.unwrap(), 0);

    let swept = repo.find_by_id(stale.id).await.unwrap().unwrap();
    assert_eq!(swept.revoked_reason, Some(RevocationReason::Expired));

    repo.set_revoked_at(stale.id, now - Duration::days(31)).await;
    let deleted = repo
        .delete_revoked_before(now - Duration::days(30))
        .await
        .unwrap();
    assert_eq!(deleted, 1);
    assert!(repo.find_by_token("stale").await.unwrap().is_none());
    assert_eq!(repo.len().await, 1);
}
