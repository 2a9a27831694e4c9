//! Concurrent rotation of a single refresh token

use std::sync::Arc;

use uuid::Uuid;

use super::session_manager;
use crate::domain::entities::session::RevocationReason;
use crate::errors::{DomainError, TokenError};
use crate::repositories::SessionRepository;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_exactly_one_concurrent_rotation_wins() {
    let (repository, manager) = session_manager();
    let manager = Arc::new(manager);
    let user_id = Uuid::new_v4();
    let original = manager.create_session(user_id, None).await.unwrap();

    let mut handles = Vec::new();
    for _ in 0..16 {
        let manager = manager.clone();
        let token = original.token.clone();
        handles.push(tokio::spawn(
            async move { manager.rotate_session(&token).await },
        ));
    }

    let mut winners = Vec::new();
    for handle in handles {
        match handle.await.unwrap() {
            Ok(issued) => winners.push(issued),
            Err(DomainError::Token(TokenError::RotationFailure)) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(winners.len(), 1);
    assert_eq!(winners[0].family_id, original.family_id);

    let old = repository
        .find_by_token(&original.token)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(old.revoked_reason, Some(RevocationReason::Rotated));

    let active = manager.list_active_sessions(user_id).await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, winners[0].record_id);
}
