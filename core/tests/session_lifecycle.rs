//! End-to-end session lifecycle through the public API

use std::sync::Arc;

use mk_core::domain::entities::{NewUser, RevocationReason};
use mk_core::errors::{DomainError, TokenError};
use mk_core::repositories::{InMemorySessionRepository, MockUserDirectory, SessionRepository};
use mk_core::services::{
    AccessTokenIssuer, AuthService, AuthServiceConfig, SessionCleanupConfig,
    SessionCleanupService, SessionManager, TokenServiceConfig,
};

#[tokio::test]
async fn test_register_refresh_logout_all_and_sweep() {
    let config = TokenServiceConfig::default();
    let repository = Arc::new(InMemorySessionRepository::new());
    let sessions = Arc::new(SessionManager::new(repository.clone(), &config));
    let service = AuthService::new(
        Arc::new(MockUserDirectory::new()),
        sessions.clone(),
        Arc::new(AccessTokenIssuer::new(&config)),
        AuthServiceConfig::from(&config),
    );

    let registered = service
        .register(NewUser::new("Keeper", "keeper@milokhelo.test", "goalkeeper1"))
        .await
        .unwrap();
    let user_id = registered.user.id;

    let refreshed = service
        .refresh(&registered.session.token)
        .await
        .unwrap();
    assert_eq!(refreshed.session.family_id, registered.session.family_id);

    let second_device = service
        .login("keeper@milokhelo.test", "goalkeeper1")
        .await
        .unwrap();

    let listed = service.list_sessions(user_id).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, second_device.session.record_id);

    assert_eq!(service.logout_all(user_id).await.unwrap(), 2);

    let result = service.refresh(&second_device.session.token).await;
    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::RotationFailure))
    ));

    let first = repository
        .find_by_token(&registered.session.token)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(first.revoked_reason, Some(RevocationReason::Rotated));

    let cleanup = SessionCleanupService::new(sessions, SessionCleanupConfig::default());
    let result = cleanup.run_cleanup().await.unwrap();
    assert!(result.is_success());
    assert_eq!(result.total_cleaned(), 0);
}
