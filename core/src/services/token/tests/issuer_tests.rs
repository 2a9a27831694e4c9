//! Unit tests for the access token issuer

use uuid::Uuid;

use super::test_config;
use crate::errors::{DomainError, TokenError};
use crate::services::token::{AccessTokenIssuer, TokenServiceConfig};

fn is_invalid_credential(result: Result<crate::domain::AuthenticatedUser, DomainError>) -> bool {
    matches!(
        result,
        Err(DomainError::Token(TokenError::InvalidCredential))
    )
}

#[test]
fn test_issue_and_verify() {
    let issuer = AccessTokenIssuer::new(&test_config());
    let user_id = Uuid::new_v4();

    let token = issuer.issue(user_id).unwrap();
    let user = issuer.verify(&token).unwrap();

    assert_eq!(user.user_id, user_id);
    assert_eq!(issuer.expires_in_seconds(), 15 * 60);
}

#[test]
fn test_tokens_for_same_user_differ() {
    let issuer = AccessTokenIssuer::new(&test_config());
    let user_id = Uuid::new_v4();

    assert_ne!(issuer.issue(user_id).unwrap(), issuer.issue(user_id).unwrap());
}

#[test]
fn test_wrong_secret_is_rejected() {
    let issuer = AccessTokenIssuer::new(&test_config());
    let other = AccessTokenIssuer::new(&TokenServiceConfig {
        access_secret: "another-secret".to_string(),
        ..test_config()
    });

    let token = other.issue(Uuid::new_v4()).unwrap();
    assert!(is_invalid_credential(issuer.verify(&token)));
}

#[test]
fn test_expired_token_is_rejected() {
    let issuer = AccessTokenIssuer::new(&TokenServiceConfig {
        access_token_expiry_seconds: -30,
        ..test_config()
    });

    let token = issuer.issue(Uuid::new_v4()).unwrap();
    assert!(is_invalid_credential(issuer.verify(&token)));
}

#[test]
fn test_malformed_token_is_rejected() {
    let issuer = AccessTokenIssuer::new(&test_config());

    assert!(is_invalid_credential(issuer.verify("not.a.jwt")));
    assert!(is_invalid_credential(issuer.verify("")));
}

#[tokio::test]
async fn test_refresh_token_is_not_an_access_token() {
    let config = TokenServiceConfig {
        refresh_secret: "shared".to_string(),
        access_secret: "shared".to_string(),
        ..test_config()
    };
    let issuer = AccessTokenIssuer::new(&config);
    let repository = std::sync::Arc::new(crate::repositories::InMemorySessionRepository::new());
    let manager = crate::services::token::SessionManager::new(repository, &config);

    let session = manager.create_session(Uuid::new_v4(), None).await.unwrap();
    assert!(is_invalid_credential(issuer.verify(&session.token)));
}
