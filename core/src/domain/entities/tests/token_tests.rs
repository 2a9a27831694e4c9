//! Unit tests for token claims

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::domain::entities::token::{
    AccessClaims, RefreshClaims, ACCESS_AUDIENCE, ACCESS_TOKEN_EXPIRY_MINUTES, JWT_ISSUER,
    REFRESH_AUDIENCE,
};

#[test]
fn test_access_claims() {
    let user_id = Uuid::new_v4();
    let claims = AccessClaims::new(
        user_id,
        JWT_ISSUER,
        Duration::minutes(ACCESS_TOKEN_EXPIRY_MINUTES),
    );

    assert_eq!(claims.user_id().unwrap(), user_id);
    assert_eq!(claims.iss, JWT_ISSUER);
    assert_eq!(claims.aud, ACCESS_AUDIENCE);
    assert_eq!(claims.exp - claims.iat, ACCESS_TOKEN_EXPIRY_MINUTES * 60);
    assert_eq!(claims.nbf, claims.iat);
}

#[test]
fn test_access_claims_have_unique_ids() {
    let user_id = Uuid::new_v4();
    let a = AccessClaims::new(user_id, JWT_ISSUER, Duration::minutes(15));
    let b = AccessClaims::new(user_id, JWT_ISSUER, Duration::minutes(15));

    assert_ne!(a.jti, b.jti);
}

#[test]
fn test_refresh_claims() {
    let user_id = Uuid::new_v4();
    let family_id = Uuid::new_v4();
    let token_id = Uuid::new_v4();
    let now = Utc::now();

    let claims = RefreshClaims::new(
        user_id,
        family_id,
        token_id,
        JWT_ISSUER,
        now,
        now + Duration::days(7),
    );

    assert_eq!(claims.user_id().unwrap(), user_id);
    assert_eq!(claims.family_id().unwrap(), family_id);
    assert_eq!(claims.jti, token_id.to_string());
    assert_eq!(claims.aud, REFRESH_AUDIENCE);
    assert_eq!(claims.exp - claims.iat, 7 * 24 * 3600);
}

#[test]
fn test_malformed_subject() {
    let mut claims = AccessClaims::new(Uuid::new_v4(), JWT_ISSUER, Duration::minutes(15));
    claims.sub = "not-a-uuid".to_string();

    assert!(claims.user_id().is_err());
}
