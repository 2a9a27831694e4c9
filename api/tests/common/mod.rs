//! Shared wiring for the HTTP integration tests

#![allow(dead_code)]

use std::sync::Arc;

use actix_web::{cookie::Cookie, dev::ServiceResponse, web};
use mk_api::routes::auth::{AppState, RefreshCookie};
use mk_core::repositories::{InMemorySessionRepository, MockUserDirectory};
use mk_core::services::{
    AccessTokenIssuer, AuthService, AuthServiceConfig, SessionManager, TokenServiceConfig,
};
use mk_shared::SessionConfig;

pub const NAME: &str = "Ravi";
pub const EMAIL: &str = "ravi@milokhelo.test";
pub const PASSWORD: &str = "pitch-side-42";
pub const COOKIE_NAME: &str = "refreshToken";

pub type TestState = AppState<MockUserDirectory, InMemorySessionRepository>;

pub struct TestContext {
    pub directory: Arc<MockUserDirectory>,
    pub repository: Arc<InMemorySessionRepository>,
    pub issuer: Arc<AccessTokenIssuer>,
    pub state: web::Data<TestState>,
}

pub fn token_config() -> TokenServiceConfig {
    TokenServiceConfig {
        access_secret: "http-test-access".to_string(),
        refresh_secret: "http-test-refresh".to_string(),
        ..TokenServiceConfig::default()
    }
}

pub fn context() -> TestContext {
    let config = token_config();
    let directory = Arc::new(MockUserDirectory::new());
    let repository = Arc::new(InMemorySessionRepository::new());
    let sessions = Arc::new(SessionManager::new(repository.clone(), &config));
    let issuer = Arc::new(AccessTokenIssuer::new(&config));
    let auth_service = Arc::new(AuthService::new(
        directory.clone(),
        sessions,
        issuer.clone(),
        AuthServiceConfig::from(&config),
    ));
    let state = web::Data::new(AppState::new(
        auth_service,
        issuer.clone(),
        RefreshCookie::new(&SessionConfig::default(), config.refresh_token_expiry_seconds),
    ));

    TestContext {
        directory,
        repository,
        issuer,
        state,
    }
}

/// The refresh cookie set on a response, if any
pub fn refresh_cookie<B>(resp: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    resp.response()
        .cookies()
        .find(|cookie| cookie.name() == COOKIE_NAME)
        .map(|cookie| cookie.into_owned())
}

/// POST a login for the seeded user; yields `(body, refresh_cookie)`
macro_rules! login {
    ($app:expr) => {{
        let req = actix_web::test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(serde_json::json!({
                "email": common::EMAIL,
                "password": common::PASSWORD,
            }))
            .to_request();
        let resp = actix_web::test::call_service(&$app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::OK);
        let cookie = common::refresh_cookie(&resp).expect("login sets the refresh cookie");
        let body: serde_json::Value = actix_web::test::read_body_json(resp).await;
        (body, cookie)
    }};
}

/// POST /refresh carrying `$token` in the refresh cookie
macro_rules! refresh_with {
    ($app:expr, $token:expr) => {{
        let req = actix_web::test::TestRequest::post()
            .uri("/api/v1/auth/refresh")
            .cookie(actix_web::cookie::Cookie::new(
                common::COOKIE_NAME,
                $token.to_string(),
            ))
            .to_request();
        actix_web::test::call_service(&$app, req).await
    }};
}
