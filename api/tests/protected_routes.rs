//! Bearer gate in front of the protected routes

#[macro_use]
mod common;

use actix_web::{
    http::{header, StatusCode},
    test,
};
use mk_api::app::create_app;
use mk_core::services::{AccessTokenIssuer, TokenServiceConfig};
use mk_shared::Environment;
use serde_json::Value;
use uuid::Uuid;

const PROTECTED: [(&str, &str); 4] = [
    ("POST", "/api/v1/auth/logout-all"),
    ("GET", "/api/v1/auth/sessions"),
    ("DELETE", "/api/v1/auth/sessions/6f1c2a52-8a3e-4d0b-9a51-3d0b1f1e2a10"),
    ("GET", "/api/v1/auth/me"),
];

fn request(method: &str, uri: &str) -> test::TestRequest {
    let req = match method {
        "POST" => test::TestRequest::post(),
        "DELETE" => test::TestRequest::delete(),
        _ => test::TestRequest::get(),
    };
    req.uri(uri)
}

#[actix_rt::test]
async fn test_missing_bearer_is_rejected() {
    let ctx = common::context();
    let app = test::init_service(create_app(ctx.state.clone(), Environment::Development)).await;

    for (method, uri) in PROTECTED {
        let resp = test::call_service(&app, request(method, uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{} {}", method, uri);
        assert_eq!(resp.headers().get(header::WWW_AUTHENTICATE).unwrap(), "Bearer");

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "missing_token");
    }
}

#[actix_rt::test]
async fn test_invalid_bearer_is_rejected() {
    let ctx = common::context();
    let app = test::init_service(create_app(ctx.state.clone(), Environment::Development)).await;

    for (method, uri) in PROTECTED {
        let req = request(method, uri)
            .insert_header((header::AUTHORIZATION, "Bearer not.a.jwt"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{} {}", method, uri);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "invalid_credential");
    }
}

#[actix_rt::test]
async fn test_foreign_and_refresh_tokens_are_not_bearer_credentials() {
    let ctx = common::context();
    ctx.directory.add_user(common::NAME, common::EMAIL, common::PASSWORD).await;
    let app = test::init_service(create_app(ctx.state.clone(), Environment::Development)).await;

    // Signed with another secret
    let foreign = AccessTokenIssuer::new(&TokenServiceConfig {
        access_secret: "someone-else".to_string(),
        ..common::token_config()
    })
    .issue(Uuid::new_v4())
    .unwrap();

    let (_, refresh_cookie) = login!(app);

    for token in [foreign, refresh_cookie.value().to_string()] {
        let req = test::TestRequest::get()
            .uri("/api/v1/auth/me")
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}

#[actix_rt::test]
async fn test_refreshed_access_token_opens_protected_routes() {
    let ctx = common::context();
    let user = ctx.directory.add_user(common::NAME, common::EMAIL, common::PASSWORD).await;
    let app = test::init_service(create_app(ctx.state.clone(), Environment::Development)).await;

    let (_, cookie) = login!(app);
    let resp = refresh_with!(app, cookie.value());
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    let access = body["access_token"].as_str().unwrap();
    let req = test::TestRequest::get()
        .uri("/api/v1/auth/me")
        .insert_header((header::AUTHORIZATION, format!("Bearer {}", access)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["user"]["id"], user.id.to_string());
}

#[actix_rt::test]
async fn test_valid_bearer_for_deleted_user_is_not_found() {
    let ctx = common::context();
    let app = test::init_service(create_app(ctx.state.clone(), Environment::Development)).await;

    let token = ctx.issuer.issue(Uuid::new_v4()).unwrap();
    let req = test::TestRequest::get()
        .uri("/api/v1/auth/me")
        .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "user_not_found");
}

#[actix_rt::test]
async fn test_unknown_route_is_json_404() {
    let ctx = common::context();
    let app = test::init_service(create_app(ctx.state.clone(), Environment::Development)).await;

    let req = test::TestRequest::get().uri("/api/v1/nowhere").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "not_found");
}
