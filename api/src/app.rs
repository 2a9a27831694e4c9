//! Application factory
//!
//! Builds the actix-web `App` from an [`AppState`]. Generic over the user
//! directory and the session repository so the binary and the tests share
//! one route table.

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    web, App, Error, HttpResponse,
};
use mk_core::repositories::{SessionRepository, UserDirectory};
use mk_shared::Environment;
use tracing_actix_web::TracingLogger;

use crate::dto::{ErrorResponse, ErrorResponseExt};
use crate::handlers::json_error_handler;
use crate::middleware::{cors::create_cors, security::SecurityMiddleware, JwtAuth};
use crate::routes::auth::{
    login::login, logout::logout, logout::logout_all, me::me, refresh::refresh,
    register::register, sessions::list_sessions, sessions::revoke_session, AppState,
};
use crate::routes::health::health_check;

/// Create and configure the application with all dependencies
pub fn create_app<U, R>(
    app_state: web::Data<AppState<U, R>>,
    environment: Environment,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
>
where
    U: UserDirectory + 'static,
    R: SessionRepository + 'static,
{
    let jwt_auth = JwtAuth::new(app_state.issuer.clone());

    App::new()
        .app_data(app_state)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        // Registration order is inverse of execution: TracingLogger runs first
        .wrap(SecurityMiddleware::for_environment(environment))
        .wrap(create_cors(environment))
        .wrap(TracingLogger::default())
        .route("/health", web::get().to(health_check))
        .service(
            web::scope("/api/v1/auth")
                .route("/register", web::post().to(register::<U, R>))
                .route("/login", web::post().to(login::<U, R>))
                .route("/refresh", web::post().to(refresh::<U, R>))
                .route("/logout", web::post().to(logout::<U, R>))
                .service(
                    web::resource("/logout-all")
                        .wrap(jwt_auth.clone())
                        .route(web::post().to(logout_all::<U, R>)),
                )
                .service(
                    web::resource("/sessions")
                        .wrap(jwt_auth.clone())
                        .route(web::get().to(list_sessions::<U, R>)),
                )
                .service(
                    web::resource("/sessions/{id}")
                        .wrap(jwt_auth.clone())
                        .route(web::delete().to(revoke_session::<U, R>)),
                )
                .service(
                    web::resource("/me")
                        .wrap(jwt_auth)
                        .route(web::get().to(me::<U, R>)),
                ),
        )
        .default_service(web::route().to(not_found))
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    ErrorResponse::new("not_found", "The requested resource was not found")
        .to_response(actix_web::http::StatusCode::NOT_FOUND)
}
