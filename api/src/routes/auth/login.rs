use actix_web::{web, HttpResponse};
use mk_core::repositories::{SessionRepository, UserDirectory};
use validator::Validate;

use crate::dto::{AuthResponse, LoginRequest};
use crate::handlers::{handle_domain_error, handle_validation_errors};

use super::AppState;

/// Handler for POST /api/v1/auth/login
///
/// # Response
///
/// ## Success (200 OK)
/// `AuthResponse` body; the refresh token of a new session family is set as
/// an `HttpOnly` cookie.
///
/// ## Errors
/// - 400 Bad Request: Request validation failed
/// - 401 Unauthorized: Unknown email or wrong password
/// - 503 Service Unavailable: Session store unreachable
pub async fn login<U, R>(
    state: web::Data<AppState<U, R>>,
    request: web::Json<LoginRequest>,
) -> HttpResponse
where
    U: UserDirectory + 'static,
    R: SessionRepository + 'static,
{
    if let Err(errors) = request.validate() {
        return handle_validation_errors(&errors);
    }

    match state
        .auth_service
        .login(&request.email, &request.password)
        .await
    {
        Ok(outcome) => HttpResponse::Ok()
            .cookie(state.refresh_cookie.build(&outcome.session.token))
            .json(AuthResponse::from(outcome)),
        Err(error) => handle_domain_error(&error),
    }
}
