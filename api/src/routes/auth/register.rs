use actix_web::{web, HttpResponse};
use mk_core::domain::NewUser;
use mk_core::repositories::{SessionRepository, UserDirectory};
use validator::Validate;

use crate::dto::{AuthResponse, RegisterRequest};
use crate::handlers::{handle_domain_error, handle_validation_errors};

use super::AppState;

/// Handler for POST /api/v1/auth/register
///
/// Creates an account and signs it in.
///
/// # Response
///
/// ## Success (201 Created)
/// `AuthResponse` body; the refresh token is set as an `HttpOnly` cookie.
///
/// ## Errors
/// - 400 Bad Request: Request validation failed
/// - 409 Conflict: Email already registered
/// - 503 Service Unavailable: Session store unreachable
pub async fn register<U, R>(
    state: web::Data<AppState<U, R>>,
    request: web::Json<RegisterRequest>,
) -> HttpResponse
where
    U: UserDirectory + 'static,
    R: SessionRepository + 'static,
{
    if let Err(errors) = request.validate() {
        return handle_validation_errors(&errors);
    }

    let RegisterRequest {
        name,
        email,
        password,
    } = request.into_inner();

    match state
        .auth_service
        .register(NewUser::new(name, email, password))
        .await
    {
        Ok(outcome) => HttpResponse::Created()
            .cookie(state.refresh_cookie.build(&outcome.session.token))
            .json(AuthResponse::from(outcome)),
        Err(error) => handle_domain_error(&error),
    }
}
