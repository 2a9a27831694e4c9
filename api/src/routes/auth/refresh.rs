use actix_web::{web, HttpRequest, HttpResponse};
use mk_core::errors::TokenError;
use mk_core::repositories::{SessionRepository, UserDirectory};
use tracing::info;

use crate::dto::{RefreshResponse, RefreshTokenRequest};
use crate::handlers::handle_domain_error;

use super::AppState;

/// Handler for POST /api/v1/auth/refresh
///
/// Rotates the refresh token and issues a new access token. The token is read
/// from the refresh cookie, or from the JSON body when no cookie was sent.
///
/// # Response
///
/// ## Success (200 OK)
/// `RefreshResponse` body; the rotated refresh token replaces the cookie.
///
/// ## Errors
/// - 401 Unauthorized (`must_reauthenticate`): Token missing, invalid,
///   expired, revoked or already rotated. The cookie is cleared.
/// - 503 Service Unavailable: Session store unreachable. The cookie is kept.
pub async fn refresh<U, R>(
    req: HttpRequest,
    state: web::Data<AppState<U, R>>,
    body: Option<web::Json<RefreshTokenRequest>>,
) -> HttpResponse
where
    U: UserDirectory + 'static,
    R: SessionRepository + 'static,
{
    let token = state.refresh_cookie.read(&req).or_else(|| {
        body.and_then(|body| body.into_inner().refresh_token)
            .filter(|token| !token.is_empty())
    });

    let token = match token {
        Some(token) => token,
        None => {
            info!("Refresh attempted without a refresh token");
            let response = handle_domain_error(&TokenError::RotationFailure.into());
            return state.refresh_cookie.clear_on(response);
        }
    };

    match state.auth_service.refresh(&token).await {
        Ok(outcome) => HttpResponse::Ok()
            .cookie(state.refresh_cookie.build(&outcome.session.token))
            .json(RefreshResponse::from(&outcome)),
        Err(error) => {
            let response = handle_domain_error(&error);
            if error.requires_reauthentication() {
                state.refresh_cookie.clear_on(response)
            } else {
                response
            }
        }
    }
}
