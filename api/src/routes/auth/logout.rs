use actix_web::{web, HttpRequest, HttpResponse};
use mk_core::repositories::{SessionRepository, UserDirectory};
use tracing::info;

use crate::dto::{LogoutAllResponse, LogoutResponse, RefreshTokenRequest};
use crate::handlers::handle_domain_error;
use crate::middleware::auth::AuthContext;

use super::AppState;

/// Handler for POST /api/v1/auth/logout
///
/// Revokes the session of the presented refresh token, if any, and clears
/// the cookie. Logging out without a session still succeeds.
///
/// ## Errors
/// - 503 Service Unavailable: Session store unreachable
pub async fn logout<U, R>(
    req: HttpRequest,
    state: web::Data<AppState<U, R>>,
    body: Option<web::Json<RefreshTokenRequest>>,
) -> HttpResponse
where
    U: UserDirectory + 'static,
    R: SessionRepository + 'static,
{
    let token = state
        .refresh_cookie
        .read(&req)
        .or_else(|| body.and_then(|body| body.into_inner().refresh_token));

    match state.auth_service.logout(token.as_deref()).await {
        Ok(revoked) => {
            info!(revoked, "Logout");
            let response = HttpResponse::Ok().json(LogoutResponse {
                message: "Logged out successfully".to_string(),
            });
            state.refresh_cookie.clear_on(response)
        }
        Err(error) => handle_domain_error(&error),
    }
}

/// Handler for POST /api/v1/auth/logout-all
///
/// Revokes every session of the authenticated user.
///
/// # Headers
///
/// ```text
/// Authorization: Bearer {access_token}
/// ```
pub async fn logout_all<U, R>(
    state: web::Data<AppState<U, R>>,
    auth: AuthContext,
) -> HttpResponse
where
    U: UserDirectory + 'static,
    R: SessionRepository + 'static,
{
    match state.auth_service.logout_all(auth.user_id).await {
        Ok(revoked_count) => {
            let response = HttpResponse::Ok().json(LogoutAllResponse {
                message: "Logged out of all sessions".to_string(),
                revoked_count,
            });
            state.refresh_cookie.clear_on(response)
        }
        Err(error) => handle_domain_error(&error),
    }
}
