use actix_web::{web, HttpResponse};
use mk_core::repositories::{SessionRepository, UserDirectory};

use crate::dto::MeResponse;
use crate::handlers::handle_domain_error;
use crate::middleware::auth::AuthContext;

use super::AppState;

/// Handler for GET /api/v1/auth/me
pub async fn me<U, R>(state: web::Data<AppState<U, R>>, auth: AuthContext) -> HttpResponse
where
    U: UserDirectory + 'static,
    R: SessionRepository + 'static,
{
    match state.auth_service.current_user(auth.user_id).await {
        Ok((user, preferences)) => HttpResponse::Ok().json(MeResponse {
            user: user.into(),
            preferences: preferences.into(),
        }),
        Err(error) => handle_domain_error(&error),
    }
}
