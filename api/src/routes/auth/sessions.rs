use actix_web::{web, HttpRequest, HttpResponse};
use mk_core::repositories::{SessionRepository, UserDirectory};
use uuid::Uuid;

use crate::dto::{SessionResponse, SessionsResponse};
use crate::handlers::handle_domain_error;
use crate::middleware::auth::AuthContext;

use super::AppState;

/// Handler for GET /api/v1/auth/sessions
///
/// Lists the unrevoked sessions of the authenticated user, newest first. The
/// session whose cookie accompanied the request is flagged `current`.
pub async fn list_sessions<U, R>(
    req: HttpRequest,
    state: web::Data<AppState<U, R>>,
    auth: AuthContext,
) -> HttpResponse
where
    U: UserDirectory + 'static,
    R: SessionRepository + 'static,
{
    let current = state.refresh_cookie.read(&req);

    match state.auth_service.list_sessions(auth.user_id).await {
        Ok(records) => HttpResponse::Ok().json(SessionsResponse {
            sessions: records
                .iter()
                .map(|record| SessionResponse::from_record(record, current.as_deref()))
                .collect(),
        }),
        Err(error) => handle_domain_error(&error),
    }
}

/// Handler for DELETE /api/v1/auth/sessions/{id}
///
/// ## Errors
/// - 404 Not Found: No active session with that id belongs to the caller
pub async fn revoke_session<U, R>(
    state: web::Data<AppState<U, R>>,
    auth: AuthContext,
    path: web::Path<Uuid>,
) -> HttpResponse
where
    U: UserDirectory + 'static,
    R: SessionRepository + 'static,
{
    let session_id = path.into_inner();

    match state
        .auth_service
        .revoke_session(auth.user_id, session_id)
        .await
    {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "message": "Session revoked",
            "session_id": session_id,
        })),
        Err(error) => handle_domain_error(&error),
    }
}
