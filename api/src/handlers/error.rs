use actix_web::{error::JsonPayloadError, http::StatusCode, HttpRequest, HttpResponse};
use mk_core::errors::{AuthError, DomainError, TokenError};
use tracing::{error, warn};
use validator::ValidationErrors;

use crate::dto::{ErrorResponse, ErrorResponseExt};

/// Status code and stable error code for a domain error
pub fn error_status(error: &DomainError) -> (StatusCode, &'static str) {
    match error {
        DomainError::Token(token_error) => match token_error {
            TokenError::InvalidCredential => (StatusCode::UNAUTHORIZED, "invalid_credential"),
            TokenError::RotationFailure => (StatusCode::UNAUTHORIZED, "must_reauthenticate"),
            TokenError::TokenGenerationFailed => {
                (StatusCode::INTERNAL_SERVER_ERROR, "token_generation_failed")
            }
        },
        DomainError::Auth(auth_error) => match auth_error {
            AuthError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "invalid_credentials"),
            AuthError::EmailTaken => (StatusCode::CONFLICT, "email_taken"),
            AuthError::UserNotFound => (StatusCode::NOT_FOUND, "user_not_found"),
            AuthError::Unauthenticated => (StatusCode::UNAUTHORIZED, "unauthenticated"),
        },
        DomainError::StoreUnavailable { .. } => {
            (StatusCode::SERVICE_UNAVAILABLE, "service_unavailable")
        }
        DomainError::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
        DomainError::Validation { .. } => (StatusCode::BAD_REQUEST, "validation_error"),
        DomainError::Conflict { .. } => (StatusCode::CONFLICT, "conflict"),
        DomainError::Internal { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
    }
}

/// Handle domain errors and convert them to appropriate HTTP responses
///
/// Store and internal failures are logged in full but reported with a
/// generic message.
pub fn handle_domain_error(error: &DomainError) -> HttpResponse {
    let (status, code) = error_status(error);

    let message = if status.is_server_error() {
        error!(error = ?error, "Request failed");
        match error {
            DomainError::StoreUnavailable { .. } => {
                "Service temporarily unavailable, please retry".to_string()
            }
            _ => "An internal error occurred".to_string(),
        }
    } else {
        warn!(code, error = %error, "Request rejected");
        error.to_string()
    };

    ErrorResponse::new(code, message).to_response(status)
}

/// 400 response for a request DTO that failed validation
pub fn handle_validation_errors(errors: &ValidationErrors) -> HttpResponse {
    warn!(errors = %errors, "Request validation failed");
    ErrorResponse::from_validation(errors).to_response(StatusCode::BAD_REQUEST)
}

/// Error handler installed on `web::JsonConfig`
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    warn!(path = %req.path(), error = %err, "Malformed JSON payload");

    let response = ErrorResponse::new("invalid_payload", err.to_string())
        .to_response(StatusCode::BAD_REQUEST);
    actix_web::error::InternalError::from_response(err, response).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_errors_map_to_unauthorized() {
        let (status, code) = error_status(&TokenError::RotationFailure.into());
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(code, "must_reauthenticate");

        let (status, code) = error_status(&TokenError::InvalidCredential.into());
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(code, "invalid_credential");
    }

    #[test]
    fn test_store_unavailable_maps_to_503() {
        let error = DomainError::StoreUnavailable {
            message: "pool timed out".to_string(),
        };
        let response = handle_domain_error(&error);
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_auth_errors() {
        assert_eq!(
            error_status(&AuthError::EmailTaken.into()).0,
            StatusCode::CONFLICT
        );
        assert_eq!(
            error_status(&AuthError::UserNotFound.into()).0,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            error_status(&AuthError::InvalidCredentials.into()).0,
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_generic_errors() {
        let not_found = DomainError::NotFound {
            resource: "session".to_string(),
        };
        assert_eq!(error_status(&not_found), (StatusCode::NOT_FOUND, "not_found"));

        let validation = DomainError::Validation {
            message: "bad".to_string(),
        };
        assert_eq!(error_status(&validation).0, StatusCode::BAD_REQUEST);

        let internal = DomainError::Internal {
            message: "boom".to_string(),
        };
        assert_eq!(
            handle_domain_error(&internal).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
