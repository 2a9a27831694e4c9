use std::collections::BTreeMap;

use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use validator::ValidationErrors;

pub use mk_shared::types::response::ErrorResponse;

/// actix-web helpers for the shared error body
pub trait ErrorResponseExt: Sized {
    fn to_response(&self, status: StatusCode) -> HttpResponse;

    /// `validation_error` body with the messages of each rejected field
    fn from_validation(errors: &ValidationErrors) -> Self;
}

impl ErrorResponseExt for ErrorResponse {
    fn to_response(&self, status: StatusCode) -> HttpResponse {
        HttpResponse::build(status).json(self)
    }

    fn from_validation(errors: &ValidationErrors) -> Self {
        let mut fields: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (field, field_errors) in errors.field_errors() {
            let messages = field_errors
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect();
            fields.insert(field.to_string(), messages);
        }

        ErrorResponse::new("validation_error", "Request validation failed")
            .with_detail("fields", serde_json::json!(fields))
    }
}
