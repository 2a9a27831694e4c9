use actix_web::HttpResponse;
use mk_shared::HealthResponse;

pub const SERVICE_NAME: &str = "milokhelo-auth";

/// Handler for GET /health
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse::healthy(
        SERVICE_NAME,
        env!("CARGO_PKG_VERSION"),
    ))
}
