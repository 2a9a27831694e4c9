//! CORS middleware configuration for browser clients.
//!
//! The refresh token travels in a cookie, so every configuration allows
//! credentials. Development accepts any origin; production only the origins
//! listed in `ALLOWED_ORIGINS`.

use actix_cors::Cors;
use actix_web::http::{header, Method};
use mk_shared::Environment;
use std::env;
use tracing::info;

const DEFAULT_MAX_AGE: usize = 3600;

/// Creates a CORS middleware instance configured for the given environment.
///
/// # Environment Variables
/// - `ALLOWED_ORIGINS`: Comma-separated list of allowed origins (production only)
/// - `CORS_MAX_AGE`: Max age for preflight cache (default: 3600 seconds)
pub fn create_cors(environment: Environment) -> Cors {
    let max_age = env::var("CORS_MAX_AGE")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(DEFAULT_MAX_AGE);

    if environment.is_production() {
        let origins = env::var("ALLOWED_ORIGINS").unwrap_or_default();
        create_production_cors(&parse_origins(&origins), max_age)
    } else {
        create_development_cors(max_age)
    }
}

fn base_cors(max_age: usize) -> Cors {
    Cors::default()
        .allowed_methods(vec![
            Method::GET,
            Method::POST,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
        ])
        .expose_headers(vec![header::WWW_AUTHENTICATE])
        .max_age(max_age)
        .supports_credentials()
}

fn create_development_cors(max_age: usize) -> Cors {
    info!("Configuring CORS for development environment");
    base_cors(max_age).allow_any_origin()
}

fn create_production_cors(origins: &[String], max_age: usize) -> Cors {
    info!(origins = ?origins, "Configuring CORS for production environment");

    origins
        .iter()
        .fold(base_cors(max_age), |cors, origin| cors.allowed_origin(origin))
}

/// Split a comma-separated origin list, dropping blanks
fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(|origin| origin.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origins() {
        let origins = parse_origins("https://milokhelo.app, ,https://admin.milokhelo.app");
        assert_eq!(
            origins,
            vec![
                "https://milokhelo.app".to_string(),
                "https://admin.milokhelo.app".to_string()
            ]
        );
        assert!(parse_origins("").is_empty());
    }

    #[test]
    fn test_create_cors_for_each_environment() {
        let _development = create_cors(Environment::Development);
        let _production = create_production_cors(&["https://milokhelo.app".to_string()], 600);
    }
}
