//! Security middleware for enforcing HTTPS and response security headers.
//!
//! In production, plain-HTTP requests are refused unless a trusted proxy
//! reports `X-Forwarded-Proto: https`, and every response carries HSTS and
//! related headers. Malformed `Origin` headers are refused in every environment.

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::{
        header::{self, HeaderName, HeaderValue},
        StatusCode,
    },
    Error,
};
use futures_util::future::LocalBoxFuture;
use mk_shared::Environment;
use std::{
    env,
    future::{ready, Ready},
    rc::Rc,
    task::{Context, Poll},
};
use tracing::{info, warn};

use crate::dto::{ErrorResponse, ErrorResponseExt};

/// Security middleware factory
#[derive(Debug, Clone)]
pub struct SecurityMiddleware {
    /// Whether plain-HTTP requests are refused
    enforce_https: bool,
    add_security_headers: bool,
    /// Peers whose X-Forwarded-Proto header is believed
    trusted_proxies: Vec<String>,
}

impl SecurityMiddleware {
    /// Environment-based configuration; `TRUSTED_PROXIES` lists proxy addresses
    pub fn for_environment(environment: Environment) -> Self {
        let production = environment.is_production();
        let trusted_proxies = env::var("TRUSTED_PROXIES")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let middleware = Self {
            enforce_https: production,
            add_security_headers: production,
            trusted_proxies,
        };
        info!(
            enforce_https = middleware.enforce_https,
            add_headers = middleware.add_security_headers,
            trusted_proxies = ?middleware.trusted_proxies,
            "Security middleware configured"
        );
        middleware
    }

    /// No HTTPS enforcement, no extra headers
    pub fn development() -> Self {
        Self {
            enforce_https: false,
            add_security_headers: false,
            trusted_proxies: vec!["127.0.0.1".to_string(), "::1".to_string()],
        }
    }

    /// Full enforcement
    pub fn production() -> Self {
        Self {
            enforce_https: true,
            add_security_headers: true,
            trusted_proxies: vec![],
        }
    }

    pub fn with_trusted_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.trusted_proxies.push(proxy.into());
        self
    }
}

impl<S, B> Transform<S, ServiceRequest> for SecurityMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = SecurityMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SecurityMiddlewareService {
            service: Rc::new(service),
            enforce_https: self.enforce_https,
            add_security_headers: self.add_security_headers,
            trusted_proxies: Rc::new(self.trusted_proxies.clone()),
        }))
    }
}

/// Security middleware service implementation
pub struct SecurityMiddlewareService<S> {
    service: Rc<S>,
    enforce_https: bool,
    add_security_headers: bool,
    trusted_proxies: Rc<Vec<String>>,
}

impl<S, B> Service<ServiceRequest> for SecurityMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if self.enforce_https && !is_secure_request(&req, &self.trusted_proxies) {
            warn!(method = %req.method(), path = %req.path(), "Insecure request blocked");
            return Box::pin(async move {
                Ok(reject(req, StatusCode::FORBIDDEN, "https_required", "HTTPS required"))
            });
        }

        let invalid_origin = req
            .headers()
            .get(header::ORIGIN)
            .filter(|origin| !is_valid_origin(origin))
            .cloned();
        if let Some(origin) = invalid_origin {
            warn!(
                origin = ?origin,
                method = %req.method(),
                path = %req.path(),
                "Invalid origin blocked"
            );
            return Box::pin(async move {
                Ok(reject(
                    req,
                    StatusCode::BAD_REQUEST,
                    "invalid_origin",
                    "Invalid request origin",
                ))
            });
        }

        let service = Rc::clone(&self.service);
        let add_security_headers = self.add_security_headers;

        Box::pin(async move {
            let mut response = service.call(req).await?;
            if add_security_headers {
                add_security_response_headers(&mut response);
            }
            Ok(response.map_into_left_body())
        })
    }
}

fn reject<B>(
    req: ServiceRequest,
    status: StatusCode,
    code: &str,
    message: &str,
) -> ServiceResponse<EitherBody<B>> {
    let response = ErrorResponse::new(code, message).to_response(status);
    req.into_response(response).map_into_right_body()
}

/// Checks if the request is secure (HTTPS or forwarded by a trusted proxy)
fn is_secure_request(req: &ServiceRequest, trusted_proxies: &[String]) -> bool {
    let conn_info = req.connection_info();
    if conn_info.scheme() == "https" {
        return true;
    }

    if let Some(forwarded_proto) = req.headers().get("x-forwarded-proto") {
        if let Ok(proto) = forwarded_proto.to_str() {
            let peer_addr = conn_info.peer_addr().unwrap_or("");
            if is_trusted_proxy(peer_addr, trusted_proxies) && proto == "https" {
                return true;
            }
        }
    }

    false
}

/// Checks if the given peer address is in the trusted proxy list
fn is_trusted_proxy(peer_addr: &str, trusted_proxies: &[String]) -> bool {
    let ip = peer_addr
        .rsplit_once(':')
        .map(|(ip, _)| ip.trim_matches(|c| c == '[' || c == ']'))
        .unwrap_or(peer_addr);

    trusted_proxies
        .iter()
        .any(|trusted| trusted == ip || trusted == peer_addr)
}

/// An origin must be an http(s) URL; allow-listing is left to CORS
fn is_valid_origin(origin: &HeaderValue) -> bool {
    origin
        .to_str()
        .map(|o| o.starts_with("http://") || o.starts_with("https://"))
        .unwrap_or(false)
}

fn add_security_response_headers<B>(response: &mut ServiceResponse<B>) {
    let headers = response.headers_mut();

    headers.insert(
        HeaderName::from_static("strict-transport-security"),
        HeaderValue::from_static("max-age=31536000; includeSubDomains"),
    );
    headers.insert(
        HeaderName::from_static("x-content-type-options"),
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(
        HeaderName::from_static("x-frame-options"),
        HeaderValue::from_static("DENY"),
    );
    headers.insert(
        HeaderName::from_static("referrer-policy"),
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
    headers.insert(
        HeaderName::from_static("content-security-policy"),
        HeaderValue::from_static("default-src 'none'; frame-ancestors 'none';"),
    );
    // Token responses must never be cached
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
}
