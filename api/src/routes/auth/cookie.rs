//! The refresh-token cookie

use actix_web::cookie::{time::Duration, Cookie, SameSite};
use actix_web::{HttpRequest, HttpResponse};
use mk_shared::SessionConfig;
use tracing::warn;

/// Builds, reads and clears the cookie carrying the refresh token
#[derive(Debug, Clone)]
pub struct RefreshCookie {
    name: String,
    secure: bool,
    http_only: bool,
    same_site: SameSite,
    max_age_seconds: i64,
}

impl RefreshCookie {
    /// # Arguments
    ///
    /// * `config` - Cookie attributes
    /// * `max_age_seconds` - Refresh token lifetime
    pub fn new(config: &SessionConfig, max_age_seconds: i64) -> Self {
        Self {
            name: config.cookie_name.clone(),
            secure: config.secure,
            http_only: config.http_only,
            same_site: parse_same_site(&config.same_site),
            max_age_seconds,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Cookie carrying a freshly issued refresh token
    pub fn build(&self, token: &str) -> Cookie<'static> {
        self.base(token.to_string())
            .max_age(Duration::seconds(self.max_age_seconds))
            .finish()
    }

    /// Expired cookie with the same attributes, instructing the client to drop it
    pub fn removal(&self) -> Cookie<'static> {
        self.base(String::new()).max_age(Duration::ZERO).finish()
    }

    /// Refresh token sent with the request, if any
    pub fn read(&self, req: &HttpRequest) -> Option<String> {
        req.cookie(&self.name)
            .map(|cookie| cookie.value().to_string())
            .filter(|value| !value.is_empty())
    }

    /// Attach the removal cookie to an already built response
    pub fn clear_on(&self, mut response: HttpResponse) -> HttpResponse {
        if let Err(e) = response.add_cookie(&self.removal()) {
            warn!(error = %e, "Failed to attach refresh cookie removal");
        }
        response
    }

    fn base(&self, value: String) -> actix_web::cookie::CookieBuilder<'static> {
        Cookie::build(self.name.clone(), value)
            .path("/")
            .http_only(self.http_only)
            .secure(self.secure)
            .same_site(self.same_site)
    }
}

fn parse_same_site(value: &str) -> SameSite {
    match value.to_ascii_lowercase().as_str() {
        "lax" => SameSite::Lax,
        "none" => SameSite::None,
        "strict" => SameSite::Strict,
        other => {
            warn!(value = other, "Unknown SameSite value, using Strict");
            SameSite::Strict
        }
    }
}
