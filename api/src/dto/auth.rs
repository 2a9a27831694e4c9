use chrono::{DateTime, Utc};
use mk_core::domain::{NotificationPreferences, RefreshTokenRecord, UserIdentity};
use mk_core::services::{AuthOutcome, RefreshOutcome};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

const TOKEN_TYPE: &str = "Bearer";

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1))]
    pub password: String,
}

/// Body fallback for clients that cannot send the refresh cookie
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RefreshTokenRequest {
    #[serde(default)]
    pub refresh_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<UserIdentity> for UserResponse {
    fn from(user: UserIdentity) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

/// Returned by register and login; the refresh token travels in a cookie
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
    pub user: UserResponse,
}

impl From<AuthOutcome> for AuthResponse {
    fn from(outcome: AuthOutcome) -> Self {
        Self {
            access_token: outcome.access_token,
            token_type: TOKEN_TYPE.to_string(),
            expires_in: outcome.access_expires_in,
            user: outcome.user.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

impl From<&RefreshOutcome> for RefreshResponse {
    fn from(outcome: &RefreshOutcome) -> Self {
        Self {
            access_token: outcome.access_token.clone(),
            token_type: TOKEN_TYPE.to_string(),
            expires_in: outcome.access_expires_in,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogoutResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogoutAllResponse {
    pub message: String,
    pub revoked_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub id: Uuid,
    pub family_id: Uuid,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    /// Whether this is the session whose cookie came with the request
    pub current: bool,
}

impl SessionResponse {
    pub fn from_record(record: &RefreshTokenRecord, current_token: Option<&str>) -> Self {
        Self {
            id: record.id,
            family_id: record.family_id,
            issued_at: record.issued_at,
            expires_at: record.expires_at,
            current: current_token == Some(record.token_value.as_str()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionsResponse {
    pub sessions: Vec<SessionResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreferencesResponse {
    pub receive_match_reminders: bool,
    pub receive_email_notifications: bool,
}

impl From<NotificationPreferences> for PreferencesResponse {
    fn from(preferences: NotificationPreferences) -> Self {
        Self {
            receive_match_reminders: preferences.receive_match_reminders,
            receive_email_notifications: preferences.receive_email_notifications,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeResponse {
    pub user: UserResponse,
    pub preferences: PreferencesResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_validation() {
        let valid = RegisterRequest {
            name: "Asha".to_string(),
            email: "asha@example.com".to_string(),
            password: "long-enough".to_string(),
        };
        assert!(valid.validate().is_ok());

        let invalid = RegisterRequest {
            name: String::new(),
            email: "not-an-email".to_string(),
            password: "short".to_string(),
        };
        let errors = invalid.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn test_refresh_request_accepts_empty_body() {
        let request: RefreshTokenRequest = serde_json::from_str("{}").unwrap();
        assert!(request.refresh_token.is_none());
    }

    #[test]
    fn test_session_response_marks_current() {
        let record = RefreshTokenRecord::issue_now("abc".to_string(), Uuid::new_v4(), Uuid::new_v4());

        assert!(SessionResponse::from_record(&record, Some("abc")).current);
        assert!(!SessionResponse::from_record(&record, Some("other")).current);
        assert!(!SessionResponse::from_record(&record, None).current);
    }
}
