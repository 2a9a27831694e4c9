//! Persisted refresh-token records and their lifecycle.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::token::REFRESH_TOKEN_EXPIRY_DAYS;

/// Why a refresh token was revoked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevocationReason {
    /// Single-device logout
    Logout,
    /// "Log out everywhere"
    LogoutAll,
    /// Replaced by its successor during a refresh
    Rotated,
    /// Family revoked after a rotated token was replayed
    Compromise,
    /// Swept by maintenance after passing its expiry
    Expired,
    /// Revoked by the user from the active-sessions list
    ManualRevoke,
}

impl RevocationReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RevocationReason::Logout => "logout",
            RevocationReason::LogoutAll => "logout_all",
            RevocationReason::Rotated => "rotated",
            RevocationReason::Compromise => "compromise",
            RevocationReason::Expired => "expired",
            RevocationReason::ManualRevoke => "manual_revoke",
        }
    }
}

impl fmt::Display for RevocationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RevocationReason {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "logout" => Ok(RevocationReason::Logout),
            "logout_all" => Ok(RevocationReason::LogoutAll),
            "rotated" => Ok(RevocationReason::Rotated),
            "compromise" => Ok(RevocationReason::Compromise),
            "expired" => Ok(RevocationReason::Expired),
            "manual_revoke" => Ok(RevocationReason::ManualRevoke),
            other => Err(format!("Unknown revocation reason: {}", other)),
        }
    }
}

/// One issued refresh credential as stored in the database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshTokenRecord {
    /// Unique identifier for the record
    pub id: Uuid,

    /// Serialized, signed refresh token; globally unique
    pub token_value: String,

    /// User this token belongs to
    pub user_id: Uuid,

    /// Rotation family, inherited unchanged by every successor
    pub family_id: Uuid,

    pub issued_at: DateTime<Utc>,

    pub expires_at: DateTime<Utc>,

    pub is_revoked: bool,

    pub revoked_at: Option<DateTime<Utc>>,

    pub revoked_reason: Option<RevocationReason>,
}

impl RefreshTokenRecord {
    /// Creates an active record with a fresh id
    pub fn new(
        token_value: String,
        user_id: Uuid,
        family_id: Uuid,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            token_value,
            user_id,
            family_id,
            issued_at,
            expires_at,
            is_revoked: false,
            revoked_at: None,
            revoked_reason: None,
        }
    }

    /// Creates an active record issued now with the default 7-day lifetime
    pub fn issue_now(token_value: String, user_id: Uuid, family_id: Uuid) -> Self {
        let now = Utc::now();
        Self::new(
            token_value,
            user_id,
            family_id,
            now,
            now + Duration::days(REFRESH_TOKEN_EXPIRY_DAYS),
        )
    }

    /// Checks if the record has expired at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Marks the record revoked
    ///
    /// Returns `false` without touching the record when it is already
    /// revoked: `revoked_at` and `revoked_reason` are written exactly once.
    pub fn revoke(&mut self, reason: RevocationReason, at: DateTime<Utc>) -> bool {
        if self.is_revoked {
            return false;
        }
        self.is_revoked = true;
        self.revoked_at = Some(at);
        self.revoked_reason = Some(reason);
        true
    }

    /// True when this record was revoked by rotation
    pub fn was_rotated(&self) -> bool {
        self.revoked_reason == Some(RevocationReason::Rotated)
    }
}

/// Result of issuing a refresh token
///
/// Never carries signing material, only the credential and its metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedSession {
    pub token: String,
    pub user_id: Uuid,
    pub family_id: Uuid,
    pub record_id: Uuid,
    pub token_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

impl IssuedSession {
    /// Seconds until this session's refresh token expires
    pub fn expires_in_seconds(&self) -> i64 {
        (self.expires_at - Utc::now()).num_seconds().max(0)
    }
}

/// A refresh token accepted by both the signature check and the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSession {
    pub user_id: Uuid,
    pub record: RefreshTokenRecord,
}
