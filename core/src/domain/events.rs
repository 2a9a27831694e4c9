//! Outbound account events consumed by the notification side of the system.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::entities::RevocationReason;

/// Something that happened to an account or one of its sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AccountEvent {
    UserRegistered {
        user_id: Uuid,
        email: String,
        at: DateTime<Utc>,
    },
    UserLoggedIn {
        user_id: Uuid,
        family_id: Uuid,
        at: DateTime<Utc>,
    },
    SessionCreated {
        user_id: Uuid,
        family_id: Uuid,
        record_id: Uuid,
        at: DateTime<Utc>,
    },
    SessionRotated {
        user_id: Uuid,
        family_id: Uuid,
        previous_id: Uuid,
        record_id: Uuid,
        at: DateTime<Utc>,
    },
    SessionRevoked {
        user_id: Uuid,
        record_id: Uuid,
        reason: RevocationReason,
        at: DateTime<Utc>,
    },
    AllSessionsRevoked {
        user_id: Uuid,
        count: u64,
        reason: RevocationReason,
        at: DateTime<Utc>,
    },
    FamilyRevoked {
        family_id: Uuid,
        count: u64,
        reason: RevocationReason,
        at: DateTime<Utc>,
    },
    /// A rotated-away refresh token was presented again
    SessionCompromised {
        user_id: Uuid,
        family_id: Uuid,
        record_id: Uuid,
        at: DateTime<Utc>,
    },
    ExpiredSessionsPurged {
        count: u64,
        at: DateTime<Utc>,
    },
}

impl AccountEvent {
    /// Stable event name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            AccountEvent::UserRegistered { .. } => "user_registered",
            AccountEvent::UserLoggedIn { .. } => "user_logged_in",
            AccountEvent::SessionCreated { .. } => "session_created",
            AccountEvent::SessionRotated { .. } => "session_rotated",
            AccountEvent::SessionRevoked { .. } => "session_revoked",
            AccountEvent::AllSessionsRevoked { .. } => "all_sessions_revoked",
            AccountEvent::FamilyRevoked { .. } => "family_revoked",
            AccountEvent::SessionCompromised { .. } => "session_compromised",
            AccountEvent::ExpiredSessionsPurged { .. } => "expired_sessions_purged",
        }
    }

    /// User the event concerns, when it concerns one
    pub fn user_id(&self) -> Option<Uuid> {
        match self {
            AccountEvent::UserRegistered { user_id, .. }
            | AccountEvent::UserLoggedIn { user_id, .. }
            | AccountEvent::SessionCreated { user_id, .. }
            | AccountEvent::SessionRotated { user_id, .. }
            | AccountEvent::SessionRevoked { user_id, .. }
            | AccountEvent::AllSessionsRevoked { user_id, .. }
            | AccountEvent::SessionCompromised { user_id, .. } => Some(*user_id),
            AccountEvent::FamilyRevoked { .. } | AccountEvent::ExpiredSessionsPurged { .. } => {
                None
            }
        }
    }
}
