//! Identity values returned by the user directory.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user as seen by the authentication core; never carries password material
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// Per-user notification flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPreferences {
    pub receive_match_reminders: bool,
    pub receive_email_notifications: bool,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            receive_match_reminders: true,
            receive_email_notifications: true,
        }
    }
}

/// Registration input handed to the user directory, which owns hashing
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl NewUser {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into().trim().to_lowercase(),
            password: password.into(),
        }
    }
}
