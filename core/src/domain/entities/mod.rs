//! Domain entities representing core business objects.

pub mod session;
pub mod token;
pub mod user;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use session::{IssuedSession, RefreshTokenRecord, RevocationReason, ValidatedSession};
pub use token::{
    AccessClaims, AuthenticatedUser, RefreshClaims, ACCESS_AUDIENCE, ACCESS_TOKEN_EXPIRY_MINUTES,
    JWT_ISSUER, REFRESH_AUDIENCE, REFRESH_TOKEN_EXPIRY_DAYS,
};
pub use user::{NewUser, NotificationPreferences, UserIdentity};
