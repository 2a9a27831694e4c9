//! Error types for authentication and token handling

use thiserror::Error;

/// Authentication-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Unknown email or wrong password; the two are never distinguished
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Email already in use")]
    EmailTaken,

    #[error("User not found")]
    UserNotFound,

    #[error("Authentication required")]
    Unauthenticated,
}

/// Token-related errors
///
/// `InvalidCredential` deliberately carries no detail: signature mismatch,
/// malformed payload and expiry all collapse into it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Invalid or expired credential")]
    InvalidCredential,

    /// The refresh token could not be rotated; the client must log in again
    #[error("Refresh token rotation failed")]
    RotationFailure,

    #[error("Token generation failed")]
    TokenGenerationFailed,
}
