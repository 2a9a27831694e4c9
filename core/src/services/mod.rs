//! Business services containing domain logic and use cases.

pub mod auth;
pub mod events;
pub mod token;

// Re-export commonly used types
pub use auth::{AuthOutcome, AuthService, AuthServiceConfig, RefreshOutcome};
pub use events::{
    AccountEventPublisher, ChannelEventPublisher, EventPublishError, NoOpEventPublisher,
    TracingEventPublisher,
};
pub use token::{
    AccessTokenIssuer, CleanupResult, SessionCleanupConfig, SessionCleanupService,
    SessionManager, TokenServiceConfig,
};
