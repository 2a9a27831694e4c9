mod concurrency_tests;
mod issuer_tests;

use std::sync::Arc;

use crate::repositories::InMemorySessionRepository;

use super::{SessionManager, TokenServiceConfig};

pub(crate) fn test_config() -> TokenServiceConfig {
    TokenServiceConfig {
        access_secret: "test-access-secret".to_string(),
        refresh_secret: "test-refresh-secret".to_string(),
        ..TokenServiceConfig::default()
    }
}

pub(crate) fn session_manager() -> (
    Arc<InMemorySessionRepository>,
    SessionManager<InMemorySessionRepository>,
) {
    let repository = Arc::new(InMemorySessionRepository::new());
    let manager = SessionManager::new(repository.clone(), &test_config());
    (repository, manager)
}
