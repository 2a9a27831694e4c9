use std::sync::Arc;

use actix_web::{web, HttpServer};
use anyhow::Context;
use tracing::{info, warn};

use mk_api::app::create_app;
use mk_api::config::{self, Config};
use mk_api::routes::auth::{AppState, RefreshCookie};
use mk_core::services::{
    AccessTokenIssuer, AccountEventPublisher, AuthService, AuthServiceConfig,
    SessionCleanupConfig, SessionCleanupService, SessionManager, TokenServiceConfig,
    TracingEventPublisher,
};
use mk_infra::database::{DatabasePool, MySqlSessionRepository, MySqlUserDirectory};
use mk_shared::{Environment, LoggingConfig};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = config::load_dotenv();
    config::init_tracing(&LoggingConfig::from_env(Environment::from_env()));
    if let Err(e) = dotenv {
        warn!(error = %e, "Failed to read .env file");
    }

    let config = Config::from_env();
    info!(environment = %config.environment, "Starting MiloKhelo auth server");

    let pool = DatabasePool::new(config.database.clone())
        .await
        .context("Failed to connect to the database")?;
    if config.database.run_migrations {
        pool.run_migrations()
            .await
            .context("Failed to run database migrations")?;
    }

    let token_config = TokenServiceConfig::from(&config.auth);
    let events: Arc<dyn AccountEventPublisher> = Arc::new(TracingEventPublisher);

    let session_repository = Arc::new(MySqlSessionRepository::new(pool.get_pool().clone()));
    let directory = Arc::new(MySqlUserDirectory::new(pool.get_pool().clone()));

    let sessions = Arc::new(
        SessionManager::new(session_repository, &token_config).with_events(events.clone()),
    );
    let issuer = Arc::new(AccessTokenIssuer::new(&token_config));
    let auth_service = Arc::new(
        AuthService::new(
            directory,
            sessions.clone(),
            issuer.clone(),
            AuthServiceConfig::from(&token_config),
        )
        .with_events(events),
    );

    let cleanup = Arc::new(SessionCleanupService::new(
        sessions,
        SessionCleanupConfig::from(&config.maintenance),
    ));
    let cleanup_task = cleanup.start_background_task();

    let state = web::Data::new(AppState::new(
        auth_service,
        issuer,
        RefreshCookie::new(&config.auth.session, token_config.refresh_token_expiry_seconds),
    ));

    let environment = config.environment;
    let bind_address = config.server.bind_address();

    let mut server = HttpServer::new(move || create_app(state.clone(), environment));
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    info!(address = %bind_address, "Server listening");
    server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run()
        .await?;

    if let Some(task) = cleanup_task {
        task.abort();
    }
    pool.close().await;
    info!("Server stopped");

    Ok(())
}
