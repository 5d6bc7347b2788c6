use axum_helpers::{
    cors_from_env, create_router,
    server::{create_production_app, health_router},
};
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_users::PgUserRepository;
use tracing::info;

mod api;
mod config;
mod events;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    let config = Config::from_env()?;

    // Initialize tracing with ErrorLayer for span trace capture
    init_tracing(&config.environment);
    info!(
        app = config.app.name,
        version = config.app.version,
        "Starting users API"
    );

    let db = database::postgres::connect_from_config_with_retry(config.database.clone(), None)
        .await
        .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))?;

    PgUserRepository::new(db.clone())
        .ensure_schema()
        .await
        .map_err(|e| eyre::eyre!("Failed to prepare users schema: {}", e))?;

    // Without NATS, events are only logged
    let events = match config.nats_url.as_deref() {
        Some(url) => {
            info!("Connecting to NATS at {}", url);
            match async_nats::connect(url).await {
                Ok(client) => {
                    info!("NATS connected successfully");
                    Some(events::NatsNotifier::new(client))
                }
                Err(e) => {
                    tracing::warn!("Failed to connect to NATS: {}", e);
                    None
                }
            }
        }
        None => None,
    };

    let state = AppState { config, db, events };

    let cors = cors_from_env(&state.config.environment)?;
    let router = create_router::<openapi::ApiDoc>(api::routes(&state), cors);

    // - /health: liveness check with app name/version
    // - /ready: readiness check against the database
    let app = router
        .merge(health_router(state.config.app))
        .merge(api::ready_router(state.clone()));

    let server = state.config.server.clone();
    create_production_app(app, &server, async move {
        info!("Shutting down: closing database connections");
        match state.db.close().await {
            Ok(_) => info!("PostgreSQL connection closed successfully"),
            Err(e) => tracing::error!("Error closing PostgreSQL: {}", e),
        }
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Users API shutdown complete");
    Ok(())
}
