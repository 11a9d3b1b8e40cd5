use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use jobly_api::config;
use jobly_api::database::{DatabaseManager, PgStorage};
use jobly_api::routes;
use jobly_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, SECRET_KEY, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("jobly_api=info,tower_http=info")),
        )
        .init();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();
    info!("Starting Jobly API in {:?} mode", config.environment);

    let pool = DatabaseManager::connect(config).await?;
    let storage = Arc::new(PgStorage::new(pool, &config.database));
    let state = AppState::new(Arc::new(config.clone()), storage);

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let listener = TcpListener::bind(&bind_addr).await?;
    info!("Jobly API listening on http://{}", bind_addr);

    axum::serve(listener, routes::app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
