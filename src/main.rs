//! Kindergarten back office
//!
//! Main application entry point

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use tracing::{error, info};

use kindergarten_office::{
    config::Settings,
    create_router,
    database::{connection, DatabaseService, PoolConfig},
    utils::logging,
    AppState, ServiceFactory,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new().context("failed to load configuration")?;
    settings.validate().context("invalid configuration")?;

    // Initialize logging; the guard flushes the file writer on exit
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}...", kindergarten_office::info());

    // Initialize database connection
    info!("Connecting to database...");
    let pool = connection::create_pool(&PoolConfig::from(&settings.database))
        .await
        .context("failed to connect to the database")?;

    // Run database migrations
    info!("Running database migrations...");
    connection::run_migrations(&pool).await?;

    // Initialize services
    let database = DatabaseService::new(pool);
    let services = ServiceFactory::new(database, &settings);

    let address = settings.bind_address();
    let cleanup_every = Duration::from_secs(settings.rate_limit.cleanup_interval_seconds);
    let state = AppState::new(services, settings);

    // Drop idle rate limit entries in the background
    let cleanup = state.rate_limiter.spawn_cleanup(cleanup_every);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {}", address))?;
    info!(address = %address, "Kindergarten back office is ready");

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    cleanup.abort();
    info!("Kindergarten back office has been shut down.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for Ctrl-C");
    }
    info!("Shutdown signal received");
}
