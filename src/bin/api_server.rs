// API Server Binary Entry Point
//
// Purpose: load the course catalog, build its views, then serve it with Axum
// Usage: cargo run --bin api_server

use course_catalog_api::{AppState, ServerConfig, create_router};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (structured logging)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    // Default log level: info for our crate, warn for others
                    "course_catalog_api=info,tower_http=debug,axum=debug,warn".into()
                }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting API server...");

    let config = ServerConfig::from_env();
    tracing::info!("Configuration:");
    tracing::info!("  CATALOG_PATH: {}", config.catalog_path.display());
    tracing::info!("  HOST: {}", config.host);
    tracing::info!("  PORT: {}", config.port);

    // Catalog must be fully loaded before anything is served
    let state = AppState::new(&config)?;
    tracing::info!("Application state initialized ({} sections)", state.catalog.len());

    let app = create_router(state);

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .await?;

    Ok(())
}
