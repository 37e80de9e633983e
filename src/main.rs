//! Server binary: pool up, registry built, routes mounted under /api.

use axum::Router;
use farmacia_api::{
    common_routes, pharmacy_registry, record_routes, AppState, DbGateway, Settings,
};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("farmacia_api=info")),
        )
        .init();

    let settings = Settings::from_env();
    let registry = pharmacy_registry()?;
    tracing::info!(tables = registry.len(), "table registry built");

    let gateway = DbGateway::connect(&settings).await?;
    let state = AppState::new(gateway.clone(), registry);

    // The dashboard runs on another origin.
    let api = Router::new()
        .merge(common_routes(state.clone()))
        .merge(record_routes(state));
    let app = Router::new()
        .nest("/api", api)
        .layer(CorsLayer::permissive());

    let listener = TcpListener::bind(("0.0.0.0", settings.port)).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    gateway.close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("shutdown signal: {e}");
    }
}
