//! outbox-reset-gateway server entry point.
//!
//! Starts the Axum HTTP server with the outbox control endpoints.

use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use outbox_reset_gateway::api;
use outbox_reset_gateway::app_state::AppState;
use outbox_reset_gateway::config::GatewayConfig;
use outbox_reset_gateway::domain::PoolRegistry;
use outbox_reset_gateway::etcd::EtcdResolver;
use outbox_reset_gateway::service::OutboxService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = GatewayConfig::from_env()?;
    tracing::info!(addr = %config.listen_addr, "starting outbox-reset-gateway");
    if config.etcd.endpoint.is_none() {
        tracing::warn!("ETCD_ENDPOINT not set; every request will fail until it is configured");
    }

    // Build domain and service layers
    let resolver = EtcdResolver::new(config.etcd.clone());
    let registry = Arc::new(PoolRegistry::new());
    let service = Arc::new(OutboxService::new(resolver, registry));

    // Build application state
    let app_state = AppState { service };

    // Build router
    let app = Router::new()
        .merge(api::build_router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
