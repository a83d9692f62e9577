//! netatmo-gateway - authenticated REST gateway for the Netatmo cloud API
//!
//! Re-exposes weather, energy, security, air-care and enterprise endpoints
//! under `/netatmo/...`, attaching a shared OAuth2 access token and
//! normalizing every vendor answer into a `{status, message}` envelope.

mod api;
mod config;
mod error;
mod gateway;
mod netatmo;

use std::net::SocketAddr;
use std::sync::Arc;

use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::gateway::{ApiGroup, GatewayState, ENDPOINTS};
use crate::netatmo::NetatmoClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "netatmo_gateway=info,tower_http=debug".into()),
        )
        .init();

    tracing::info!("Starting netatmo-gateway...");

    // Load configuration
    let config = config::Config::load()?;
    tracing::info!("Configuration loaded: {:?}", config.netatmo);

    // Log in before accepting traffic
    let scope = config
        .netatmo
        .scope
        .clone()
        .unwrap_or_else(ApiGroup::combined_scope);
    let client = NetatmoClient::connect(&config.netatmo, scope).await?;
    tracing::info!(
        "Netatmo token acquired for scope \"{}\"",
        client.tokens().scope()
    );

    let state = GatewayState::new(Arc::new(client));

    // Build application router
    let cors = CorsLayer::permissive();

    let app = api::routes().with_state(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors),
    );
    tracing::info!("Registered {} Netatmo routes", ENDPOINTS.len());

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
