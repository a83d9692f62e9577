//! HTTP handlers module

mod netatmo;

pub use self::netatmo::*;

use axum::{extract::State, response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::gateway::{GatewayState, ENDPOINTS};

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub routes: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_expires_at: Option<DateTime<Utc>>,
}

/// Health check handler
pub async fn health_check(State(state): State<GatewayState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: "netatmo-gateway".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        routes: ENDPOINTS.len(),
        token_expires_at: state.vendor.token_expires_at().await,
    })
}
