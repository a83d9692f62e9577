//! API module - HTTP handlers and routes

pub mod handlers;

use std::collections::HashMap;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    routing::{get, on},
    Router,
};

use crate::gateway::{GatewayState, ENDPOINTS};

pub fn routes() -> Router<GatewayState> {
    let mut router = Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Authentication
        .route("/netatmo/token", get(handlers::get_token));

    // Vendor endpoints, one route per mapping
    for mapping in ENDPOINTS {
        router = router.route(
            mapping.path,
            on(
                mapping.method.filter(),
                move |State(state): State<GatewayState>,
                      path: Option<Path<HashMap<String, String>>>,
                      Query(query): Query<HashMap<String, String>>,
                      body: Bytes| {
                    handlers::forward(mapping, state, path, query, body)
                },
            ),
        );
    }

    router
}
