//! Netatmo forwarding handlers

use std::collections::HashMap;

use axum::{
    body::Bytes,
    extract::{Path, State},
};

use crate::error::AppError;
use crate::gateway::{EndpointMapping, GatewayState, RequestInput};
use crate::netatmo::ResponseEnvelope;

/// GET /netatmo/token - token response obtained at startup
pub async fn get_token(State(state): State<GatewayState>) -> ResponseEnvelope {
    state.vendor.token().await
}

/// Resolve `mapping` against the request and forward it to the vendor.
///
/// Missing required parameters are answered locally with a 400 envelope.
pub async fn forward(
    mapping: &'static EndpointMapping,
    state: GatewayState,
    path: Option<Path<HashMap<String, String>>>,
    query: HashMap<String, String>,
    body: Bytes,
) -> Result<ResponseEnvelope, AppError> {
    let mut input = RequestInput {
        path: path.map(|Path(p)| p).unwrap_or_default(),
        query,
        body: None,
    };
    if mapping.method.has_body() {
        input = input.with_body(&body)?;
    }

    let form = mapping.build_form(&input)?;

    tracing::debug!(
        "{} -> {} ({:?}, {} fields)",
        mapping.name,
        mapping.vendor,
        mapping.group,
        form.len()
    );

    Ok(state.vendor.call(mapping.vendor, form).await)
}
