//! Error handling module

use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::netatmo::ResponseEnvelope;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Token acquisition failed ({status}): {message}")]
    TokenError { status: u16, message: String },

    #[error("Upstream request failed: {0}")]
    UpstreamError(#[from] reqwest::Error),
}

impl AppError {
    /// Envelope the caller sees for this failure
    pub fn to_envelope(&self) -> ResponseEnvelope {
        match self {
            AppError::BadRequest(msg) => {
                ResponseEnvelope::text(400, format!("Bad Request: {}", msg))
            }
            AppError::ConfigError(msg) => ResponseEnvelope::text(500, msg.clone()),
            AppError::TokenError { status, message } => {
                ResponseEnvelope::text(*status, message.clone())
            }
            AppError::UpstreamError(e) => ResponseEnvelope::from_transport_error(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::warn!("Request failed: {}", self);
        self.to_envelope().into_response()
    }
}
