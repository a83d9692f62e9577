//! Uniform `{status, message}` envelope for every gateway response

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::{ser::PrettyFormatter, Serializer, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub status: u16,
    pub message: Value,
}

/// Human-readable message for a non-200 vendor status
pub fn status_message(code: u16) -> &'static str {
    match code {
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        504 => "Gateway Time-out",
        _ => reqwest::StatusCode::from_u16(code)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("Unknown Status"),
    }
}

impl ResponseEnvelope {
    pub fn new(status: u16, message: Value) -> Self {
        Self { status, message }
    }

    pub fn text(status: u16, message: impl Into<String>) -> Self {
        Self::new(status, Value::String(message.into()))
    }

    pub fn from_status(status: u16) -> Self {
        Self::text(status, status_message(status))
    }

    /// Normalize a raw vendor answer.
    ///
    /// 200 passes the JSON body through untouched (or the raw text when the
    /// body is not JSON); every other status collapses to its fixed message.
    pub fn from_body(status: u16, body: &[u8]) -> Self {
        if status != 200 {
            return Self::from_status(status);
        }

        match serde_json::from_slice::<Value>(body) {
            Ok(json) => Self::new(status, json),
            Err(e) => {
                tracing::warn!("[Netatmo] 200 response is not JSON: {}", e);
                Self::text(status, String::from_utf8_lossy(body))
            }
        }
    }

    pub async fn from_response(resp: reqwest::Response) -> Self {
        let status = resp.status().as_u16();
        match resp.bytes().await {
            Ok(body) => Self::from_body(status, &body),
            Err(e) => Self::from_transport_error(&e),
        }
    }

    /// Envelope for a call that never produced a vendor status
    pub fn from_transport_error(e: &reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::from_status(504)
        } else {
            Self::from_status(502)
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == 200
    }

    /// Four-space indented JSON
    pub fn to_pretty_json(&self) -> String {
        let mut buf = Vec::new();
        let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
        match self.serialize(&mut ser) {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(e) => {
                tracing::error!("Failed to serialize envelope: {}", e);
                format!("{{\n    \"status\": {},\n    \"message\": null\n}}", self.status)
            }
        }
    }
}

impl IntoResponse for ResponseEnvelope {
    fn into_response(self) -> Response {
        (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            self.to_pretty_json(),
        )
            .into_response()
    }
}
