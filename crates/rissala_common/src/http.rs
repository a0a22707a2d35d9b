// --- File: crates/rissala_common/src/http.rs ---
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

use crate::error::{HttpStatusCode, RelayError};

/// Body of every response produced by the relay.
///
/// Successful calls return `{"success": true}` (optionally with a
/// `message`), failures `{"success": false, "error": "..."}`.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct StatusBody {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StatusBody {
    pub fn ok() -> Self {
        Self {
            success: true,
            message: None,
            error: None,
        }
    }

    pub fn ok_with_message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(error.into()),
        }
    }
}

/// Server-side failures are logged in full before the generic body is sent.
impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status_code =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if !self.is_client_error() {
            error!("Request failed: {}", self);
        }

        (status_code, Json(StatusBody::failed(self.public_message()))).into_response()
    }
}

/// Converts a handler result into a JSON status response.
pub fn handle_status_result(result: Result<StatusBody, RelayError>) -> Response {
    match result {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(err) => err.into_response(),
    }
}
