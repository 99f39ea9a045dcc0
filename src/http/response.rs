//! Error-to-status mapping for the public API.
//!
//! - invalid client input → 400 `{message}`
//! - unknown transaction hash → 404 `{message}`
//! - any other provider failure → 503 with the `KO` service status body

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;

use crate::blockchain::types::GatewayError;

/// Errors surfaced by handlers.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Provider(GatewayError),
}

impl From<GatewayError> for ApiError {
    fn from(error: GatewayError) -> Self {
        ApiError::Provider(error)
    }
}

#[derive(Serialize)]
struct Message {
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(message) => {
                tracing::debug!(error = %message, "Rejected request input");
                (StatusCode::BAD_REQUEST, Json(Message { message })).into_response()
            }
            ApiError::Provider(error @ GatewayError::TransactionNotFound(_)) => (
                StatusCode::NOT_FOUND,
                Json(Message {
                    message: error.to_string(),
                }),
            )
                .into_response(),
            ApiError::Provider(error) => {
                tracing::error!(error = %error, "Provider call failed");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(json!([{ "status": "KO", "service": "provider" }])),
                )
                    .into_response()
            }
        }
    }
}
