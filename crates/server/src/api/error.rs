//! API error responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::warn;

use moderngov_core::{ClientError, NormalizeError};

use crate::metrics::API_ERRORS_TOTAL;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
    /// Start of the upstream body that could not be used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
}

/// An error with its HTTP status.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::plain(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::plain(StatusCode::NOT_FOUND, message)
    }

    fn plain(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorResponse {
                error: message.into(),
                operation: None,
                excerpt: None,
            },
        }
    }
}

impl From<ClientError> for ApiError {
    fn from(err: ClientError) -> Self {
        let operation = err.operation().as_str();
        let (status, kind, excerpt) = match &err {
            ClientError::InvalidUrl { .. } => (StatusCode::BAD_REQUEST, "invalid_url", None),
            ClientError::MissingParameter { .. } => {
                (StatusCode::BAD_REQUEST, "missing_parameter", None)
            }
            ClientError::InvalidParameter { .. } => {
                (StatusCode::BAD_REQUEST, "invalid_parameter", None)
            }
            ClientError::Transport { .. } => (StatusCode::BAD_GATEWAY, "transport", None),
            ClientError::Normalization { source, .. } => (
                StatusCode::BAD_GATEWAY,
                "normalization",
                Some(excerpt_of(source)),
            ),
        };

        API_ERRORS_TOTAL.with_label_values(&[operation, kind]).inc();
        if status.is_server_error() {
            warn!(operation, error = %err, "Upstream request failed");
        }

        Self {
            status,
            body: ErrorResponse {
                error: err.to_string(),
                operation: Some(operation.to_string()),
                excerpt,
            },
        }
    }
}

fn excerpt_of(err: &NormalizeError) -> String {
    err.excerpt().to_string()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
