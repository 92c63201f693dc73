//! Uniform error-to-status mapping for all handlers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::services::ServiceError;

/// The one error type handlers return.
///
/// Every failure maps to a status and a small JSON body; internal detail is
/// logged, never leaked to the client.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("upstream service unavailable")]
    Upstream(String),

    #[error("upstream service returned status {0}")]
    UpstreamStatus(StatusCode),

    #[error("internal error")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream(_) | ApiError::UpstreamStatus(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        match &self {
            ApiError::Upstream(detail) => {
                tracing::warn!(detail = %detail, "Upstream service failure");
            }
            ApiError::UpstreamStatus(upstream_status) => {
                tracing::warn!(status = %upstream_status, "Upstream service returned error status");
            }
            ApiError::Internal(detail) => {
                tracing::error!(detail = %detail, "Internal error while handling request");
            }
            ApiError::Validation(_) => {}
        }

        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Status(status) => ApiError::UpstreamStatus(status),
            other => ApiError::Upstream(other.to_string()),
        }
    }
}
