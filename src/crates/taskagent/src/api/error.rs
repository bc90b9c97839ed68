//! HTTP error mapping
//!
//! Converts engine errors into JSON error responses. Unknown runs map to 404,
//! configuration-level graph errors to 500, and anything raised by a node to
//! 502 so callers can distinguish "our bug" from "the collaborator failed".

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use flowgraph_core::GraphError;
use serde::Serialize;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

/// Body of every error response.
#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub error: String,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("run not found: {0}")]
    RunNotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("model call failed: {0}")]
    UpstreamFailed(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::RunNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::UpstreamFailed(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_type(&self) -> &'static str {
        match self {
            ApiError::RunNotFound(_) => "run_not_found",
            ApiError::BadRequest(_) => "bad_request",
            ApiError::UpstreamFailed(_) => "upstream_failed",
            ApiError::Internal(_) => "internal_error",
        }
    }
}

impl From<GraphError> for ApiError {
    fn from(err: GraphError) -> Self {
        match err {
            GraphError::UnknownRun(run_id) => ApiError::RunNotFound(run_id),
            GraphError::NodeFailed { node, message } => {
                ApiError::UpstreamFailed(format!("{node}: {message}"))
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ApiErrorBody {
            error: self.error_type().to_string(),
            message: self.to_string(),
        };

        tracing::error!(status = %status, "request failed: {}", body.message);

        (status, Json(body)).into_response()
    }
}
