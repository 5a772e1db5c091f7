//! API error types with structured JSON responses.
//!
//! Three failure classes: the caller's request was bad (400), the model
//! gave us nothing usable (502), or we broke (500).

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use careplan_llm::{CompletionError, ExtractionError};
use serde::Serialize;

use crate::models::ValidationError;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    Validation(#[from] ValidationError),
    #[error("Model API error: {0}")]
    Upstream(String),
    #[error("Model returned no content")]
    EmptyResponse,
    #[error("Model response could not be parsed")]
    Unparseable { raw: String },
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream(_) | ApiError::EmptyResponse | ApiError::Unparseable { .. } => {
                StatusCode::BAD_GATEWAY
            }
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (code, message) = match &self {
            ApiError::Validation(e) => ("VALIDATION_FAILED", e.to_string()),
            ApiError::Upstream(detail) => ("UPSTREAM_ERROR", detail.clone()),
            ApiError::EmptyResponse => (
                "UPSTREAM_EMPTY",
                "Model returned no content".to_string(),
            ),
            ApiError::Unparseable { raw } => {
                tracing::warn!(raw_len = raw.len(), "Unparseable model response");
                tracing::debug!(raw = %raw, "Unparseable model response text");
                (
                    "UPSTREAM_UNPARSEABLE",
                    "Model response did not contain a usable care plan".to_string(),
                )
            }
            ApiError::Internal(detail) => {
                tracing::error!(detail, "API internal error");
                (
                    "INTERNAL",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ErrorBody {
            error: ErrorDetail { code, message },
        };
        (status, Json(body)).into_response()
    }
}

impl From<ExtractionError> for ApiError {
    fn from(err: ExtractionError) -> Self {
        match err {
            ExtractionError::EmptyResponse => ApiError::EmptyResponse,
            ExtractionError::NoJson { raw } => ApiError::Unparseable { raw },
        }
    }
}

impl From<CompletionError> for ApiError {
    fn from(err: CompletionError) -> Self {
        match err {
            CompletionError::MissingApiKey => {
                ApiError::Internal(CompletionError::MissingApiKey.to_string())
            }
            CompletionError::Upstream { status, body } => {
                tracing::warn!(status, body = %body, "Model API rejected request");
                ApiError::Upstream(format!("Model API returned status {status}"))
            }
            CompletionError::HttpClient(detail) | CompletionError::ResponseParsing(detail) => {
                tracing::warn!(detail = %detail, "Model API call failed");
                ApiError::Upstream(detail)
            }
        }
    }
}
