//! Error types for the marksheet server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use marksheet_core::MarksheetError;
use serde::Serialize;
use thiserror::Error;

/// Server error types
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("{0}")]
    MissingColumn(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
    code: String,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ServerError::MissingColumn(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "MISSING_COLUMN",
                msg.clone(),
            ),
            ServerError::InvalidRequest(msg) => {
                (StatusCode::BAD_REQUEST, "INVALID_REQUEST", msg.clone())
            }
            ServerError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                msg.clone(),
            ),
        };

        if status.is_server_error() {
            tracing::error!(code, "{}", message);
        } else {
            tracing::warn!(code, "{}", message);
        }

        let body = ErrorResponse {
            success: false,
            error: message,
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<MarksheetError> for ServerError {
    fn from(err: MarksheetError) -> Self {
        match err {
            MarksheetError::MissingColumn { .. } => ServerError::MissingColumn(err.to_string()),
            err if err.is_input_error() => ServerError::InvalidRequest(err.to_string()),
            other => ServerError::Internal(other.to_string()),
        }
    }
}

impl From<std::io::Error> for ServerError {
    fn from(err: std::io::Error) -> Self {
        ServerError::Internal(err.to_string())
    }
}
