//! services/api/src/error.rs
//!
//! Defines the primary error type for the entire API service and its mapping to
//! HTTP responses.

use crate::config::ConfigError;
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use receipt_points_core::{LookupError, PortError, ProcessError};
use serde::Serialize;

/// The primary error type for the `api` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from the store port.
    #[error("Service Port Error: {0}")]
    Port(#[from] PortError),

    /// Represents an error from the underlying database library.
    #[error("Database Error: {0}")]
    Database(#[from] sqlx::Error),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The request body or a receipt field was malformed.
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// The same receipt was already submitted by this user.
    #[error("Duplicate submission: {0}")]
    Duplicate(String),

    /// The submission lost a race with a concurrent one and may be retried.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}

/// JSON body returned for every error response.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl From<ProcessError> for ApiError {
    fn from(err: ProcessError) -> Self {
        match err {
            ProcessError::Validation(e) => ApiError::BadRequest(e.to_string()),
            ProcessError::Duplicate => ApiError::Duplicate(err.to_string()),
            ProcessError::Conflict { .. } => ApiError::Conflict(err.to_string()),
            ProcessError::Persistence(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<LookupError> for ApiError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::NotFound(msg) => ApiError::NotFound(msg),
            LookupError::Persistence(msg) => ApiError::Internal(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            ApiError::Duplicate(_) => (StatusCode::CONFLICT, "duplicate_submission"),
            ApiError::Conflict(_) => (StatusCode::SERVICE_UNAVAILABLE, "conflict_retryable"),
            ApiError::Port(PortError::NotFound(_)) => (StatusCode::NOT_FOUND, "not_found"),
            ApiError::Config(_)
            | ApiError::Port(_)
            | ApiError::Database(_)
            | ApiError::Io(_)
            | ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };

        // Internal details are logged where they occur, not echoed to clients.
        let message = match status {
            StatusCode::INTERNAL_SERVER_ERROR => "Internal server error".to_string(),
            _ => match self {
                ApiError::BadRequest(msg)
                | ApiError::NotFound(msg)
                | ApiError::Duplicate(msg)
                | ApiError::Conflict(msg) => msg,
                other => other.to_string(),
            },
        };

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message,
        });

        if status == StatusCode::SERVICE_UNAVAILABLE {
            return (status, [(header::RETRY_AFTER, "1")], body).into_response();
        }
        (status, body).into_response()
    }
}
