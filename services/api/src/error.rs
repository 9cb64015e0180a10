//! services/api/src/error.rs
//!
//! Defines the error types of the API service: `ApiError` for startup and
//! top-level failures, and `HttpError` for everything a handler can answer
//! with.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use blog_core::{PortError, ValidationError};
use serde_json::json;
use tracing::error;

use crate::config::ConfigError;

/// The primary error type for the `api` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from one of the core service ports.
    #[error("Service Port Error: {0}")]
    Port(#[from] PortError),

    /// Represents an error from the underlying database library.
    #[error("Database Error: {0}")]
    Database(#[from] sqlx::Error),

    /// Represents a failure while applying the database migrations.
    #[error("Migration Error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}

//=========================================================================================
// Handler Errors
//=========================================================================================

/// An error answered to the client as `{"error": "<message>"}`.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Internal(String),
}

impl HttpError {
    pub fn status(&self) -> StatusCode {
        match self {
            HttpError::BadRequest(_) => StatusCode::BAD_REQUEST,
            HttpError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            HttpError::Forbidden(_) => StatusCode::FORBIDDEN,
            HttpError::NotFound(_) => StatusCode::NOT_FOUND,
            HttpError::Conflict(_) => StatusCode::CONFLICT,
            HttpError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        HttpError::BadRequest(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        HttpError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        HttpError::NotFound(message.into())
    }
}

/// A convenience type alias for handler results.
pub type HttpResult<T> = Result<T, HttpError>;

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<ValidationError> for HttpError {
    fn from(rule: ValidationError) -> Self {
        HttpError::BadRequest(rule.to_string())
    }
}

impl From<PortError> for HttpError {
    fn from(e: PortError) -> Self {
        match e {
            PortError::NotFound(message) => HttpError::NotFound(message),
            PortError::Conflict(message) => HttpError::Conflict(message),
            PortError::Unauthorized => HttpError::Unauthorized("Unauthorized".to_string()),
            PortError::Unexpected(message) => {
                error!("Port failure: {}", message);
                HttpError::Internal("Internal server error".to_string())
            }
        }
    }
}
