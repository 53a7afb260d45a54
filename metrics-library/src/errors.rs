//! Error types for the metrics library server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use metrics_library_repository::LibraryError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Errors returned by request handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Malformed request body or query string.
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// The catalog snapshot could not be re-read.
    #[error("Reload failed: {0}")]
    ReloadFailed(String),

    #[error(transparent)]
    Library(#[from] LibraryError),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::ReloadFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Library(LibraryError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Library(LibraryError::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            ApiError::Library(
                LibraryError::PersistenceError(_) | LibraryError::SerializationError(_),
            ) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %self, "Request failed");
            "An unhandled error has occurred".to_string()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}

/// Errors that prevent the server from starting.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Catalog error: {0}")]
    CatalogError(String),

    #[error(transparent)]
    Library(#[from] LibraryError),
}

impl ServiceError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn catalog(msg: impl Into<String>) -> Self {
        Self::CatalogError(msg.into())
    }
}
