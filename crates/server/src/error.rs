//! Unified error handling for the HTTP surface.
//!
//! Route handlers return `Result<T, AppError>`; the `IntoResponse` impl
//! maps typed failures to HTTP statuses and a JSON body.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use storeroom_storage::StorageError;

use crate::services::ServiceError;

/// Application-level error type for the server.
#[derive(Debug, Error)]
pub enum AppError {
    /// A retail service operation failed.
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// Bad request from the client (malformed multipart/form input).
    #[error("bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Service(err) => match err {
                ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
                ServiceError::InvalidOperation(_) => StatusCode::CONFLICT,
                ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
                ServiceError::Storage(storage) => match storage {
                    StorageError::NotFound => StatusCode::NOT_FOUND,
                    StorageError::PreconditionFailed | StorageError::AlreadyExists => {
                        StatusCode::CONFLICT
                    }
                    StorageError::Serialization(_) | StorageError::Backend(_) => {
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                },
            },
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request error");
        }

        // Don't expose backend details to clients
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            "internal server error".to_owned()
        } else {
            self.to_string()
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
