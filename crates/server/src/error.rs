//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures unexpected errors to
//! Sentry before responding to the client. All route handlers return
//! `Result<T, AppError>`.
//!
//! Expected business conditions (`OutOfStock`, `EmptyCart`) are not
//! errors: they travel as `Ok` outcomes through the services and are
//! rendered as HTTP 200 bodies with an `error` field (see
//! [`crate::routes`]).

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::store::StoreError;

/// Application-level error type for the backend.
#[derive(Debug, Error)]
pub enum AppError {
    /// Requested product, user, or cart entry does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Malformed input (bad quantity, unparseable email, missing field).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The document store failed or is unreachable.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// JSON error body: `{"message": "..."}` per the API convention.
#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Store(_) | Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            Self::Store(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Store(_) | Self::Internal(_) => "Internal server error".to_owned(),
            _ => self.to_string(),
        };

        (status, Json(ErrorBody { message })).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
