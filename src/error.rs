//! Application error taxonomy and its HTTP representation.
//!
//! Every failure leaves the service as a JSON body with a single stable
//! `error` field:
//!
//! ```json
//! { "error": "Invalid URL format" }
//! ```
//!
//! The [`std::fmt::Display`] output carries the internal detail for logs, while
//! [`AppError::public_message`] is the only text that reaches clients.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use utoipa::ToSchema;
use std::fmt;
use validator::ValidationErrors;

use crate::utils::code_generator::GeneratorError;
use crate::utils::db_error::{is_connectivity_error, unique_violation_field};

/// Uniqueness constraints enforced by the link store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Code,
    LongUrl,
}

impl fmt::Display for UniqueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UniqueField::Code => f.write_str("code"),
            UniqueField::LongUrl => f.write_str("long_url"),
        }
    }
}

/// JSON error body returned by every failing endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    #[schema(example = "Invalid URL format")]
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed long URL. Detected before any store access.
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    /// Unknown short code.
    #[error("short code not found: {code}")]
    NotFound { code: String },

    /// The store could not be reached (I/O, TLS, pool exhaustion or query timeout).
    #[error("storage unavailable: {reason}")]
    StorageUnavailable { reason: String },

    /// Any other persistence failure.
    #[error("storage error: {reason}")]
    Storage { reason: String },

    /// The collision-avoidance loop ran out of attempts.
    #[error("no free short code after {attempts} attempts")]
    Exhausted { attempts: usize },

    /// An insert hit a uniqueness constraint.
    #[error("unique constraint violation on {field}")]
    Conflict { field: UniqueField },

    #[error("internal error: {reason}")]
    Internal { reason: String },

    /// Opaque failure reported by the redirect endpoint.
    #[error("server error")]
    ServerError,
}

impl AppError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    pub fn not_found(code: impl Into<String>) -> Self {
        Self::NotFound { code: code.into() }
    }

    pub fn storage_unavailable(reason: impl Into<String>) -> Self {
        Self::StorageUnavailable {
            reason: reason.into(),
        }
    }

    pub fn storage(reason: impl Into<String>) -> Self {
        Self::Storage {
            reason: reason.into(),
        }
    }

    pub fn internal(reason: impl Into<String>) -> Self {
        Self::Internal {
            reason: reason.into(),
        }
    }

    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::StorageUnavailable { .. }
            | AppError::Storage { .. }
            | AppError::Exhausted { .. }
            | AppError::Conflict { .. }
            | AppError::Internal { .. }
            | AppError::ServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing message placed in the `error` field.
    pub fn public_message(&self) -> &'static str {
        match self {
            AppError::InvalidInput { .. } => "Invalid URL format",
            AppError::NotFound { .. } => "Short URL not found",
            AppError::StorageUnavailable { .. } => "Database connection error",
            AppError::ServerError => "Server Error",
            AppError::Storage { .. }
            | AppError::Exhausted { .. }
            | AppError::Conflict { .. }
            | AppError::Internal { .. } => "Internal server error",
        }
    }

    /// Returns true for failures caused by the server side rather than the request.
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// Collapses server-side failures into [`AppError::ServerError`].
    ///
    /// The redirect endpoint does not tell connectivity problems apart from
    /// other failures; `NotFound` passes through untouched.
    pub fn into_redirect_error(self) -> Self {
        if self.is_server_error() {
            tracing::error!(error = %self, "Failed to resolve short code");
            AppError::ServerError
        } else {
            self
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }

        (status, Json(ErrorBody::new(self.public_message()))).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(field) = unique_violation_field(&e) {
            return AppError::Conflict { field };
        }

        if is_connectivity_error(&e) {
            AppError::storage_unavailable(e.to_string())
        } else {
            AppError::storage(e.to_string())
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(e: ValidationErrors) -> Self {
        AppError::invalid_input(e.to_string())
    }
}

impl From<GeneratorError> for AppError {
    fn from(e: GeneratorError) -> Self {
        AppError::internal(e.to_string())
    }
}
