//! API error handling.
//!
//! Errors surfaced over HTTP carry a stable [`ErrorCode`] alongside a
//! human-readable message and are rendered as `{"error", "code"}` JSON.
//!
//! | Code | HTTP Status | Usage |
//! |------|-------------|-------|
//! | `INVALID_INPUT` | 400 | Malformed request or rejected settings/pricing inputs |
//! | `NOT_FOUND` | 404 | Unknown call id |
//! | `PRICE_UNAVAILABLE` | 503 | No current price from provider or cache |
//! | `STORAGE_ERROR` | 500 | Database failure |
//! | `INTERNAL_ERROR` | 500 | Unexpected server error |

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::services::StrategyError;

/// Error codes exposed by the HTTP API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Invalid request or rejected input values.
    InvalidInput,
    /// Referenced resource does not exist.
    NotFound,
    /// No price could be obtained.
    PriceUnavailable,
    /// Persistence failure.
    StorageError,
    /// Internal server error.
    InternalError,
}

impl ErrorCode {
    /// HTTP status for this error.
    #[must_use]
    pub const fn http_status(&self) -> StatusCode {
        match self {
            Self::InvalidInput => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::PriceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::StorageError | Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable reason string.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::InvalidInput => "INVALID_INPUT",
            Self::NotFound => "NOT_FOUND",
            Self::PriceUnavailable => "PRICE_UNAVAILABLE",
            Self::StorageError => "STORAGE_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason())
    }
}

/// An error returned from an HTTP handler.
#[derive(Debug, Error)]
#[error("[{}] {message}", .code.reason())]
pub struct ApiError {
    code: ErrorCode,
    message: String,
}

impl ApiError {
    /// Create a new API error.
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Invalid request input.
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Get the error code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    /// Get the message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// JSON error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpErrorResponse {
    /// Human-readable message.
    pub error: String,
    /// Error code string.
    pub code: String,
}

impl From<StrategyError> for ApiError {
    fn from(err: StrategyError) -> Self {
        let code = match &err {
            StrategyError::Pricing(_) | StrategyError::Settings(_) => ErrorCode::InvalidInput,
            StrategyError::CallNotFound { .. } => ErrorCode::NotFound,
            StrategyError::PriceUnavailable { .. } => ErrorCode::PriceUnavailable,
            StrategyError::Storage(_) => ErrorCode::StorageError,
        };
        Self::new(code, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.code.http_status();
        if status.is_server_error() {
            tracing::error!(code = %self.code, error = %self.message, "Request failed");
        } else {
            tracing::debug!(code = %self.code, error = %self.message, "Request rejected");
        }

        let body = HttpErrorResponse {
            error: self.message,
            code: self.code.reason().to_string(),
        };
        (status, Json(body)).into_response()
    }
}
