// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
///
/// Authentication errors (`Unauthorized`, `ScopeRejected`, `ExchangeFailed`,
/// `RefreshFailed`) block until the user acts; `DataUnavailable` is
/// non-blocking and leaves the last good progress snapshot in place.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Required scopes were not granted")]
    ScopeRejected,

    #[error("Token exchange failed: {0}")]
    ExchangeFailed(String),

    #[error("Token refresh failed: {0}")]
    RefreshFailed(String),

    #[error("Activity data unavailable: {0}")]
    DataUnavailable(String),

    #[error("No challenge configured")]
    ChallengeNotConfigured,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized", None),
            AppError::ScopeRejected => (StatusCode::FORBIDDEN, "scope_rejected", None),
            AppError::ExchangeFailed(msg) => (
                StatusCode::UNAUTHORIZED,
                "exchange_failed",
                Some(msg.clone()),
            ),
            AppError::RefreshFailed(msg) => (
                StatusCode::UNAUTHORIZED,
                "refresh_failed",
                Some(msg.clone()),
            ),
            AppError::DataUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "data_unavailable",
                Some(msg.clone()),
            ),
            AppError::ChallengeNotConfigured => {
                (StatusCode::CONFLICT, "challenge_not_configured", None)
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", Some(msg.clone())),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()))
            }
            AppError::Storage(msg) => {
                tracing::error!(error = %msg, "Storage error");
                (StatusCode::INTERNAL_SERVER_ERROR, "storage_error", None)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl AppError {
    /// True for failures that require the user to re-authenticate.
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            AppError::Unauthorized
                | AppError::ScopeRejected
                | AppError::ExchangeFailed(_)
                | AppError::RefreshFailed(_)
        )
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
