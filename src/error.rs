// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::db::StoreError;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Stored state is still loading")]
    Loading,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Motion sensor permission denied")]
    PermissionDenied,

    #[error("Motion sensor unavailable: {0}")]
    SensorUnavailable(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("Coaching service error: {0}")]
    Coaching(String),
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
            AppError::Loading => (StatusCode::SERVICE_UNAVAILABLE, "loading", None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", Some(msg.clone())),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()))
            }
            AppError::PermissionDenied => (StatusCode::FORBIDDEN, "permission_denied", None),
            AppError::SensorUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "sensor_unavailable",
                Some(msg.clone()),
            ),
            AppError::Storage(err) => {
                tracing::error!(error = %err, "Storage error");
                (StatusCode::INTERNAL_SERVER_ERROR, "storage_error", None)
            }
            AppError::Coaching(msg) => {
                (StatusCode::BAD_GATEWAY, "coaching_error", Some(msg.clone()))
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
