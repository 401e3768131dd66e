// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::time_utils::minutes_remaining;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication failed: {0}")]
    AuthFailure(String),

    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    #[error("Failed to write to profile store: {0}")]
    StoreWriteFailure(String),

    #[error("Code already scanned recently, {} minute(s) remaining", cooldown_minutes(.remaining))]
    CooldownActive { remaining: chrono::Duration },

    #[error("Scanned code is not a recognized dustbin code")]
    UnrecognizedCode,

    #[error("Insufficient points: balance {balance}, cost {cost}")]
    InsufficientPoints { balance: u64, cost: u64 },

    #[error("Coupon not found: {0}")]
    CouponNotFound(String),

    #[error("Profile store unavailable: {0}")]
    ConfigurationMissing(String),

    #[error("Username already exists: {0}")]
    UsernameTaken(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// HTTP status and stable machine-readable code for this error.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::AuthFailure(_) => (StatusCode::UNAUTHORIZED, "auth_failure"),
            AppError::ProfileNotFound(_) => (StatusCode::NOT_FOUND, "profile_not_found"),
            AppError::StoreWriteFailure(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "store_write_failure")
            }
            AppError::CooldownActive { .. } => (StatusCode::TOO_MANY_REQUESTS, "cooldown_active"),
            AppError::UnrecognizedCode => (StatusCode::UNPROCESSABLE_ENTITY, "unrecognized_code"),
            AppError::InsufficientPoints { .. } => (StatusCode::CONFLICT, "insufficient_points"),
            AppError::CouponNotFound(_) => (StatusCode::NOT_FOUND, "coupon_not_found"),
            AppError::ConfigurationMissing(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "configuration_missing")
            }
            AppError::UsernameTaken(_) => (StatusCode::CONFLICT, "username_taken"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            AppError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "database_error"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::BadRequest(errors.to_string())
    }
}

fn cooldown_minutes(remaining: &chrono::Duration) -> i64 {
    minutes_remaining(*remaining)
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    retry_after_seconds: Option<i64>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = self.status_and_code();

        let mut retry_after_seconds = None;
        let details = match &self {
            AppError::AuthFailure(msg)
            | AppError::ProfileNotFound(msg)
            | AppError::CouponNotFound(msg)
            | AppError::BadRequest(msg) => Some(msg.clone()),
            AppError::UsernameTaken(_) => {
                Some("Username already exists. Please choose a different one.".to_string())
            }
            AppError::CooldownActive { remaining } => {
                retry_after_seconds = Some(remaining.num_seconds().max(1));
                Some(format!(
                    "You have already scanned this QR code recently. Please wait {} more minute(s).",
                    minutes_remaining(*remaining)
                ))
            }
            AppError::UnrecognizedCode => Some(
                "This is not the valid dust bin QR code. Please scan the correct one.".to_string(),
            ),
            AppError::InsufficientPoints { balance, cost } => Some(format!(
                "Insufficient points to redeem this coupon ({} available, {} required).",
                balance, cost
            )),
            AppError::ConfigurationMissing(msg) => {
                tracing::error!(error = %msg, "Profile store unavailable");
                None
            }
            AppError::StoreWriteFailure(msg) => {
                tracing::error!(error = %msg, "Profile store write failed");
                None
            }
            AppError::Database(msg) => {
                tracing::error!(error = %msg, "Database error");
                None
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                None
            }
        };

        if status.is_client_error() {
            tracing::warn!(error, status = status.as_u16(), "Request rejected");
        }

        let body = ErrorResponse {
            error: error.to_string(),
            details,
            retry_after_seconds,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
