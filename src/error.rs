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
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Non-auth failure from the Strava API. Never retried.
    #[error("Strava API error: {0}")]
    StravaApi(String),

    /// Strava rejected the credential and a refresh did not fix it.
    #[error("Strava authorization failed: {0}")]
    StravaAuth(String),

    #[error("Model service error: {0}")]
    Llm(String),
}

impl AppError {
    /// True for the credential failure class (expired or revoked Strava token).
    pub fn is_strava_token_error(&self) -> bool {
        matches!(self, AppError::StravaAuth(_))
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    details: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", msg.clone())
            }
            AppError::StravaApi(msg) => {
                tracing::error!(error = %msg, "Strava API failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "strava_error",
                    msg.clone(),
                )
            }
            AppError::StravaAuth(msg) => {
                tracing::error!(error = %msg, "Strava authorization failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "strava_auth_error",
                    msg.clone(),
                )
            }
            AppError::Llm(msg) => {
                tracing::error!(error = %msg, "Model service failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "analysis_failed",
                    msg.clone(),
                )
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
