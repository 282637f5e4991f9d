// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The OAuth flow has not been completed yet.
    #[error("No Strava tokens stored")]
    NoToken,

    #[error("OAuth exchange failed: {0}")]
    OAuthExchange(String),

    #[error("Token refresh failed: {0}")]
    TokenRefresh(String),

    #[error("Strava fetch failed: {0}")]
    Fetch(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// True for failures caused by the Strava side of a call.
    pub fn is_provider_error(&self) -> bool {
        matches!(
            self,
            AppError::OAuthExchange(_) | AppError::TokenRefresh(_) | AppError::Fetch(_)
        )
    }
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
        if self.is_provider_error() {
            tracing::warn!(error = %self, "Strava request failed");
        }

        let (status, error, details) = match &self {
            AppError::NoToken => {
                // Not connected yet: show the connect page instead of JSON
                return (
                    StatusCode::UNAUTHORIZED,
                    Html(crate::render::page::render_connect_page()),
                )
                    .into_response();
            }
            AppError::OAuthExchange(msg) => {
                (StatusCode::BAD_GATEWAY, "oauth_exchange_failed", Some(msg.clone()))
            }
            AppError::TokenRefresh(msg) => {
                (StatusCode::BAD_GATEWAY, "token_refresh_failed", Some(msg.clone()))
            }
            AppError::Fetch(msg) => (StatusCode::BAD_GATEWAY, "strava_error", Some(msg.clone())),
            AppError::Database(msg) => {
                tracing::error!(error = %msg, "Database error");
                (StatusCode::INTERNAL_SERVER_ERROR, "database_error", None)
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

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
