// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Webhook routes for Strava events.

use crate::error::Result;
use crate::models::WebhookEvent;
use crate::routes::request_origin;
use crate::services::Registration;
use crate::AppState;
use axum::{
    body::Bytes,
    extract::{Json, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use subtle::ConstantTimeEq;

/// Webhook routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/webhook", get(verify).post(handle_event))
        .route("/webhook/register", post(register))
}

/// Strava webhook verification query params.
#[derive(Deserialize)]
struct VerifyParams {
    #[serde(rename = "hub.mode", default)]
    mode: Option<String>,
    #[serde(rename = "hub.challenge", default)]
    challenge: Option<String>,
    #[serde(rename = "hub.verify_token", default)]
    verify_token: Option<String>,
}

/// Verification response.
#[derive(Serialize)]
struct VerifyResponse {
    #[serde(rename = "hub.challenge", skip_serializing_if = "Option::is_none")]
    challenge: Option<String>,
}

fn token_matches(received: &str, expected: &str) -> bool {
    received.as_bytes().ct_eq(expected.as_bytes()).into()
}

/// Verify webhook subscription (GET).
async fn verify(
    State(state): State<Arc<AppState>>,
    Query(params): Query<VerifyParams>,
) -> Response {
    if params.mode.as_deref() != Some("subscribe") {
        tracing::warn!(
            mode = ?params.mode,
            "Webhook verification failed: mode is not subscribe"
        );
        return (StatusCode::FORBIDDEN, "Forbidden").into_response();
    }

    let token_ok = params
        .verify_token
        .as_deref()
        .is_some_and(|t| token_matches(t, &state.config.webhook_verify_token));
    if !token_ok {
        tracing::warn!(
            token_present = params.verify_token.is_some(),
            "Webhook verification failed: invalid verify token"
        );
        return (StatusCode::FORBIDDEN, "Forbidden").into_response();
    }

    tracing::info!("Webhook subscription verified");
    (
        StatusCode::OK,
        Json(VerifyResponse {
            challenge: params.challenge,
        }),
    )
        .into_response()
}

/// Handle incoming webhook events (POST).
///
/// Always acknowledges with 200 so Strava does not retry; the event is
/// applied in the background and failures are only logged.
async fn handle_event(State(state): State<Arc<AppState>>, body: Bytes) -> impl IntoResponse {
    let event: WebhookEvent = match serde_json::from_slice(&body) {
        Ok(e) => e,
        Err(e) => {
            tracing::error!(error = %e, "Failed to parse webhook event");
            return (StatusCode::OK, "OK");
        }
    };

    tracing::info!(
        object_type = %event.object_type,
        object_id = event.object_id,
        aspect_type = %event.aspect_type,
        owner_id = event.owner_id,
        "Webhook event received"
    );

    let dashboard = state.dashboard.clone();
    tokio::spawn(async move {
        match dashboard.handle_webhook_event(&event).await {
            Ok(outcome) => tracing::debug!(
                object_id = event.object_id,
                outcome = ?outcome,
                "Webhook event applied"
            ),
            Err(e) => tracing::error!(
                object_id = event.object_id,
                error = %e,
                "Failed to apply webhook event"
            ),
        }
    });

    (StatusCode::OK, "OK")
}

/// Create the Strava push subscription for this deployment if missing.
async fn register(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>> {
    let callback_url = format!("{}/webhook", request_origin(&state.config, &headers));

    let body = match state
        .dashboard
        .register_webhook(&callback_url, &state.config.webhook_verify_token)
        .await?
    {
        Registration::AlreadyRegistered(subscription) => json!({
            "status": "already_registered",
            "subscription": subscription,
        }),
        Registration::Registered(subscription) => json!({
            "status": "registered",
            "subscription": subscription,
        }),
    };

    Ok(Json(body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_matches() {
        assert!(token_matches("secret", "secret"));
        assert!(!token_matches("secret", "secreT"));
        assert!(!token_matches("secret", "secret2"));
        assert!(!token_matches("", "secret"));
    }
}
