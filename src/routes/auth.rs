// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava OAuth authentication routes.

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::Result;
use crate::routes::request_origin;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth", get(auth_start))
        .route("/auth/callback", get(auth_callback))
}

/// Start OAuth flow - redirect to Strava authorization.
async fn auth_start(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Redirect {
    let callback_url = format!("{}/auth/callback", request_origin(&state.config, &headers));
    let auth_url = state.dashboard.client().authorize_url(&callback_url);

    tracing::info!(
        client_id = %state.config.strava_client_id,
        callback_url = %callback_url,
        "Starting OAuth flow, redirecting to Strava"
    );

    Redirect::to(&auth_url)
}

#[derive(Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// OAuth callback - exchange code for tokens, then back to the dashboard.
async fn auth_callback(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CallbackParams>,
) -> Result<Response> {
    if let Some(error) = params.error {
        tracing::warn!(error = %error, "OAuth error from Strava");
    }

    let Some(code) = params.code.filter(|c| !c.is_empty()) else {
        return Ok((StatusCode::BAD_REQUEST, "Missing code").into_response());
    };

    tracing::info!("Exchanging authorization code for tokens");
    let athlete_id = state.dashboard.handle_oauth_callback(&code).await?;
    tracing::info!(athlete_id, "OAuth successful");

    Ok(Redirect::to("/").into_response())
}
