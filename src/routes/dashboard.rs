// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Dashboard page and manual resync.

use crate::error::Result;
use crate::render::{render_connect_page, render_dashboard, render_sync_result};
use crate::services::DashboardView;
use crate::AppState;
use axum::{extract::State, response::Html, routing::get, Router};
use chrono::Utc;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(index))
        .route("/sync", get(sync))
}

/// Dashboard, or the connect page until Strava is linked.
async fn index(State(state): State<Arc<AppState>>) -> Result<Html<String>> {
    let html = match state.dashboard.view().await? {
        DashboardView::Connect => render_connect_page(),
        DashboardView::Dashboard { activities } => {
            render_dashboard(&activities, Utc::now(), state.config.goal_km)?
        }
    };
    Ok(Html(html))
}

/// Full resync of the last three years.
async fn sync(State(state): State<Arc<AppState>>) -> Result<Html<String>> {
    let count = state.dashboard.sync().await?;
    tracing::info!(count, "Manual sync finished");
    Ok(Html(render_sync_result(count)))
}
