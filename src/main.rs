// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Running Dashboard Server
//!
//! Syncs runs from Strava and serves a year-over-year cumulative distance
//! chart.

use running_dashboard::{config::Config, services::RunningDashboard, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging()?;

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(
        port = config.port,
        goal_km = config.goal_km,
        "Starting Running Dashboard"
    );

    // Open the activity store and wire up Strava
    let dashboard = RunningDashboard::from_config(&config).await?;
    tracing::info!(database_url = %config.database_url, "Database ready");

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        dashboard,
    });

    // Build router
    let app = running_dashboard::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            EnvFilter::from_default_env()
                .add_directive("running_dashboard=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
