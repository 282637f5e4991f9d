// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use running_dashboard::config::Config;
use running_dashboard::db::SqliteDb;
use running_dashboard::models::TokenRecord;
use running_dashboard::routes::create_router;
use running_dashboard::services::{RunningDashboard, StravaClient};
use running_dashboard::AppState;
use std::sync::Arc;

/// Config pointing the Strava client at a mock server.
#[allow(dead_code)]
pub fn mock_config(server_url: &str) -> Config {
    Config {
        strava_api_url: format!("{}/api/v3", server_url),
        strava_oauth_url: format!("{}/oauth", server_url),
        ..Config::test_default()
    }
}

/// Create a test app backed by an in-memory database.
/// Returns the router and the database handle for assertions.
#[allow(dead_code)]
pub async fn create_test_app(config: Config) -> (axum::Router, SqliteDb) {
    let db = SqliteDb::new_in_memory()
        .await
        .expect("Failed to open in-memory database");
    let dashboard = RunningDashboard::new(StravaClient::from_config(&config), db.clone());

    let state = Arc::new(AppState { config, dashboard });

    (create_router(state), db)
}

/// Store a token set that stays valid for the next hour.
#[allow(dead_code)]
pub async fn store_fresh_tokens(db: &SqliteDb) {
    db.set_tokens(&TokenRecord {
        athlete_id: 134815,
        access_token: "access".to_string(),
        refresh_token: "refresh".to_string(),
        expires_at: chrono::Utc::now().timestamp() + 3600,
    })
    .await
    .expect("Failed to store tokens");
}

/// Read a response body into a string.
#[allow(dead_code)]
pub async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("Failed to read body");
    String::from_utf8(bytes.to_vec()).expect("Body is not UTF-8")
}
