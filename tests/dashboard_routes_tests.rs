// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Integration tests for the dashboard, sync and OAuth routes.

mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use chrono::{Datelike, Utc};
use running_dashboard::config::Config;
use running_dashboard::models::Activity;
use serde_json::json;
use tower::ServiceExt;

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_index_without_tokens_shows_connect_page() {
    let (app, _db) = common::create_test_app(Config::test_default()).await;

    let response = app.oneshot(get("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = common::body_string(response).await;
    assert!(html.contains("Connect with Strava"));
    assert!(html.contains(r#"href="/auth""#));
}

#[tokio::test]
async fn test_index_with_tokens_renders_dashboard() {
    let (app, db) = common::create_test_app(Config::test_default()).await;
    common::store_fresh_tokens(&db).await;

    let year = Utc::now().year();
    db.upsert_activity(&Activity {
        strava_id: 1,
        name: "New Year Run".to_string(),
        distance_meters: 12_345.0,
        moving_time_seconds: 3600,
        start_date: format!("{}-01-01T08:00:00Z", year),
        activity_type: "Run".to_string(),
    })
    .await
    .unwrap();

    let response = app.oneshot(get("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = common::body_string(response).await;
    assert!(html.contains(&format!("<h1>Running {}</h1>", year)));
    assert!(html.contains("<svg"));
    // Current-year line plus its legend swatch
    let svg = &html[html.find("<svg").unwrap()..html.find("</svg>").unwrap()];
    assert_eq!(svg.to_lowercase().matches("#fc4c02").count(), 2);
    assert!(html.contains(">12.3 km<"));
}

#[tokio::test]
async fn test_security_headers_applied() {
    let (app, _db) = common::create_test_app(Config::test_default()).await;

    let response = app.oneshot(get("/")).await.unwrap();

    assert_eq!(
        response.headers().get("X-Content-Type-Options").unwrap(),
        "nosniff"
    );
    assert!(response.headers().get("Content-Security-Policy").is_some());
}

#[tokio::test]
async fn test_sync_without_tokens_is_unauthorized() {
    let (app, _db) = common::create_test_app(Config::test_default()).await;

    let response = app.oneshot(get("/sync")).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let html = common::body_string(response).await;
    assert!(html.contains(r#"href="/auth""#));
}

#[tokio::test]
async fn test_sync_stores_runs() {
    let mut server = mockito::Server::new_async().await;
    let _list = server
        .mock("GET", "/api/v3/athlete/activities")
        .match_header("authorization", "Bearer access")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!([
                {"id": 1, "name": "Run", "distance": 5000.0, "moving_time": 1500,
                 "start_date": "2025-05-01T06:00:00Z", "type": "Run"},
                {"id": 2, "name": "Ride", "distance": 40000.0, "moving_time": 5400,
                 "start_date": "2025-05-02T06:00:00Z", "type": "Ride"}
            ])
            .to_string(),
        )
        .create_async()
        .await;

    let (app, db) = common::create_test_app(common::mock_config(&server.url())).await;
    common::store_fresh_tokens(&db).await;

    let response = app.oneshot(get("/sync")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        common::body_string(response).await,
        r#"<p>Synced 1 runs. <a href="/">Back to dashboard</a></p>"#
    );
    assert_eq!(db.count_activities().await.unwrap(), 1);
}

#[tokio::test]
async fn test_auth_redirects_to_strava() {
    let (app, _db) = common::create_test_app(Config::test_default()).await;

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/auth")
                .header("host", "localhost:8080")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(location.starts_with("https://www.strava.com/oauth/authorize?"));
    assert!(location.contains("client_id=test_client_id"));
    assert!(location.contains("redirect_uri=http%3A%2F%2Flocalhost%3A8080%2Fauth%2Fcallback"));
    assert!(location.contains("scope=read%2Cactivity%3Aread_all"));
}

#[tokio::test]
async fn test_auth_callback_missing_code() {
    let (app, _db) = common::create_test_app(Config::test_default()).await;

    let response = app.oneshot(get("/auth/callback")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(common::body_string(response).await, "Missing code");
}

#[tokio::test]
async fn test_auth_callback_stores_tokens() {
    let mut server = mockito::Server::new_async().await;
    let token = server
        .mock("POST", "/oauth/token")
        .match_body(mockito::Matcher::PartialJson(json!({
            "grant_type": "authorization_code",
            "code": "abc123",
            "client_id": "test_client_id"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "access_token": "new_access",
                "refresh_token": "new_refresh",
                "expires_at": 1_900_000_000_i64,
                "athlete": {"id": 134815}
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let (app, db) = common::create_test_app(common::mock_config(&server.url())).await;

    let response = app
        .oneshot(get("/auth/callback?code=abc123&scope=read,activity:read_all"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/");

    let stored = db.get_tokens().await.unwrap().unwrap();
    assert_eq!(stored.athlete_id, 134815);
    assert_eq!(stored.access_token, "new_access");
    assert_eq!(stored.refresh_token, "new_refresh");
    token.assert_async().await;
}

#[tokio::test]
async fn test_auth_callback_rejected_code() {
    let mut server = mockito::Server::new_async().await;
    let _token = server
        .mock("POST", "/oauth/token")
        .with_status(400)
        .with_body(r#"{"message":"Bad Request"}"#)
        .create_async()
        .await;

    let (app, db) = common::create_test_app(common::mock_config(&server.url())).await;

    let response = app.oneshot(get("/auth/callback?code=bad")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert!(db.get_tokens().await.unwrap().is_none());
}
