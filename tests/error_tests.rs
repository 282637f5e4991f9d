// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::http::StatusCode;
use axum::response::IntoResponse;
use running_dashboard::error::AppError;

#[test]
fn test_is_provider_error_matches() {
    assert!(AppError::OAuthExchange("HTTP 400".to_string()).is_provider_error());
    assert!(AppError::TokenRefresh("HTTP 401".to_string()).is_provider_error());
    assert!(AppError::Fetch("HTTP 429".to_string()).is_provider_error());
}

#[test]
fn test_is_provider_error_no_match() {
    assert!(!AppError::NoToken.is_provider_error());
    assert!(!AppError::Internal(anyhow::anyhow!("chart")).is_provider_error());
    assert!(!AppError::Database("locked".to_string()).is_provider_error());
}

#[test]
fn test_error_status_codes() {
    let cases = [
        (AppError::NoToken, StatusCode::UNAUTHORIZED),
        (AppError::OAuthExchange("x".into()), StatusCode::BAD_GATEWAY),
        (AppError::TokenRefresh("x".into()), StatusCode::BAD_GATEWAY),
        (AppError::Fetch("x".into()), StatusCode::BAD_GATEWAY),
        (AppError::Database("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        (
            AppError::Internal(anyhow::anyhow!("boom")),
            StatusCode::INTERNAL_SERVER_ERROR,
        ),
    ];

    for (err, status) in cases {
        assert_eq!(err.into_response().status(), status);
    }
}

#[tokio::test]
async fn test_no_token_renders_connect_page() {
    let response = AppError::NoToken.into_response();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let html = String::from_utf8(body.to_vec()).unwrap();
    assert!(html.contains(r#"href="/auth""#));
}

#[tokio::test]
async fn test_error_body_details() {
    let response = AppError::Fetch("HTTP 404 Not Found".to_string()).into_response();
    let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"], "strava_error");
    assert_eq!(json["details"], "HTTP 404 Not Found");

    let response = AppError::Database("disk I/O error".to_string()).into_response();
    let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"], "database_error");
    assert!(json.get("details").is_none());
}
