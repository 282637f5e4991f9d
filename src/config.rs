// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! The Strava client secret and webhook verify token are deployment secrets;
//! everything else has a sensible default for local development.

use std::env;

/// Default annual running goal in kilometers.
pub const DEFAULT_GOAL_KM: f64 = 1100.0;

/// Default Strava REST API base URL.
pub const DEFAULT_STRAVA_API_URL: &str = "https://www.strava.com/api/v3";

/// Default Strava OAuth base URL (authorize + token endpoints live below it).
pub const DEFAULT_STRAVA_OAUTH_URL: &str = "https://www.strava.com/oauth";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Environment Variables (non-sensitive) ---
    /// Strava OAuth client ID (public)
    pub strava_client_id: String,
    /// SQLite connection URL
    pub database_url: String,
    /// Server port
    pub port: u16,
    /// Annual distance goal (km)
    pub goal_km: f64,
    /// Externally visible origin, e.g. "https://run.example.com".
    /// When unset, derived from the request Host header.
    pub public_url: Option<String>,
    /// Strava REST API base URL
    pub strava_api_url: String,
    /// Strava OAuth base URL
    pub strava_oauth_url: String,

    // --- Secrets ---
    /// Strava OAuth client secret
    pub strava_client_secret: String,
    /// Webhook verification token shared with Strava
    pub webhook_verify_token: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is honoured for local development.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            strava_client_id: env::var("STRAVA_CLIENT_ID")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("STRAVA_CLIENT_ID"))?,
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://running-dashboard.db".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            goal_km: match env::var("ANNUAL_GOAL_KM") {
                Ok(v) => parse_goal_km(&v)?,
                Err(_) => DEFAULT_GOAL_KM,
            },
            public_url: env::var("PUBLIC_URL")
                .ok()
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .filter(|v| !v.is_empty()),
            strava_api_url: env::var("STRAVA_API_URL")
                .unwrap_or_else(|_| DEFAULT_STRAVA_API_URL.to_string()),
            strava_oauth_url: env::var("STRAVA_OAUTH_URL")
                .unwrap_or_else(|_| DEFAULT_STRAVA_OAUTH_URL.to_string()),

            strava_client_secret: env::var("STRAVA_CLIENT_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("STRAVA_CLIENT_SECRET"))?,
            webhook_verify_token: env::var("STRAVA_WEBHOOK_VERIFY_TOKEN")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("STRAVA_WEBHOOK_VERIFY_TOKEN"))?,
        })
    }

    /// Config for tests: in-memory database, fixed credentials.
    pub fn test_default() -> Self {
        Self {
            strava_client_id: "test_client_id".to_string(),
            database_url: "sqlite::memory:".to_string(),
            port: 8080,
            goal_km: DEFAULT_GOAL_KM,
            public_url: None,
            strava_api_url: DEFAULT_STRAVA_API_URL.to_string(),
            strava_oauth_url: DEFAULT_STRAVA_OAUTH_URL.to_string(),
            strava_client_secret: "test_secret".to_string(),
            webhook_verify_token: "test_verify_token".to_string(),
        }
    }
}

/// Parse `ANNUAL_GOAL_KM`: a finite, positive number of kilometers.
pub fn parse_goal_km(raw: &str) -> Result<f64, ConfigError> {
    match raw.trim().parse::<f64>() {
        Ok(km) if km.is_finite() && km > 0.0 => Ok(km),
        _ => Err(ConfigError::Invalid("ANNUAL_GOAL_KM", raw.to_string())),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}
