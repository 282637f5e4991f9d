// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava API client.
//!
//! Handles:
//! - OAuth code exchange and token refresh
//! - Single activity fetch and paginated activity listing
//! - Push (webhook) subscription lookup and creation

use crate::config::Config;
use crate::error::AppError;
use crate::models::Activity;
use serde::{Deserialize, Serialize};

/// Strava API client.
#[derive(Clone)]
pub struct StravaClient {
    http: reqwest::Client,
    api_url: String,
    oauth_url: String,
    client_id: String,
    client_secret: String,
}

impl StravaClient {
    /// Create a new Strava client with OAuth credentials.
    pub fn new(
        client_id: String,
        client_secret: String,
        api_url: String,
        oauth_url: String,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            oauth_url: oauth_url.trim_end_matches('/').to_string(),
            client_id,
            client_secret,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.strava_client_id.clone(),
            config.strava_client_secret.clone(),
            config.strava_api_url.clone(),
            config.strava_oauth_url.clone(),
        )
    }

    /// URL of the Strava authorization page the user is redirected to.
    pub fn authorize_url(&self, redirect_uri: &str) -> String {
        format!(
            "{}/authorize?\
             client_id={}&\
             response_type=code&\
             redirect_uri={}&\
             scope={}&\
             approval_prompt=auto",
            self.oauth_url,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(redirect_uri),
            urlencoding::encode("read,activity:read_all"),
        )
    }

    // ─── OAuth ───────────────────────────────────────────────────────────────

    /// Exchange an authorization code for tokens.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenExchangeResponse, AppError> {
        let body = TokenRequest {
            client_id: &self.client_id,
            client_secret: &self.client_secret,
            grant_type: "authorization_code",
            code: Some(code),
            refresh_token: None,
        };
        self.post_token(&body).await
    }

    /// Refresh an expired access token.
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<TokenRefreshResponse, AppError> {
        let body = TokenRequest {
            client_id: &self.client_id,
            client_secret: &self.client_secret,
            grant_type: "refresh_token",
            code: None,
            refresh_token: Some(refresh_token),
        };
        self.post_token(&body).await
    }

    async fn post_token<T: for<'de> Deserialize<'de>>(
        &self,
        body: &TokenRequest<'_>,
    ) -> Result<T, AppError> {
        let response = self
            .http
            .post(format!("{}/token", self.oauth_url))
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::OAuthExchange(format!("Token request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            tracing::error!(
                status = %status,
                grant_type = body.grant_type,
                body = %text,
                "Strava token endpoint rejected request"
            );
            return Err(AppError::OAuthExchange(format!("HTTP {}", status)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::OAuthExchange(format!("Failed to parse token response: {}", e)))
    }

    // ─── Activities ──────────────────────────────────────────────────────────

    /// Get a detailed activity by ID.
    pub async fn get_activity(
        &self,
        access_token: &str,
        activity_id: i64,
    ) -> Result<StravaActivity, AppError> {
        let url = format!("{}/activities/{}", self.api_url, activity_id);
        self.get_json(&url, access_token, &[]).await
    }

    /// List one page of the athlete's activities started after `after`.
    pub async fn list_activities(
        &self,
        access_token: &str,
        after: i64, // Unix timestamp
        page: u32,
        per_page: u32,
    ) -> Result<Vec<StravaActivity>, AppError> {
        let url = format!("{}/athlete/activities", self.api_url);
        self.get_json(
            &url,
            access_token,
            &[
                ("after", after.to_string()),
                ("page", page.to_string()),
                ("per_page", per_page.to_string()),
            ],
        )
        .await
    }

    /// Generic authenticated GET request with JSON response.
    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        url: &str,
        access_token: &str,
        query: &[(&str, String)],
    ) -> Result<T, AppError> {
        let response = self
            .http
            .get(url)
            .bearer_auth(access_token)
            .query(query)
            .send()
            .await
            .map_err(|e| AppError::Fetch(e.to_string()))?;

        check_response_json(response).await
    }

    // ─── Push Subscriptions ──────────────────────────────────────────────────

    /// The app's existing webhook subscription, if any.
    pub async fn get_push_subscription(&self) -> Result<Option<PushSubscription>, AppError> {
        let response = self
            .http
            .get(format!("{}/push_subscriptions", self.api_url))
            .query(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AppError::Fetch(e.to_string()))?;

        let subscriptions: Vec<PushSubscription> = check_response_json(response).await?;
        Ok(subscriptions.into_iter().next())
    }

    /// Register a webhook subscription. Strava calls back `callback_url`
    /// with a `hub.challenge` before this returns.
    pub async fn create_push_subscription(
        &self,
        callback_url: &str,
        verify_token: &str,
    ) -> Result<PushSubscription, AppError> {
        let response = self
            .http
            .post(format!("{}/push_subscriptions", self.api_url))
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("callback_url", callback_url),
                ("verify_token", verify_token),
            ])
            .send()
            .await
            .map_err(|e| AppError::Fetch(e.to_string()))?;

        check_response_json(response).await
    }
}

/// Check response status and parse the JSON body.
async fn check_response_json<T: for<'de> Deserialize<'de>>(
    response: reqwest::Response,
) -> Result<T, AppError> {
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if status.as_u16() == 429 {
            tracing::warn!("Strava rate limit hit (429)");
        }

        return Err(AppError::Fetch(format!("HTTP {}: {}", status, body)));
    }

    response
        .json()
        .await
        .map_err(|e| AppError::Fetch(format!("JSON parse error: {}", e)))
}

/// Body for POST /oauth/token.
#[derive(Serialize)]
struct TokenRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    grant_type: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    refresh_token: Option<&'a str>,
}

/// Token exchange response from Strava OAuth (includes athlete info).
#[derive(Debug, Clone, Deserialize)]
pub struct TokenExchangeResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: i64,
    pub athlete: StravaAthlete,
}

/// Token refresh response from Strava. No athlete here.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenRefreshResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: i64,
}

/// Athlete info from OAuth token exchange.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StravaAthlete {
    pub id: i64,
    #[serde(default)]
    pub firstname: Option<String>,
    #[serde(default)]
    pub lastname: Option<String>,
}

/// Activity as returned by both the detail and list endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct StravaActivity {
    pub id: i64,
    pub name: String,
    pub distance: f64,
    pub moving_time: i64,
    pub start_date: String,
    #[serde(rename = "type")]
    pub activity_type: String,
}

impl From<StravaActivity> for Activity {
    fn from(a: StravaActivity) -> Self {
        Activity {
            strava_id: a.id,
            name: a.name,
            distance_meters: a.distance,
            moving_time_seconds: a.moving_time,
            start_date: a.start_date,
            activity_type: a.activity_type,
        }
    }
}

/// Webhook subscription as reported by Strava.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PushSubscription {
    pub id: i64,
    #[serde(default)]
    pub callback_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}
