// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! OAuth token lifecycle: code exchange, freshness check and refresh.

use crate::db::SqliteDb;
use crate::error::AppError;
use crate::models::TokenRecord;
use crate::services::strava::StravaClient;
use chrono::Utc;

/// Tokens expiring within this many seconds are refreshed before use.
pub const TOKEN_REFRESH_MARGIN_SECS: i64 = 60;

/// Obtains, refreshes and persists the athlete's OAuth tokens.
#[derive(Clone)]
pub struct TokenManager {
    client: StravaClient,
    db: SqliteDb,
}

impl TokenManager {
    pub fn new(client: StravaClient, db: SqliteDb) -> Self {
        Self { client, db }
    }

    /// Get a valid (non-expiring) access token.
    ///
    /// Returns the stored token when it is good for more than
    /// `TOKEN_REFRESH_MARGIN_SECS`; otherwise refreshes it with Strava and
    /// stores the new triple. A failed refresh leaves the stored record as is.
    pub async fn get_valid_access_token(&self) -> Result<String, AppError> {
        let tokens = self.db.get_tokens().await?.ok_or(AppError::NoToken)?;

        let now = Utc::now().timestamp();
        if tokens.is_fresh(now, TOKEN_REFRESH_MARGIN_SECS) {
            return Ok(tokens.access_token);
        }

        tracing::info!(
            athlete_id = tokens.athlete_id,
            expires_at = tokens.expires_at,
            "Access token expired or expiring, refreshing"
        );

        let refreshed = self
            .client
            .refresh_token(&tokens.refresh_token)
            .await
            .map_err(|e| AppError::TokenRefresh(e.to_string()))?;

        // Refresh responses carry no athlete, keep the one we have.
        let updated = TokenRecord {
            athlete_id: tokens.athlete_id,
            access_token: refreshed.access_token,
            refresh_token: refreshed.refresh_token,
            expires_at: refreshed.expires_at,
        };
        self.db.set_tokens(&updated).await?;

        tracing::info!(
            athlete_id = updated.athlete_id,
            expires_at = updated.expires_at,
            "Token refreshed"
        );
        Ok(updated.access_token)
    }

    /// Exchange an authorization code and store the resulting tokens.
    ///
    /// Returns the athlete ID. Nothing is written if the exchange fails.
    pub async fn handle_oauth_callback(&self, code: &str) -> Result<i64, AppError> {
        let response = self.client.exchange_code(code).await?;

        let tokens = TokenRecord {
            athlete_id: response.athlete.id,
            access_token: response.access_token,
            refresh_token: response.refresh_token,
            expires_at: response.expires_at,
        };
        self.db.set_tokens(&tokens).await?;

        tracing::info!(
            athlete_id = tokens.athlete_id,
            firstname = response.athlete.firstname.as_deref().unwrap_or(""),
            "OAuth callback handled, tokens stored"
        );
        Ok(tokens.athlete_id)
    }

    /// The athlete ID of the stored token set, if any.
    pub async fn athlete_id(&self) -> Result<Option<i64>, AppError> {
        Ok(self.db.get_tokens().await?.map(|t| t.athlete_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    async fn manager(server: &mockito::ServerGuard) -> (TokenManager, SqliteDb) {
        let db = SqliteDb::new_in_memory().await.unwrap();
        let client = StravaClient::new(
            "cid".to_string(),
            "csecret".to_string(),
            format!("{}/api/v3", server.url()),
            format!("{}/oauth", server.url()),
        );
        (TokenManager::new(client, db.clone()), db)
    }

    fn stored(expires_in: i64) -> TokenRecord {
        TokenRecord {
            athlete_id: 42,
            access_token: "old_access".to_string(),
            refresh_token: "old_refresh".to_string(),
            expires_at: Utc::now().timestamp() + expires_in,
        }
    }

    #[tokio::test]
    async fn test_no_token_stored() {
        let server = mockito::Server::new_async().await;
        let (manager, _db) = manager(&server).await;

        let err = manager.get_valid_access_token().await.unwrap_err();
        assert!(matches!(err, AppError::NoToken));
    }

    #[tokio::test]
    async fn test_fresh_token_is_reused_without_network() {
        let mut server = mockito::Server::new_async().await;
        let refresh = server
            .mock("POST", "/oauth/token")
            .expect(0)
            .create_async()
            .await;
        let (manager, db) = manager(&server).await;
        db.set_tokens(&stored(120)).await.unwrap();

        let token = manager.get_valid_access_token().await.unwrap();

        assert_eq!(token, "old_access");
        refresh.assert_async().await;
    }

    #[tokio::test]
    async fn test_expiring_token_is_refreshed_and_stored() {
        let mut server = mockito::Server::new_async().await;
        let new_expiry = Utc::now().timestamp() + 21600;
        let refresh = server
            .mock("POST", "/oauth/token")
            .match_body(Matcher::PartialJson(json!({
                "client_id": "cid",
                "client_secret": "csecret",
                "grant_type": "refresh_token",
                "refresh_token": "old_refresh"
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "token_type": "Bearer",
                    "access_token": "new_access",
                    "refresh_token": "new_refresh",
                    "expires_at": new_expiry,
                    "expires_in": 21600
                })
                .to_string(),
            )
            .expect(1)
            .create_async()
            .await;
        let (manager, db) = manager(&server).await;
        db.set_tokens(&stored(30)).await.unwrap();

        let token = manager.get_valid_access_token().await.unwrap();

        assert_eq!(token, "new_access");
        refresh.assert_async().await;
        assert_eq!(
            db.get_tokens().await.unwrap(),
            Some(TokenRecord {
                athlete_id: 42,
                access_token: "new_access".to_string(),
                refresh_token: "new_refresh".to_string(),
                expires_at: new_expiry,
            })
        );
    }

    #[tokio::test]
    async fn test_failed_refresh_leaves_record_unchanged() {
        let mut server = mockito::Server::new_async().await;
        let _refresh = server
            .mock("POST", "/oauth/token")
            .with_status(400)
            .with_body(r#"{"message":"Bad Request","errors":[{"code":"invalid"}]}"#)
            .create_async()
            .await;
        let (manager, db) = manager(&server).await;
        let before = stored(-10);
        db.set_tokens(&before).await.unwrap();

        let err = manager.get_valid_access_token().await.unwrap_err();

        assert!(matches!(err, AppError::TokenRefresh(_)));
        assert_eq!(db.get_tokens().await.unwrap(), Some(before));
    }

    #[tokio::test]
    async fn test_oauth_callback_stores_athlete_and_tokens() {
        let mut server = mockito::Server::new_async().await;
        let _exchange = server
            .mock("POST", "/oauth/token")
            .match_body(Matcher::PartialJson(json!({
                "grant_type": "authorization_code",
                "code": "abc"
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "access_token": "acc",
                    "refresh_token": "ref",
                    "expires_at": 1_900_000_000,
                    "athlete": {"id": 134815, "firstname": "Jane"}
                })
                .to_string(),
            )
            .create_async()
            .await;
        let (manager, db) = manager(&server).await;

        let athlete_id = manager.handle_oauth_callback("abc").await.unwrap();

        assert_eq!(athlete_id, 134815);
        assert_eq!(manager.athlete_id().await.unwrap(), Some(134815));
        let tokens = db.get_tokens().await.unwrap().unwrap();
        assert_eq!(tokens.access_token, "acc");
        assert_eq!(tokens.expires_at, 1_900_000_000);
    }

    #[tokio::test]
    async fn test_rejected_code_writes_nothing() {
        let mut server = mockito::Server::new_async().await;
        let _exchange = server
            .mock("POST", "/oauth/token")
            .with_status(401)
            .create_async()
            .await;
        let (manager, db) = manager(&server).await;

        let err = manager.handle_oauth_callback("bad").await.unwrap_err();

        assert!(matches!(err, AppError::OAuthExchange(_)));
        assert_eq!(db.get_tokens().await.unwrap(), None);
    }
}
