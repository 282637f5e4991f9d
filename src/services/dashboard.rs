// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! The per-athlete dashboard: sole owner of the activity store and tokens.
//!
//! Every operation that mutates state runs under one async gate, so at most
//! one mutation sequence (OAuth callback, sync, webhook event) is in flight.

use crate::config::Config;
use crate::db::SqliteDb;
use crate::error::Result;
use crate::models::{Activity, WebhookEvent};
use crate::services::strava::{PushSubscription, StravaClient};
use crate::services::sync::SyncEngine;
use crate::services::tokens::TokenManager;
use crate::services::webhook::{EventOutcome, WebhookHandler};
use std::sync::Arc;
use tokio::sync::Mutex;

/// What `GET /` should show.
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardView {
    /// No tokens yet: ask the user to connect Strava.
    Connect,
    /// Connected: every stored run, oldest first.
    Dashboard { activities: Vec<Activity> },
}

/// Result of `POST /webhook/register`.
#[derive(Debug, Clone)]
pub enum Registration {
    AlreadyRegistered(PushSubscription),
    Registered(PushSubscription),
}

#[derive(Clone)]
pub struct RunningDashboard {
    db: SqliteDb,
    client: StravaClient,
    tokens: TokenManager,
    sync: SyncEngine,
    webhooks: WebhookHandler,
    gate: Arc<Mutex<()>>,
}

impl RunningDashboard {
    pub fn new(client: StravaClient, db: SqliteDb) -> Self {
        let tokens = TokenManager::new(client.clone(), db.clone());
        Self {
            sync: SyncEngine::new(client.clone(), tokens.clone(), db.clone()),
            webhooks: WebhookHandler::new(client.clone(), tokens.clone(), db.clone()),
            tokens,
            client,
            db,
            gate: Arc::new(Mutex::new(())),
        }
    }

    /// Open the configured database and wire up the Strava client.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let db = SqliteDb::new(&config.database_url).await?;
        Ok(Self::new(StravaClient::from_config(config), db))
    }

    pub fn client(&self) -> &StravaClient {
        &self.client
    }

    /// Read-only view for the dashboard page.
    pub async fn view(&self) -> Result<DashboardView> {
        if !self.db.has_tokens().await? {
            return Ok(DashboardView::Connect);
        }
        let activities = self.db.list_activities().await?;
        Ok(DashboardView::Dashboard { activities })
    }

    /// Exchange an OAuth code and store the tokens. Returns the athlete ID.
    pub async fn handle_oauth_callback(&self, code: &str) -> Result<i64> {
        let _guard = self.gate.lock().await;
        self.tokens.handle_oauth_callback(code).await
    }

    /// Full resync. Returns the number of runs upserted.
    pub async fn sync(&self) -> Result<usize> {
        let _guard = self.gate.lock().await;
        self.sync.sync_activities().await
    }

    /// Apply one webhook event.
    pub async fn handle_webhook_event(&self, event: &WebhookEvent) -> Result<EventOutcome> {
        let _guard = self.gate.lock().await;

        if let Some(athlete_id) = self.tokens.athlete_id().await? {
            if athlete_id != event.owner_id {
                tracing::warn!(
                    owner_id = event.owner_id,
                    athlete_id,
                    "Webhook event for a different athlete than the connected one"
                );
            }
        }

        self.webhooks.handle_event(event).await
    }

    /// Make sure Strava has a webhook subscription pointing at `callback_url`.
    pub async fn register_webhook(
        &self,
        callback_url: &str,
        verify_token: &str,
    ) -> Result<Registration> {
        if let Some(existing) = self.client.get_push_subscription().await? {
            tracing::info!(subscription_id = existing.id, "Webhook already registered");
            return Ok(Registration::AlreadyRegistered(existing));
        }

        let created = self
            .client
            .create_push_subscription(callback_url, verify_token)
            .await?;
        tracing::info!(subscription_id = created.id, callback_url, "Webhook registered");
        Ok(Registration::Registered(created))
    }
}
