// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Incremental activity updates from Strava webhook events.
//!
//! - delete: drop the row, no Strava call
//! - create/update: fetch the activity; upsert runs, drop anything that
//!   stopped being a run

use crate::db::SqliteDb;
use crate::error::Result;
use crate::models::{Activity, Aspect, WebhookEvent};
use crate::services::strava::StravaClient;
use crate::services::tokens::TokenManager;

/// What handling an event did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// Not an activity event, or an aspect we don't handle.
    Ignored,
    Upserted,
    /// Row removed (or was already absent).
    Deleted,
}

/// Applies webhook events to the activity store.
#[derive(Clone)]
pub struct WebhookHandler {
    client: StravaClient,
    tokens: TokenManager,
    db: SqliteDb,
}

impl WebhookHandler {
    pub fn new(client: StravaClient, tokens: TokenManager, db: SqliteDb) -> Self {
        Self { client, tokens, db }
    }

    /// Apply one event. Fetch failures propagate; nothing is retried.
    pub async fn handle_event(&self, event: &WebhookEvent) -> Result<EventOutcome> {
        if !event.is_activity() {
            tracing::debug!(
                object_type = %event.object_type,
                aspect_type = %event.aspect_type,
                "Ignoring non-activity event"
            );
            return Ok(EventOutcome::Ignored);
        }

        let activity_id = event.object_id;

        match event.aspect() {
            Some(Aspect::Delete) => {
                let removed = self.db.delete_activity(activity_id).await?;
                tracing::info!(activity_id, removed, "Activity deleted");
                Ok(EventOutcome::Deleted)
            }
            Some(Aspect::Create) | Some(Aspect::Update) => {
                let access_token = self.tokens.get_valid_access_token().await?;
                let activity: Activity = self
                    .client
                    .get_activity(&access_token, activity_id)
                    .await?
                    .into();

                if !activity.is_tracked() {
                    // Covers a run that was re-typed to something else.
                    let removed = self.db.delete_activity(activity_id).await?;
                    tracing::info!(
                        activity_id,
                        activity_type = %activity.activity_type,
                        removed,
                        "Activity is not a run, dropping"
                    );
                    return Ok(EventOutcome::Deleted);
                }

                self.db.upsert_activity(&activity).await?;
                tracing::info!(
                    activity_id,
                    aspect_type = %event.aspect_type,
                    distance_meters = activity.distance_meters,
                    "Activity upserted"
                );
                Ok(EventOutcome::Upserted)
            }
            None => {
                tracing::debug!(aspect_type = %event.aspect_type, "Ignoring unknown aspect");
                Ok(EventOutcome::Ignored)
            }
        }
    }
}
