// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Full activity sync from Strava.
//!
//! Walks the athlete's activity list page by page (strictly one request at a
//! time) and upserts every run into the store as each page arrives.

use crate::db::SqliteDb;
use crate::error::Result;
use crate::models::Activity;
use crate::services::strava::StravaClient;
use crate::services::tokens::TokenManager;
use crate::time_utils::format_utc_rfc3339;
use chrono::{DateTime, Duration, Utc};

/// Activities requested per page (Strava's maximum).
pub const SYNC_PAGE_SIZE: u32 = 200;

/// How far back a full sync reaches.
pub const SYNC_LOOKBACK_DAYS: i64 = 3 * 365;

/// Fetches activity history and upserts the runs.
#[derive(Clone)]
pub struct SyncEngine {
    client: StravaClient,
    tokens: TokenManager,
    db: SqliteDb,
}

impl SyncEngine {
    pub fn new(client: StravaClient, tokens: TokenManager, db: SqliteDb) -> Self {
        Self { client, tokens, db }
    }

    /// Sync the last three years of runs. Returns the number of runs upserted.
    pub async fn sync_activities(&self) -> Result<usize> {
        self.sync_since(Utc::now() - Duration::days(SYNC_LOOKBACK_DAYS))
            .await
    }

    /// Sync every run that started after `after`.
    ///
    /// A failed page aborts the sync; pages already processed stay stored.
    pub async fn sync_since(&self, after: DateTime<Utc>) -> Result<usize> {
        let access_token = self.tokens.get_valid_access_token().await?;
        let after_ts = after.timestamp();

        tracing::info!(after = %format_utc_rfc3339(after), "Starting activity sync");

        let mut page = 1u32;
        let mut fetched = 0usize;
        let mut synced = 0usize;

        loop {
            let batch = self
                .client
                .list_activities(&access_token, after_ts, page, SYNC_PAGE_SIZE)
                .await?;
            let batch_len = batch.len();
            fetched += batch_len;

            for activity in batch.into_iter().map(Activity::from) {
                if !activity.is_tracked() {
                    continue;
                }
                self.db.upsert_activity(&activity).await?;
                synced += 1;
            }

            tracing::debug!(page, batch_len, synced, "Synced activity page");

            if batch_len < SYNC_PAGE_SIZE as usize {
                break;
            }
            page += 1;
        }

        tracing::info!(pages = page, fetched, synced, "Activity sync complete");
        Ok(synced)
    }
}
