// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! SQLite store with typed operations.
//!
//! Holds two tables:
//! - `activities` (running activities, upserted by Strava ID)
//! - `tokens` (a single row with the current OAuth token set)

use crate::db::tables;
use crate::error::AppError;
use crate::models::{Activity, TokenRecord};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

/// Primary key of the only row in the tokens table.
const TOKEN_ROW_ID: i64 = 1;

/// SQLite database handle.
#[derive(Clone)]
pub struct SqliteDb {
    pool: SqlitePool,
}

impl SqliteDb {
    /// Open (creating if needed) the database at `url` and ensure the schema exists.
    pub async fn new(url: &str) -> Result<Self, AppError> {
        if url.contains(":memory:") {
            return Self::new_in_memory().await;
        }

        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| AppError::Database(format!("Invalid database URL: {}", e)))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| AppError::Database(format!("Failed to open SQLite: {}", e)))?;

        tracing::info!(url, "Connected to SQLite");

        let db = Self { pool };
        db.create_schema().await?;
        Ok(db)
    }

    /// Create a private in-memory database.
    ///
    /// Pinned to a single connection that never expires: every new
    /// connection to `:memory:` would be a separate, empty database.
    pub async fn new_in_memory() -> Result<Self, AppError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .map_err(|e| AppError::Database(format!("Failed to open SQLite: {}", e)))?;

        tracing::debug!("Using in-memory SQLite");

        let db = Self { pool };
        db.create_schema().await?;
        Ok(db)
    }

    async fn create_schema(&self) -> Result<(), AppError> {
        sqlx::query(&format!(
            "CREATE TABLE IF NOT EXISTS {} (
                strava_id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                distance_meters REAL NOT NULL,
                moving_time_seconds INTEGER NOT NULL,
                start_date TEXT NOT NULL,
                activity_type TEXT NOT NULL
            )",
            tables::ACTIVITIES
        ))
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        sqlx::query(&format!(
            "CREATE INDEX IF NOT EXISTS idx_activities_start_date ON {} (start_date)",
            tables::ACTIVITIES
        ))
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        sqlx::query(&format!(
            "CREATE TABLE IF NOT EXISTS {} (
                id INTEGER PRIMARY KEY CHECK (id = {}),
                athlete_id INTEGER NOT NULL,
                access_token TEXT NOT NULL,
                refresh_token TEXT NOT NULL,
                expires_at INTEGER NOT NULL
            )",
            tables::TOKENS,
            TOKEN_ROW_ID
        ))
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    // ─── Token Operations ────────────────────────────────────────

    /// Get the stored token set, if the OAuth flow has been completed.
    pub async fn get_tokens(&self) -> Result<Option<TokenRecord>, AppError> {
        sqlx::query_as::<_, TokenRecord>(&format!(
            "SELECT athlete_id, access_token, refresh_token, expires_at FROM {} WHERE id = ?1",
            tables::TOKENS
        ))
        .bind(TOKEN_ROW_ID)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Store the token set, replacing whatever was there.
    pub async fn set_tokens(&self, tokens: &TokenRecord) -> Result<(), AppError> {
        sqlx::query(&format!(
            "INSERT INTO {} (id, athlete_id, access_token, refresh_token, expires_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(id) DO UPDATE SET
                 athlete_id = excluded.athlete_id,
                 access_token = excluded.access_token,
                 refresh_token = excluded.refresh_token,
                 expires_at = excluded.expires_at",
            tables::TOKENS
        ))
        .bind(TOKEN_ROW_ID)
        .bind(tokens.athlete_id)
        .bind(&tokens.access_token)
        .bind(&tokens.refresh_token)
        .bind(tokens.expires_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    pub async fn has_tokens(&self) -> Result<bool, AppError> {
        Ok(self.get_tokens().await?.is_some())
    }

    // ─── Activity Operations ─────────────────────────────────────

    /// Insert an activity, or overwrite every field of the existing row.
    pub async fn upsert_activity(&self, activity: &Activity) -> Result<(), AppError> {
        sqlx::query(&format!(
            "INSERT INTO {} (strava_id, name, distance_meters, moving_time_seconds, start_date, activity_type)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(strava_id) DO UPDATE SET
                 name = excluded.name,
                 distance_meters = excluded.distance_meters,
                 moving_time_seconds = excluded.moving_time_seconds,
                 start_date = excluded.start_date,
                 activity_type = excluded.activity_type",
            tables::ACTIVITIES
        ))
        .bind(activity.strava_id)
        .bind(&activity.name)
        .bind(activity.distance_meters)
        .bind(activity.moving_time_seconds)
        .bind(&activity.start_date)
        .bind(&activity.activity_type)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete an activity. Returns `true` if a row was removed.
    pub async fn delete_activity(&self, strava_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query(&format!(
            "DELETE FROM {} WHERE strava_id = ?1",
            tables::ACTIVITIES
        ))
        .bind(strava_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected() > 0)
    }

    /// Get an activity by Strava ID.
    pub async fn get_activity(&self, strava_id: i64) -> Result<Option<Activity>, AppError> {
        sqlx::query_as::<_, Activity>(&format!(
            "SELECT strava_id, name, distance_meters, moving_time_seconds, start_date, activity_type
             FROM {} WHERE strava_id = ?1",
            tables::ACTIVITIES
        ))
        .bind(strava_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))
    }

    /// All stored activities, oldest first.
    pub async fn list_activities(&self) -> Result<Vec<Activity>, AppError> {
        sqlx::query_as::<_, Activity>(&format!(
            "SELECT strava_id, name, distance_meters, moving_time_seconds, start_date, activity_type
             FROM {} ORDER BY start_date ASC",
            tables::ACTIVITIES
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))
    }

    pub async fn count_activities(&self) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {}", tables::ACTIVITIES))
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
