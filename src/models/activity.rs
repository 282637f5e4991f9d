// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Running activity model for storage and rendering.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Activity type tracked by the dashboard.
pub const TRACKED_ACTIVITY_TYPE: &str = "Run";

/// Stored activity record (one row of the `activities` table).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Activity {
    /// Strava activity ID (unique key)
    pub strava_id: i64,
    /// Activity name/title
    pub name: String,
    /// Distance in meters
    pub distance_meters: f64,
    /// Moving time in seconds
    pub moving_time_seconds: i64,
    /// Start date/time (ISO 8601, UTC)
    pub start_date: String,
    /// Strava activity type (Run, Ride, ...)
    pub activity_type: String,
}

impl Activity {
    /// Parsed start timestamp, `None` if Strava sent something unexpected.
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        crate::time_utils::parse_utc(&self.start_date)
    }

    /// Distance in kilometers.
    pub fn distance_km(&self) -> f64 {
        self.distance_meters / 1000.0
    }

    pub fn is_tracked(&self) -> bool {
        self.activity_type == TRACKED_ACTIVITY_TYPE
    }
}
