// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Year-to-date progress against the annual goal.

use crate::models::Activity;
use crate::render::calendar::{day_of_year, days_in_year};
use chrono::{DateTime, Datelike, Duration, Utc};

/// Summary numbers shown next to the chart.
#[derive(Debug, Clone, PartialEq)]
pub struct YearMetrics {
    pub year: i32,
    /// Distance run so far this year (km)
    pub total_km: f64,
    /// Where constant pace toward the goal would be today (km)
    pub target_km: f64,
    /// `total_km - target_km`; non-negative means ahead of pace
    pub delta_km: f64,
    /// Distance over the trailing seven days (km)
    pub last_7_days_km: f64,
}

impl YearMetrics {
    pub fn compute(activities: &[Activity], now: DateTime<Utc>, goal_km: f64) -> Self {
        let year = now.year();
        let week_ago = now - Duration::days(7);

        let mut total_km = 0.0;
        let mut last_7_days_km = 0.0;
        for activity in activities {
            let Some(started_at) = activity.started_at() else {
                continue;
            };
            if started_at.year() != year {
                continue;
            }
            total_km += activity.distance_km();
            if started_at >= week_ago {
                last_7_days_km += activity.distance_km();
            }
        }

        let target_km = prorated_target(
            goal_km,
            day_of_year(now.date_naive()),
            days_in_year(year),
        );

        Self {
            year,
            total_km,
            target_km,
            delta_km: total_km - target_km,
            last_7_days_km,
        }
    }

    pub fn is_ahead(&self) -> bool {
        self.delta_km >= 0.0
    }
}

/// Goal prorated to `day` of a `days_in_year`-day year.
pub fn prorated_target(goal_km: f64, day: u32, days_in_year: u32) -> f64 {
    goal_km * f64::from(day) / f64::from(days_in_year)
}
