// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Cumulative distance per year.

use crate::models::Activity;
use crate::render::calendar::day_of_year;
use chrono::Datelike;

/// One point on a year curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    /// Day of year; 0 is the origin point before January 1.
    pub day: u32,
    /// Kilometers run up to and including this day's activity.
    pub cum_km: f64,
}

/// Cumulative kilometers through one calendar year, origin first.
#[derive(Debug, Clone, PartialEq)]
pub struct YearSeries {
    pub year: i32,
    pub points: Vec<SeriesPoint>,
}

impl YearSeries {
    /// Distance at the end of the series.
    pub fn total_km(&self) -> f64 {
        self.points.last().map(|p| p.cum_km).unwrap_or(0.0)
    }

    /// A lone origin point does not make a line.
    pub fn is_drawable(&self) -> bool {
        self.points.len() >= 2
    }
}

/// Build the curve for `year`: one point per activity, in start order.
///
/// Years are taken in UTC. Activities with an unparseable start date are
/// skipped.
pub fn build_year_series(activities: &[Activity], year: i32) -> YearSeries {
    let mut dated: Vec<_> = activities
        .iter()
        .filter_map(|a| a.started_at().map(|ts| (ts, a)))
        .filter(|(ts, _)| ts.year() == year)
        .collect();
    dated.sort_by_key(|(ts, _)| *ts);

    let mut points = Vec::with_capacity(dated.len() + 1);
    points.push(SeriesPoint { day: 0, cum_km: 0.0 });

    let mut cum_km = 0.0;
    for (ts, activity) in dated {
        cum_km += activity.distance_km();
        points.push(SeriesPoint {
            day: day_of_year(ts.date_naive()),
            cum_km,
        });
    }

    YearSeries { year, points }
}
