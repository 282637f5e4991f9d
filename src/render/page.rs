// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Full HTML pages: the dashboard and the "connect Strava" prompt.

use crate::error::Result;
use crate::models::Activity;
use crate::render::chart::render_chart;
use crate::render::metrics::YearMetrics;
use crate::render::series::{build_year_series, YearSeries};
use chrono::{DateTime, Datelike, Utc};

/// How many calendar years the chart compares (current plus prior).
pub const CHART_YEARS: i32 = 3;

const AHEAD_COLOR: &str = "#34a853";
const BEHIND_COLOR: &str = "#d93025";

const STYLES: &str = r#"
    * { margin: 0; padding: 0; box-sizing: border-box; }
    body { font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif; background: #f5f5f5; color: #333; padding: 24px; }
    h1 { font-size: 24px; margin-bottom: 20px; }
    .chart-container { background: white; border-radius: 8px; padding: 16px; box-shadow: 0 1px 3px rgba(0,0,0,0.1); }
    .metrics-card { background: white; border-radius: 8px; padding: 16px 20px; margin-top: 20px; box-shadow: 0 1px 3px rgba(0,0,0,0.1); }
    .metrics-table { border-collapse: collapse; }
    .metrics-table td { padding: 4px 16px 4px 0; }
    .metric-label { font-size: 13px; color: #666; }
    .metric-value { font-size: 20px; font-weight: 700; text-align: right; }
    .footer { margin-top: 20px; font-size: 13px; color: #999; }
    .footer a { color: #666; }
    body.connect { display: flex; align-items: center; justify-content: center; min-height: 100vh; }
    .container { text-align: center; background: white; padding: 48px; border-radius: 12px; box-shadow: 0 1px 3px rgba(0,0,0,0.1); }
    .container h1 { margin-bottom: 16px; }
    .container p { color: #666; margin-bottom: 24px; }
    a.btn { display: inline-block; background: #FC4C02; color: white; text-decoration: none; padding: 12px 32px; border-radius: 6px; font-weight: 600; }
    a.btn:hover { background: #e04400; }
"#;

/// Series for the current year and the years before it, newest first.
pub fn chart_series(activities: &[Activity], current_year: i32) -> Vec<YearSeries> {
    (0..CHART_YEARS)
        .map(|offset| build_year_series(activities, current_year - offset))
        .collect()
}

/// The dashboard page for `activities` as of `now`.
pub fn render_dashboard(
    activities: &[Activity],
    now: DateTime<Utc>,
    goal_km: f64,
) -> Result<String> {
    let current_year = now.year();
    let metrics = YearMetrics::compute(activities, now, goal_km);
    let chart = render_chart(current_year, &chart_series(activities, current_year), goal_km)?;

    let (delta_color, delta_sign) = if metrics.is_ahead() {
        (AHEAD_COLOR, "+")
    } else {
        (BEHIND_COLOR, "")
    };

    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Running Dashboard</title>
  <style>{styles}</style>
</head>
<body class="dashboard">
  <h1>Running {year}</h1>
  <div class="chart-container">
    {chart}
  </div>
  <div class="metrics-card">
    <table class="metrics-table">
      <tr><td class="metric-label">Distance</td><td class="metric-value">{total:.1} km</td></tr>
      <tr><td class="metric-label">Target</td><td class="metric-value">{target:.1} km</td></tr>
      <tr><td class="metric-label">Delta</td><td class="metric-value" style="color:{delta_color}">{delta_sign}{delta:.1} km</td></tr>
      <tr><td class="metric-label">Last 7 days</td><td class="metric-value">{week:.1} km</td></tr>
    </table>
  </div>
  <div class="footer">
    <a href="/sync">Sync all activities</a>
  </div>
</body>
</html>"#,
        styles = STYLES,
        year = current_year,
        chart = chart,
        total = metrics.total_km,
        target = metrics.target_km,
        delta_color = delta_color,
        delta_sign = delta_sign,
        delta = metrics.delta_km,
        week = metrics.last_7_days_km,
    ))
}

/// Shown until the OAuth flow has been completed.
pub fn render_connect_page() -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Connect Strava</title>
  <style>{styles}</style>
</head>
<body class="connect">
  <div class="container">
    <h1>Running Dashboard</h1>
    <p>Connect your Strava account to get started.</p>
    <a class="btn" href="/auth">Connect with Strava</a>
  </div>
</body>
</html>"#,
        styles = STYLES
    )
}

/// Body for `GET /sync`.
pub fn render_sync_result(count: usize) -> String {
    format!(
        r#"<p>Synced {} runs. <a href="/">Back to dashboard</a></p>"#,
        count
    )
}
