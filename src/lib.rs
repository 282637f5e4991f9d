// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Running Dashboard: a personal year-over-year running tracker
//!
//! This crate keeps a local copy of one athlete's Strava runs, fed by a full
//! sync and by Strava webhook events, and renders a cumulative-distance
//! dashboard as server-side HTML and SVG.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod render;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use services::RunningDashboard;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub dashboard: RunningDashboard,
}
