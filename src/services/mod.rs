// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod dashboard;
pub mod strava;
pub mod sync;
pub mod tokens;
pub mod webhook;

pub use dashboard::{DashboardView, Registration, RunningDashboard};
pub use strava::StravaClient;
pub use sync::SyncEngine;
pub use tokens::TokenManager;
pub use webhook::{EventOutcome, WebhookHandler};
