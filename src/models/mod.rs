// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod activity;
pub mod token;
pub mod webhook;

pub use activity::{Activity, TRACKED_ACTIVITY_TYPE};
pub use token::TokenRecord;
pub use webhook::{Aspect, WebhookEvent};
