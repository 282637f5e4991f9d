// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Strava webhook event payload.

use serde::Deserialize;
use std::collections::HashMap;

/// A push notification from Strava.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    /// "activity" or "athlete"
    pub object_type: String,
    pub object_id: i64,
    /// "create", "update" or "delete"
    pub aspect_type: String,
    pub owner_id: i64,
    #[serde(default)]
    pub subscription_id: Option<i64>,
    #[serde(default)]
    pub event_time: Option<i64>,
    #[serde(default)]
    pub updates: Option<HashMap<String, serde_json::Value>>,
}

/// What a webhook event asks us to do with an activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aspect {
    Create,
    Update,
    Delete,
}

impl WebhookEvent {
    /// Parsed aspect, `None` for anything we don't recognise.
    pub fn aspect(&self) -> Option<Aspect> {
        match self.aspect_type.as_str() {
            "create" => Some(Aspect::Create),
            "update" => Some(Aspect::Update),
            "delete" => Some(Aspect::Delete),
            _ => None,
        }
    }

    pub fn is_activity(&self) -> bool {
        self.object_type == "activity"
    }
}
