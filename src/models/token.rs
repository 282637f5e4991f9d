// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! OAuth token set for the connected Strava athlete.

use serde::{Deserialize, Serialize};

/// The single stored token set.
///
/// There is at most one of these; the store exposes it as `Option<TokenRecord>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct TokenRecord {
    /// Strava athlete ID of the owner
    pub athlete_id: i64,
    pub access_token: String,
    pub refresh_token: String,
    /// Absolute expiry (Unix epoch seconds)
    pub expires_at: i64,
}

impl TokenRecord {
    /// True if the access token is still valid for more than `margin_secs`.
    pub fn is_fresh(&self, now: i64, margin_secs: i64) -> bool {
        self.expires_at > now + margin_secs
    }
}
