//
// Copyright 2025-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Play session tracking
//!
//! Sessions are stored in-memory only. A join records when the player
//! arrived; the matching leave consumes the entry and reports the whole
//! minutes played. Sessions open across a restart are lost.

use crate::error::{BotError, BotResult};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Open play sessions keyed by player name
#[derive(Debug, Default)]
pub struct SessionTracker {
    sessions: HashMap<String, DateTime<Utc>>,
}

impl SessionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a join, replacing any session already open for the player
    pub fn mark_join(&mut self, player: &str, now: DateTime<Utc>) {
        if let Some(previous) = self.sessions.insert(player.to_string(), now) {
            tracing::debug!("Replacing open session for {} started at {}", player, previous);
        }
    }

    /// Close the player's session and return the whole minutes played
    ///
    /// A clock that moved backwards counts as zero minutes.
    pub fn resolve_leave(&mut self, player: &str, now: DateTime<Utc>) -> BotResult<u64> {
        let started = self
            .sessions
            .remove(player)
            .ok_or_else(|| BotError::NoSession(player.to_string()))?;

        let minutes = (now - started).num_minutes();
        Ok(u64::try_from(minutes).unwrap_or(0))
    }

    /// When the player's open session started, if any
    pub fn started_at(&self, player: &str) -> Option<DateTime<Utc>> {
        self.sessions.get(player).copied()
    }

    pub fn is_open(&self, player: &str) -> bool {
        self.sessions.contains_key(player)
    }

    pub fn open_count(&self) -> usize {
        self.sessions.len()
    }
}
