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

//! Event type definitions

use serde::{Deserialize, Serialize};

/// All events the bot publishes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BotEvent {
    /// A join was recorded for a player
    SessionStarted { player: String },

    /// A session closed and was converted into experience
    SessionEnded {
        player: String,
        minutes: u64,
        gained_xp: u64,
    },

    /// A player reached a new level
    ///
    /// `minutes` is `None` when the experience was granted by hand.
    LevelUp {
        player: String,
        level: u32,
        minutes: Option<u64>,
        gained_xp: u64,
    },
}

impl BotEvent {
    /// Announcement text for events that are posted to the level channel
    pub fn announcement(&self) -> Option<String> {
        match self {
            BotEvent::LevelUp {
                player,
                level,
                minutes: Some(minutes),
                gained_xp,
            } => Some(format!(
                "{} reached level {}! (played {} minutes, gained {} XP)",
                player, level, minutes, gained_xp
            )),
            BotEvent::LevelUp {
                player,
                level,
                minutes: None,
                ..
            } => Some(format!("{} reached level {}!", player, level)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_up_announcement() {
        let event = BotEvent::LevelUp {
            player: "Alex".into(),
            level: 2,
            minutes: Some(10),
            gained_xp: 100,
        };
        assert_eq!(
            event.announcement().as_deref(),
            Some("Alex reached level 2! (played 10 minutes, gained 100 XP)")
        );
    }

    #[test]
    fn test_manual_level_up_announcement() {
        let event = BotEvent::LevelUp {
            player: "Steve".into(),
            level: 5,
            minutes: None,
            gained_xp: 4000,
        };
        assert_eq!(event.announcement().as_deref(), Some("Steve reached level 5!"));
    }

    #[test]
    fn test_session_events_are_not_announced() {
        let event = BotEvent::SessionEnded {
            player: "Steve".into(),
            minutes: 3,
            gained_xp: 30,
        };
        assert_eq!(event.announcement(), None);
    }
}
