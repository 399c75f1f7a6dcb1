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

//! Experience award engine
//!
//! Converts closed play sessions into experience. The engine holds no state
//! of its own beyond its rate; it orchestrates the [`SessionTracker`], the
//! [`PlayerLedger`] and the [`EventBus`] handed to it.

use crate::error::{BotError, BotResult};
use crate::events::{BotEvent, EventBus};
use crate::ledger::{AwardResult, PlayerLedger};
use crate::session::SessionTracker;
use chrono::{DateTime, Utc};
use waypoint_common::PlayerRecord;

/// Default experience granted per minute played
pub const DEFAULT_XP_PER_MINUTE: u64 = 10;

/// What became of a leave signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AwardOutcome {
    /// No join was recorded for the player
    NoSession,

    /// The session lasted under a minute and earned nothing
    TooShort { minutes: u64 },

    /// Experience was granted
    Awarded {
        minutes: u64,
        gained_xp: u64,
        record: PlayerRecord,
        levels_gained: u32,
    },
}

/// Session-to-experience converter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExperienceEngine {
    xp_per_minute: u64,
}

impl ExperienceEngine {
    pub fn new(xp_per_minute: u64) -> Self {
        Self { xp_per_minute }
    }

    pub fn xp_per_minute(&self) -> u64 {
        self.xp_per_minute
    }

    /// Experience earned for a number of whole minutes
    pub fn xp_for_minutes(&self, minutes: u64) -> u64 {
        minutes.saturating_mul(self.xp_per_minute)
    }

    /// Open a session for the player
    pub fn on_join(&self, sessions: &mut SessionTracker, events: &EventBus, player: &str, now: DateTime<Utc>) {
        sessions.mark_join(player, now);
        events.publish(BotEvent::SessionStarted {
            player: player.to_string(),
        });
    }

    /// Close the player's session and award experience for it
    ///
    /// Sessions under one minute are discarded without touching the ledger.
    /// If the ledger cannot be saved the session is reopened with its
    /// original start time and the error is returned.
    pub fn on_leave(
        &self,
        sessions: &mut SessionTracker,
        ledger: &mut PlayerLedger,
        events: &EventBus,
        player: &str,
        now: DateTime<Utc>,
    ) -> BotResult<AwardOutcome> {
        let Some(started) = sessions.started_at(player) else {
            tracing::debug!("Leave for {} without a recorded join", player);
            return Ok(AwardOutcome::NoSession);
        };

        let minutes = match sessions.resolve_leave(player, now) {
            Ok(minutes) => minutes,
            Err(BotError::NoSession(_)) => return Ok(AwardOutcome::NoSession),
            Err(e) => return Err(e),
        };

        if minutes < 1 {
            tracing::debug!("Session for {} lasted under a minute, no award", player);
            return Ok(AwardOutcome::TooShort { minutes });
        }

        let gained_xp = self.xp_for_minutes(minutes);
        let AwardResult {
            record,
            levels_gained,
        } = match ledger.award(player, gained_xp) {
            Ok(result) => result,
            Err(e) => {
                sessions.mark_join(player, started);
                return Err(e);
            }
        };

        tracing::info!(
            "{} left after {} minutes, gained {} xp (level {}, xp {})",
            player,
            minutes,
            gained_xp,
            record.level,
            record.xp
        );

        events.publish(BotEvent::SessionEnded {
            player: player.to_string(),
            minutes,
            gained_xp,
        });
        if levels_gained > 0 {
            events.publish(BotEvent::LevelUp {
                player: player.to_string(),
                level: record.level,
                minutes: Some(minutes),
                gained_xp,
            });
        }

        Ok(AwardOutcome::Awarded {
            minutes,
            gained_xp,
            record,
            levels_gained,
        })
    }

    /// Grant experience by hand, announcing any level-up
    pub fn manual_award(
        &self,
        ledger: &mut PlayerLedger,
        events: &EventBus,
        player: &str,
        amount: u64,
    ) -> BotResult<AwardResult> {
        let result = ledger.award(player, amount)?;
        if result.levels_gained > 0 {
            events.publish(BotEvent::LevelUp {
                player: player.to_string(),
                level: result.record.level,
                minutes: None,
                gained_xp: amount,
            });
        }
        Ok(result)
    }
}

impl Default for ExperienceEngine {
    fn default() -> Self {
        Self::new(DEFAULT_XP_PER_MINUTE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progression::LevelCurve;
    use chrono::{Duration, TimeZone};
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        sessions: SessionTracker,
        ledger: PlayerLedger,
        events: EventBus,
        engine: ExperienceEngine,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let ledger = PlayerLedger::load(dir.path().join("levels.json"), LevelCurve::default()).unwrap();
        Fixture {
            _dir: dir,
            sessions: SessionTracker::new(),
            ledger,
            events: EventBus::new(),
            engine: ExperienceEngine::default(),
        }
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 20, 0, 0).unwrap()
    }

    fn level_ups(events: &EventBus) -> Vec<BotEvent> {
        let collected = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = collected.clone();
        events.subscribe(move |event| {
            if matches!(event, BotEvent::LevelUp { .. }) {
                sink.lock().unwrap().push(event.clone());
            }
        });
        events.process_events();
        let collected = collected.lock().unwrap().clone();
        collected
    }

    #[test]
    fn test_ten_minute_session_levels_up_once() {
        let mut f = fixture();
        f.engine.on_join(&mut f.sessions, &f.events, "Alex", t0());

        let outcome = f
            .engine
            .on_leave(&mut f.sessions, &mut f.ledger, &f.events, "Alex", t0() + Duration::seconds(650))
            .unwrap();

        assert_eq!(
            outcome,
            AwardOutcome::Awarded {
                minutes: 10,
                gained_xp: 100,
                record: PlayerRecord { xp: 0, level: 2 },
                levels_gained: 1,
            }
        );
        assert_eq!(
            level_ups(&f.events),
            vec![BotEvent::LevelUp {
                player: "Alex".into(),
                level: 2,
                minutes: Some(10),
                gained_xp: 100,
            }]
        );
    }

    #[test]
    fn test_short_session_is_discarded() {
        let mut f = fixture();
        f.engine.on_join(&mut f.sessions, &f.events, "Steve", t0());

        let outcome = f
            .engine
            .on_leave(&mut f.sessions, &mut f.ledger, &f.events, "Steve", t0() + Duration::seconds(59))
            .unwrap();

        assert_eq!(outcome, AwardOutcome::TooShort { minutes: 0 });
        assert!(f.ledger.is_empty());
        assert!(!f.sessions.is_open("Steve"));
        assert!(level_ups(&f.events).is_empty());
    }

    #[test]
    fn test_leave_without_join() {
        let mut f = fixture();
        let outcome = f
            .engine
            .on_leave(&mut f.sessions, &mut f.ledger, &f.events, "Ghost", t0())
            .unwrap();

        assert_eq!(outcome, AwardOutcome::NoSession);
        assert!(f.ledger.is_empty());
        assert_eq!(f.events.queue_len(), 0);
    }

    #[test]
    fn test_award_without_level_up() {
        let mut f = fixture();
        f.engine.on_join(&mut f.sessions, &f.events, "Steve", t0());

        let outcome = f
            .engine
            .on_leave(&mut f.sessions, &mut f.ledger, &f.events, "Steve", t0() + Duration::minutes(3))
            .unwrap();

        assert!(matches!(
            outcome,
            AwardOutcome::Awarded {
                minutes: 3,
                gained_xp: 30,
                levels_gained: 0,
                ..
            }
        ));
        assert_eq!(f.ledger.query("Steve"), Some(PlayerRecord { xp: 30, level: 1 }));
        assert!(level_ups(&f.events).is_empty());
    }

    #[test]
    fn test_custom_rate() {
        let mut f = fixture();
        f.engine = ExperienceEngine::new(25);
        f.engine.on_join(&mut f.sessions, &f.events, "Steve", t0());

        let outcome = f
            .engine
            .on_leave(&mut f.sessions, &mut f.ledger, &f.events, "Steve", t0() + Duration::minutes(2))
            .unwrap();

        assert!(matches!(outcome, AwardOutcome::Awarded { gained_xp: 50, .. }));
    }

    #[test]
    fn test_failed_save_reopens_session() {
        let dir = tempfile::tempdir().unwrap();
        let mut ledger =
            PlayerLedger::load(dir.path().join("missing").join("levels.json"), LevelCurve::default()).unwrap();
        let mut sessions = SessionTracker::new();
        let events = EventBus::new();
        let engine = ExperienceEngine::default();

        engine.on_join(&mut sessions, &events, "Steve", t0());
        events.process_events();

        let result = engine.on_leave(&mut sessions, &mut ledger, &events, "Steve", t0() + Duration::minutes(5));

        assert!(matches!(result, Err(BotError::PersistenceFailure { .. })));
        assert_eq!(sessions.started_at("Steve"), Some(t0()));
        assert!(ledger.is_empty());
        assert_eq!(events.queue_len(), 0);
    }

    #[test]
    fn test_manual_award_announces_level_up() {
        let mut f = fixture();
        let result = f.engine.manual_award(&mut f.ledger, &f.events, "Steve", 500).unwrap();

        assert_eq!(result.levels_gained, 2);
        assert_eq!(
            level_ups(&f.events),
            vec![BotEvent::LevelUp {
                player: "Steve".into(),
                level: 3,
                minutes: None,
                gained_xp: 500,
            }]
        );
    }
}
