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

//! Player ledger
//!
//! Durable mapping from player name to experience and level. Records are
//! created by awards, never by deductions, and are never deleted. Levels only
//! go up: a deduction lowers experience but never the level.

use crate::error::{BotError, BotResult, StoreError};
use crate::progression::LevelCurve;
use crate::store::JsonTable;
use std::path::PathBuf;
use waypoint_common::PlayerRecord;

/// Outcome of an experience award
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AwardResult {
    /// The record after level-up resolution
    pub record: PlayerRecord,
    /// How many levels were gained by this award
    pub levels_gained: u32,
}

/// Player experience ledger backed by a JSON file
#[derive(Debug)]
pub struct PlayerLedger {
    table: JsonTable<PlayerRecord>,
    curve: LevelCurve,
}

impl PlayerLedger {
    /// Load the ledger file, starting empty if it does not exist
    pub fn load(path: impl Into<PathBuf>, curve: LevelCurve) -> Result<Self, StoreError> {
        Ok(Self {
            table: JsonTable::load(path)?,
            curve,
        })
    }

    pub fn curve(&self) -> &LevelCurve {
        &self.curve
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Look up a player without creating a record
    pub fn query(&self, name: &str) -> Option<PlayerRecord> {
        self.table.get(name).copied()
    }

    /// Return the player's record, inserting a fresh one if needed
    pub fn get_or_create(&mut self, name: &str) -> BotResult<PlayerRecord> {
        if let Some(record) = self.query(name) {
            return Ok(record);
        }
        self.table
            .update(name, |slot| *slot.get_or_insert_with(PlayerRecord::new))
    }

    /// Add experience and resolve any level-ups
    ///
    /// Each pass of the level-up loop subtracts `required_xp(level)`, which
    /// the curve guarantees is at least 1, so the loop ends after at most
    /// `xp` passes. Thresholds also grow with the level, so in practice a
    /// large award resolves in a handful of passes.
    pub fn award(&mut self, name: &str, amount: u64) -> BotResult<AwardResult> {
        let curve = self.curve;
        let result = self.table.update(name, |slot| {
            let record = slot.get_or_insert_with(PlayerRecord::new);
            let levels_gained = resolve_level_ups(&curve, record, amount);
            AwardResult {
                record: *record,
                levels_gained,
            }
        })?;

        tracing::debug!(
            "Awarded {} xp to {} (level {}, xp {}, +{} levels)",
            amount,
            name,
            result.record.level,
            result.record.xp,
            result.levels_gained
        );
        Ok(result)
    }

    /// Remove experience, clamping at zero
    ///
    /// Fails with [`BotError::NotFound`] for unknown players.
    pub fn deduct(&mut self, name: &str, amount: u64) -> BotResult<PlayerRecord> {
        if !self.table.contains_key(name) {
            return Err(BotError::NotFound(name.to_string()));
        }

        let record = self.table.update(name, |slot| {
            let record = slot.get_or_insert_with(PlayerRecord::new);
            record.xp = record.xp.saturating_sub(amount);
            *record
        })?;

        tracing::debug!("Deducted {} xp from {} (xp {})", amount, name, record.xp);
        Ok(record)
    }
}

/// Add `amount` to the record and convert surplus experience into levels
fn resolve_level_ups(curve: &LevelCurve, record: &mut PlayerRecord, amount: u64) -> u32 {
    record.xp = record.xp.saturating_add(amount);

    let mut levels_gained = 0;
    loop {
        let required = curve.required_xp(record.level);
        if record.xp < required || record.level == u32::MAX {
            break;
        }
        record.xp -= required;
        record.level += 1;
        levels_gained += 1;
    }
    levels_gained
}
