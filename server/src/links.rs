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

//! Identity link table
//!
//! Durable mapping from chat account id to the player name that account
//! declared. A player name may be linked to at most one account.

use crate::error::{BotError, BotResult, StoreError};
use crate::store::JsonTable;
use std::path::PathBuf;
use waypoint_common::is_valid_player_name;

/// Account-to-player link table backed by a JSON file
#[derive(Debug)]
pub struct LinkTable {
    table: JsonTable<String>,
}

impl LinkTable {
    /// Load the link file, starting empty if it does not exist
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        Ok(Self {
            table: JsonTable::load(path)?,
        })
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Link an account to a player name
    ///
    /// The name is rejected if it breaks the naming rule or is already linked
    /// to any account, including the caller's own. An account that already
    /// holds a different name is moved to the new one.
    pub fn link(&mut self, account_id: &str, player_name: &str) -> BotResult<()> {
        if !is_valid_player_name(player_name) {
            return Err(BotError::InvalidFormat(player_name.to_string()));
        }
        if self.account_for(player_name).is_some() {
            return Err(BotError::AlreadyLinked(player_name.to_string()));
        }

        self.table
            .update(account_id, |slot| *slot = Some(player_name.to_string()))?;
        tracing::info!("Linked account {} to player {}", account_id, player_name);
        Ok(())
    }

    /// Remove the caller's own link, returning the unlinked player name
    pub fn unlink(&mut self, account_id: &str) -> BotResult<String> {
        if !self.table.contains_key(account_id) {
            return Err(BotError::NotFound(account_id.to_string()));
        }

        let removed = self.table.update(account_id, Option::take)?;
        let removed = removed.ok_or_else(|| BotError::NotFound(account_id.to_string()))?;
        tracing::info!("Unlinked account {} from player {}", account_id, removed);
        Ok(removed)
    }

    /// Remove whichever link points at `player_name`, returning its account id
    pub fn sever(&mut self, player_name: &str) -> BotResult<String> {
        let account_id = self
            .account_for(player_name)
            .ok_or_else(|| BotError::NotFound(player_name.to_string()))?;

        self.table.update(&account_id, |slot| *slot = None)?;
        tracing::info!("Severed link between account {} and player {}", account_id, player_name);
        Ok(account_id)
    }

    /// Player name linked to an account, if any
    pub fn resolve(&self, account_id: &str) -> Option<&str> {
        self.table.get(account_id).map(String::as_str)
    }

    /// Reverse lookup by linear scan
    pub fn account_for(&self, player_name: &str) -> Option<String> {
        self.table
            .iter()
            .find(|(_, linked)| linked.as_str() == player_name)
            .map(|(account_id, _)| account_id.clone())
    }
}
