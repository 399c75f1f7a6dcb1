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

//! Player data types

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Player names accepted by the game server: 3 to 16 ASCII letters, digits
/// or underscores.
static PLAYER_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_]{3,16}$").expect("player name pattern is valid")
});

/// Check a declared player name against the game server's naming rule
pub fn is_valid_player_name(name: &str) -> bool {
    PLAYER_NAME.is_match(name)
}

/// Experience and level of a single player
///
/// Stored as one entry of the ledger file, keyed by the case-sensitive
/// player name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    /// Experience accumulated toward the next level
    pub xp: u64,
    /// Current level, starting at 1
    pub level: u32,
}

impl PlayerRecord {
    /// A fresh record at level 1 with no experience
    pub fn new() -> Self {
        Self { xp: 0, level: 1 }
    }
}

impl Default for PlayerRecord {
    fn default() -> Self {
        Self::new()
    }
}
