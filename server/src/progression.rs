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

//! Leveling curve
//!
//! Maps a level to the experience needed to advance past it:
//!
//! `required_xp(level) = floor(base * level ^ exponent)`
//!
//! With the default base of 100 and exponent of 1.7 the first thresholds are
//! 100, 324, 647, 1055 and 1542.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Default experience needed to leave level 1
pub const DEFAULT_BASE_XP: u64 = 100;

/// Default growth exponent
pub const DEFAULT_EXPONENT: f64 = 1.7;

/// Experience threshold curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelCurve {
    base: u64,
    exponent: f64,
}

impl LevelCurve {
    /// Create a curve, rejecting parameters that would allow a zero threshold
    ///
    /// A base of at least 1 keeps every threshold at or above 1, which bounds
    /// the level-up loop by the amount of experience being resolved.
    pub fn new(base: u64, exponent: f64) -> Result<Self, ConfigError> {
        if base == 0 {
            return Err(ConfigError::Invalid(
                "base level-up xp must be at least 1".to_string(),
            ));
        }
        if !exponent.is_finite() || exponent <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "level exponent must be a positive number, got {}",
                exponent
            )));
        }
        Ok(Self { base, exponent })
    }

    /// Experience required to advance from `level` to `level + 1`
    ///
    /// Level 0 is treated as level 1. The float-to-integer cast truncates
    /// toward zero and saturates at `u64::MAX`.
    pub fn required_xp(&self, level: u32) -> u64 {
        let level = f64::from(level.max(1));
        (self.base as f64 * level.powf(self.exponent)) as u64
    }
}

impl Default for LevelCurve {
    fn default() -> Self {
        Self {
            base: DEFAULT_BASE_XP,
            exponent: DEFAULT_EXPONENT,
        }
    }
}
