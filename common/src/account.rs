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

//! Account data types

use serde::{Deserialize, Serialize};

/// Account role for access control
///
/// The relay resolves the role from the chat platform's own permission
/// system before forwarding a message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountRole {
    #[default]
    Member,
    Admin,
}

impl AccountRole {
    /// Check if this role has at least the specified role level
    pub fn has_permission(&self, required: AccountRole) -> bool {
        self.level() >= required.level()
    }

    /// Get numeric level for role comparison
    fn level(&self) -> u8 {
        match self {
            AccountRole::Member => 0,
            AccountRole::Admin => 1,
        }
    }
}

impl std::fmt::Display for AccountRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountRole::Member => write!(f, "Member"),
            AccountRole::Admin => write!(f, "Admin"),
        }
    }
}
