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

//! Waypoint Common Types and Protocols
//!
//! This crate defines shared types used by the Waypoint companion bot and the
//! relay adapters that connect it to a chat platform:
//! - Account roles used for command permission checks
//! - Player records and the player-name rule
//! - The line-delimited JSON relay protocol

pub mod account;
pub mod player;
pub mod relay;

pub use account::AccountRole;
pub use player::{PlayerRecord, is_valid_player_name};
pub use relay::{RelayInbound, RelayOutbound};
