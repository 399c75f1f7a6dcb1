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

//! Waypoint Server Library
//!
//! Playtime tracking, the experience ledger, identity links and the relay
//! listener that connects them to a chat platform.

pub mod award;
pub mod command;
pub mod config;
pub mod context;
pub mod error;
pub mod events;
pub mod ingestion;
pub mod ledger;
pub mod links;
pub mod listener;
pub mod progression;
pub mod session;
pub mod store;

// Re-export commonly used types
pub use award::{AwardOutcome, ExperienceEngine};
pub use command::{CommandResult, CommandSystem, Invoker};
pub use context::{BotChannels, BotContext, Standing};
pub use error::{BotError, BotResult};
pub use events::{BotEvent, EventBus};
pub use ingestion::{ConsoleParser, ConsoleSignal};
pub use ledger::{AwardResult, PlayerLedger};
pub use links::LinkTable;
pub use listener::RelayListener;
pub use progression::LevelCurve;
pub use session::SessionTracker;
