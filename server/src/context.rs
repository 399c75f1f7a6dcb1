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

use crate::award::{AwardOutcome, ExperienceEngine};
use crate::config::Configuration;
use crate::error::{BotResult, ContextError};
use crate::events::EventBus;
use crate::ingestion::{ConsoleParser, ConsoleSignal};
use crate::ledger::{AwardResult, PlayerLedger};
use crate::links::LinkTable;
use crate::session::SessionTracker;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use waypoint_common::PlayerRecord;
use waypoint_common::relay::ChannelId;

/// Bot context owning every table and the shared services around them
///
/// This is the single application state of the bot. The listener and every
/// command handler receive it as `Arc<BotContext>`; there are no globals.
///
/// # Locking
///
/// Each table sits behind its own lock and every read-modify-write holds the
/// table's write lock for its whole duration, file rewrite included. When
/// both the session tracker and the ledger are needed they are locked in
/// that order.
pub struct BotContext {
    /// Experience ledger
    ledger: RwLock<PlayerLedger>,

    /// Account-to-player links
    links: RwLock<LinkTable>,

    /// Open play sessions
    sessions: RwLock<SessionTracker>,

    /// Session-to-experience conversion
    engine: ExperienceEngine,

    /// Console notice parser
    parser: ConsoleParser,

    /// Outgoing bot events
    events: EventBus,

    /// Where console notices are read from and level-ups are posted
    channels: BotChannels,

    /// Command prefix
    prefix: String,
}

/// Channel routing for the bot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BotChannels {
    pub console: ChannelId,
    pub level: ChannelId,
}

/// Player standing as reported by the level query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Standing {
    /// The account has not linked a player name
    Unlinked,
    /// Linked, but the player has never earned experience
    NoRecord { player: String },
    /// Linked player with a ledger record
    Ranked {
        player: String,
        record: PlayerRecord,
        next_level_xp: u64,
    },
}

impl BotContext {
    /// Create a context from already loaded tables
    pub fn new(
        ledger: PlayerLedger,
        links: LinkTable,
        engine: ExperienceEngine,
        parser: ConsoleParser,
        channels: BotChannels,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            ledger: RwLock::new(ledger),
            links: RwLock::new(links),
            sessions: RwLock::new(SessionTracker::new()),
            engine,
            parser,
            events: EventBus::new(),
            channels,
            prefix: prefix.into(),
        }
    }

    /// Build the context from configuration, loading both table files
    pub fn load(config: &Configuration) -> Result<Self, ContextError> {
        let curve = config.progression.curve()?;
        let parser = config.console.parser()?;

        tracing::info!("Loading ledger from {}", config.storage.ledger_file());
        let ledger = PlayerLedger::load(config.storage.ledger_file(), curve)?;
        tracing::info!("Loaded {} player records", ledger.len());

        tracing::info!("Loading links from {}", config.storage.links_file());
        let links = LinkTable::load(config.storage.links_file())?;
        tracing::info!("Loaded {} identity links", links.len());

        let channels = BotChannels {
            console: config.channels.console.as_str().to_string(),
            level: config.channels.level.as_str().to_string(),
        };

        Ok(Self::new(
            ledger,
            links,
            config.progression.engine(),
            parser,
            channels,
            config.commands.prefix.clone(),
        ))
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn channels(&self) -> &BotChannels {
        &self.channels
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn engine(&self) -> &ExperienceEngine {
        &self.engine
    }

    // ------------------------------------------------------------------
    // Session events
    // ------------------------------------------------------------------

    /// Parse a console notice and apply it
    ///
    /// Leaves without a join and sub-minute sessions are dropped silently.
    pub async fn ingest(&self, text: &str, now: DateTime<Utc>) -> BotResult<ConsoleSignal> {
        let signal = self.parser.parse(text);
        match &signal {
            ConsoleSignal::Join(player) => self.player_joined(player, now).await,
            ConsoleSignal::Leave(player) => {
                self.player_left(player, now).await?;
            }
            ConsoleSignal::Ignored => {}
        }
        Ok(signal)
    }

    pub async fn player_joined(&self, player: &str, now: DateTime<Utc>) {
        let mut sessions = self.sessions.write().await;
        self.engine.on_join(&mut sessions, &self.events, player, now);
        tracing::info!("{} joined the server", player);
    }

    pub async fn player_left(&self, player: &str, now: DateTime<Utc>) -> BotResult<AwardOutcome> {
        let mut sessions = self.sessions.write().await;
        let mut ledger = self.ledger.write().await;
        self.engine
            .on_leave(&mut sessions, &mut ledger, &self.events, player, now)
    }

    pub async fn open_sessions(&self) -> usize {
        self.sessions.read().await.open_count()
    }

    // ------------------------------------------------------------------
    // Ledger
    // ------------------------------------------------------------------

    pub async fn award(&self, player: &str, amount: u64) -> BotResult<AwardResult> {
        let mut ledger = self.ledger.write().await;
        self.engine
            .manual_award(&mut ledger, &self.events, player, amount)
    }

    pub async fn deduct(&self, player: &str, amount: u64) -> BotResult<PlayerRecord> {
        self.ledger.write().await.deduct(player, amount)
    }

    pub async fn query(&self, player: &str) -> Option<PlayerRecord> {
        self.ledger.read().await.query(player)
    }

    /// Level standing of whichever player the account linked
    pub async fn standing(&self, account_id: &str) -> Standing {
        let Some(player) = self.resolve(account_id).await else {
            return Standing::Unlinked;
        };

        let ledger = self.ledger.read().await;
        match ledger.query(&player) {
            Some(record) => Standing::Ranked {
                next_level_xp: ledger.curve().required_xp(record.level),
                player,
                record,
            },
            None => Standing::NoRecord { player },
        }
    }

    // ------------------------------------------------------------------
    // Identity links
    // ------------------------------------------------------------------

    pub async fn link(&self, account_id: &str, player: &str) -> BotResult<()> {
        self.links.write().await.link(account_id, player)
    }

    pub async fn unlink(&self, account_id: &str) -> BotResult<String> {
        self.links.write().await.unlink(account_id)
    }

    pub async fn sever(&self, player: &str) -> BotResult<String> {
        self.links.write().await.sever(player)
    }

    pub async fn resolve(&self, account_id: &str) -> Option<String> {
        self.links.read().await.resolve(account_id).map(str::to_string)
    }
}
