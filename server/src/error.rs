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

//! Error types for bot operations

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading or rewriting a durable table file.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The table contents could not be encoded or decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that can occur during ledger, link and session operations.
#[derive(Debug, Error)]
pub enum BotError {
    /// The player name does not satisfy the naming rule.
    #[error("Invalid player name: {0}")]
    InvalidFormat(String),

    /// The player name is already linked to an account.
    #[error("Player name already linked: {0}")]
    AlreadyLinked(String),

    /// No record or link exists for the given key.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A leave arrived without a matching join.
    #[error("No open session for player: {0}")]
    NoSession(String),

    /// The durable write failed; in-memory state was left unchanged.
    #[error("Failed to persist {path}: {source}")]
    PersistenceFailure {
        path: PathBuf,
        #[source]
        source: StoreError,
    },
}

/// Result type for bot operations.
pub type BotResult<T> = Result<T, BotError>;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to open config file: {0}")]
    Open(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Errors raised while building the bot context at startup.
#[derive(Debug, Error)]
pub enum ContextError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to load table: {0}")]
    Store(#[from] StoreError),
}

/// Errors that end a relay connection.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Relay connection I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Relay frame could not be read: {0}")]
    Codec(#[from] tokio_util::codec::LinesCodecError),

    #[error("Relay frame could not be encoded: {0}")]
    Json(#[from] serde_json::Error),
}
