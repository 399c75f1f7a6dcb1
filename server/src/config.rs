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

use crate::award::{DEFAULT_XP_PER_MINUTE, ExperienceEngine};
use crate::error::ConfigError;
use crate::ingestion::{ConsoleParser, DEFAULT_JOIN_PATTERN, DEFAULT_LEAVE_PATTERN};
use crate::progression::{DEFAULT_BASE_XP, DEFAULT_EXPONENT, LevelCurve};
use clap::Parser;
use serde::{Deserialize, Serialize};
use serde_env_field::EnvField;
use std::net::{AddrParseError, Ipv4Addr, SocketAddr, SocketAddrV4};
use std::str::FromStr;

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Arguments {
    #[arg(
        short = 'c',
        long = "config",
        help = "Path to configuration file",
        default_value = "config.yaml"
    )]
    pub config_file: String,

    #[arg(
        short = 'e',
        long = "env",
        help = "Path to environment file",
        default_value = ".env"
    )]
    pub env_file: Option<String>,
}

impl Default for Arguments {
    fn default() -> Self {
        Self {
            config_file: "config.yaml".to_string(),
            env_file: Some(".env".to_string()),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(default)]
    pub listener: RelayListenerConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub progression: ProgressionConfig,

    #[serde(default)]
    pub channels: ChannelConfig,

    #[serde(default)]
    pub commands: CommandConfig,

    #[serde(default)]
    pub console: ConsoleConfig,
}

impl Configuration {
    pub fn load(path: &str) -> Result<Configuration, ConfigError> {
        tracing::debug!("Loading configuration from file: {}", path);
        let file = std::fs::File::open(path)?;
        let conf: Configuration = serde_yaml::from_reader(file)?;
        conf.validate()?;
        Ok(conf)
    }

    /// Check every derived value once, before anything is started
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.progression.curve()?;
        self.console.parser()?;
        if self.listener.auth_key.as_str().trim().is_empty() {
            return Err(ConfigError::Invalid("listener.auth_key must be set".to_string()));
        }
        if self.commands.prefix.is_empty() {
            return Err(ConfigError::Invalid("command prefix must not be empty".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RelayListenerConfig {
    #[serde(default)]
    pub addr: EnvField<RelayListenerBinding>,

    /// Shared key a relay must present in its hello frame
    #[serde(default)]
    pub auth_key: EnvField<RelayAuthKey>,
}

impl Default for RelayListenerConfig {
    fn default() -> Self {
        Self {
            addr: Default::default(),
            auth_key: Default::default(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RelayListenerBinding(SocketAddr);

impl RelayListenerBinding {
    pub fn to_addr(&self) -> SocketAddr {
        self.0
    }
}

impl FromStr for RelayListenerBinding {
    type Err = AddrParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        tracing::debug!("Parsing relay listener binding from string: {}", s);
        Ok(Self(SocketAddr::from_str(s)?))
    }
}

impl Default for RelayListenerBinding {
    fn default() -> Self {
        Self(SocketAddr::V4(SocketAddrV4::new(
            Ipv4Addr::new(127, 0, 0, 1),
            6010,
        )))
    }
}

impl std::fmt::Display for RelayListenerBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Shared relay key, empty until configured
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct RelayAuthKey(String);

impl RelayAuthKey {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for RelayAuthKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl FromStr for RelayAuthKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}


impl std::fmt::Display for RelayAuthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Locations of the two table files
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub ledger_file: Option<EnvField<String>>,

    #[serde(default)]
    pub links_file: Option<EnvField<String>>,
}

impl StorageConfig {
    /// Ledger file path, `levels.json` unless configured
    pub fn ledger_file(&self) -> &str {
        self.ledger_file
            .as_ref()
            .map(|path| path.as_str())
            .unwrap_or("levels.json")
    }

    /// Link table file path, `nicknames.json` unless configured
    pub fn links_file(&self) -> &str {
        self.links_file
            .as_ref()
            .map(|path| path.as_str())
            .unwrap_or("nicknames.json")
    }
}

/// Experience rate and leveling curve
#[derive(Debug, Serialize, Deserialize)]
pub struct ProgressionConfig {
    #[serde(default = "default_xp_per_minute")]
    pub xp_per_minute: u64,

    #[serde(default = "default_base_level_up_xp")]
    pub base_level_up_xp: u64,

    #[serde(default = "default_exponent")]
    pub exponent: f64,
}

fn default_xp_per_minute() -> u64 {
    DEFAULT_XP_PER_MINUTE
}

fn default_base_level_up_xp() -> u64 {
    DEFAULT_BASE_XP
}

fn default_exponent() -> f64 {
    DEFAULT_EXPONENT
}

impl ProgressionConfig {
    pub fn curve(&self) -> Result<LevelCurve, ConfigError> {
        LevelCurve::new(self.base_level_up_xp, self.exponent)
    }

    pub fn engine(&self) -> ExperienceEngine {
        ExperienceEngine::new(self.xp_per_minute)
    }
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            xp_per_minute: default_xp_per_minute(),
            base_level_up_xp: default_base_level_up_xp(),
            exponent: default_exponent(),
        }
    }
}

/// Chat channels the bot reads from and announces to
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Channel the game server's console plugin posts join/leave notices in
    #[serde(default)]
    pub console: EnvField<String>,

    /// Channel level-up announcements are posted to
    #[serde(default)]
    pub level: EnvField<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CommandConfig {
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

fn default_prefix() -> String {
    String::from("!")
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
        }
    }
}

/// Console notice patterns
///
/// Plain strings rather than environment fields, since regular expressions
/// use `$` anchors.
#[derive(Debug, Serialize, Deserialize)]
pub struct ConsoleConfig {
    #[serde(default = "default_join_pattern")]
    pub join_pattern: String,

    #[serde(default = "default_leave_pattern")]
    pub leave_pattern: String,
}

fn default_join_pattern() -> String {
    String::from(DEFAULT_JOIN_PATTERN)
}

fn default_leave_pattern() -> String {
    String::from(DEFAULT_LEAVE_PATTERN)
}

impl ConsoleConfig {
    pub fn parser(&self) -> Result<ConsoleParser, ConfigError> {
        ConsoleParser::new(&self.join_pattern, &self.leave_pattern)
            .map_err(|e| ConfigError::Invalid(format!("console pattern: {}", e)))
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            join_pattern: default_join_pattern(),
            leave_pattern: default_leave_pattern(),
        }
    }
}
