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

//! Relay-to-Bot Communication Protocol
//!
//! A relay is the adapter process holding the chat platform connection. It
//! forwards chat messages to the bot and posts whatever the bot sends back.
//! Frames are JSON objects, one per line, tagged by a `type` field.

use crate::account::AccountRole;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Chat channel identifier (platform snowflake as string)
pub type ChannelId = String;

/// Chat account identifier (platform snowflake as string)
pub type AccountId = String;

/// Protocol revision announced in the welcome frame
pub const RELAY_PROTOCOL_VERSION: u32 = 1;

// ============================================================================
// Relay -> Bot
// ============================================================================

/// Frames sent by the relay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RelayInbound {
    /// Handshake, must be the first frame on a connection
    Hello { auth_key: String },

    /// A chat message observed by the relay
    Message(ChatMessage),
}

/// A single chat message as seen on the platform
///
/// Console bots usually post embeds; the relay flattens the embed
/// description into `content`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Channel the message was posted in
    pub channel_id: ChannelId,

    /// Author account
    pub account_id: AccountId,

    /// Author display name, used in replies
    pub display_name: String,

    /// Author role as resolved by the relay
    #[serde(default)]
    pub role: AccountRole,

    /// Whether the author is a bot account
    #[serde(default)]
    pub from_bot: bool,

    /// Message text
    pub content: String,

    /// When the platform received the message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<DateTime<Utc>>,
}

// ============================================================================
// Bot -> Relay
// ============================================================================

/// Frames sent by the bot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RelayOutbound {
    /// Handshake accepted
    Welcome { version: u32 },

    /// Response to a command, posted where the command was issued
    Reply { channel_id: ChannelId, text: String },

    /// Unsolicited notice, such as a level-up
    Announce { channel_id: ChannelId, text: String },

    /// Malformed frame or rejected handshake
    Error { message: String },
}

impl RelayOutbound {
    pub fn reply(channel_id: impl Into<ChannelId>, text: impl Into<String>) -> Self {
        RelayOutbound::Reply {
            channel_id: channel_id.into(),
            text: text.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        RelayOutbound::Error {
            message: message.into(),
        }
    }
}
