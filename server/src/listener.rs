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

//! Relay listener accepting chat gateway connections
//!
//! A relay is whatever process sits on the chat platform. It connects over
//! TCP, authenticates with the shared key and then streams chat messages in
//! as line-delimited JSON. Replies and level-up announcements flow back the
//! same way.

use crate::command::CommandSystem;
use crate::context::BotContext;
use crate::error::RelayError;
use chrono::Utc;
use futures::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio_util::codec::{Framed, LinesCodec};
use uuid::Uuid;
use waypoint_common::relay::{ChatMessage, RELAY_PROTOCOL_VERSION, RelayInbound, RelayOutbound};

/// Longest accepted frame, in bytes
pub const MAX_FRAME_LENGTH: usize = 64 * 1024;

/// Announcements buffered per connection before a slow relay starts lagging
const ANNOUNCEMENT_CAPACITY: usize = 256;

type RelayStream = Framed<TcpStream, LinesCodec>;

/// Relay listener
///
/// Owns the command system and fans level-up announcements out to every
/// authenticated connection.
pub struct RelayListener {
    context: Arc<BotContext>,
    commands: CommandSystem,
    auth_key: String,
    announcements: broadcast::Sender<RelayOutbound>,
}

impl RelayListener {
    /// Create a listener and hook announcements into the context's event bus
    pub fn new(context: Arc<BotContext>, auth_key: impl Into<String>) -> Self {
        let (announcements, _) = broadcast::channel(ANNOUNCEMENT_CAPACITY);

        let sender = announcements.clone();
        let level_channel = context.channels().level.clone();
        context.events().subscribe(move |event| {
            if let Some(text) = event.announcement() {
                // No receivers just means no relay is connected right now
                let _ = sender.send(RelayOutbound::Announce {
                    channel_id: level_channel.clone(),
                    text,
                });
            }
        });

        Self {
            context,
            commands: CommandSystem::new(),
            auth_key: auth_key.into(),
            announcements,
        }
    }

    pub fn context(&self) -> &Arc<BotContext> {
        &self.context
    }

    /// Subscribe to outgoing announcements
    pub fn announcements(&self) -> broadcast::Receiver<RelayOutbound> {
        self.announcements.subscribe()
    }

    /// Accept relay connections until the listener fails
    pub async fn serve(self: Arc<Self>, listener: TcpListener) -> std::io::Result<()> {
        loop {
            let (stream, peer) = listener.accept().await?;
            let relay = Arc::clone(&self);
            tokio::spawn(async move {
                if let Err(e) = relay.handle_connection(stream, peer).await {
                    tracing::warn!(peer = %peer, err = %e, "relay connection ended with error");
                }
            });
        }
    }

    /// Run one relay connection to completion
    pub async fn handle_connection(&self, stream: TcpStream, peer: SocketAddr) -> Result<(), RelayError> {
        let connection_id = Uuid::new_v4();
        let mut framed = Framed::new(stream, LinesCodec::new_with_max_length(MAX_FRAME_LENGTH));

        let Some(first) = framed.next().await else {
            tracing::debug!("Relay {} from {} closed before authenticating", connection_id, peer);
            return Ok(());
        };

        match serde_json::from_str::<RelayInbound>(&first?) {
            Ok(RelayInbound::Hello { auth_key }) if auth_key == self.auth_key => {}
            _ => {
                tracing::warn!("Relay {} from {} failed authentication", connection_id, peer);
                send(&mut framed, &RelayOutbound::error("Authentication failed")).await?;
                return Ok(());
            }
        }

        // Subscribe before the welcome so nothing published afterwards is missed
        let mut announcements = self.announcements.subscribe();
        send(
            &mut framed,
            &RelayOutbound::Welcome {
                version: RELAY_PROTOCOL_VERSION,
            },
        )
        .await?;
        tracing::info!("Relay {} authenticated from {}", connection_id, peer);

        loop {
            tokio::select! {
                frame = framed.next() => {
                    let Some(frame) = frame else {
                        break;
                    };
                    match serde_json::from_str::<RelayInbound>(&frame?) {
                        Ok(RelayInbound::Message(message)) => {
                            if let Some(reply) = self.handle_message(message).await {
                                send(&mut framed, &reply).await?;
                            }
                        }
                        Ok(RelayInbound::Hello { .. }) => {
                            send(&mut framed, &RelayOutbound::error("Already authenticated")).await?;
                        }
                        Err(e) => {
                            tracing::debug!("Malformed frame from relay {}: {}", connection_id, e);
                            send(&mut framed, &RelayOutbound::error(format!("Malformed frame: {}", e))).await?;
                        }
                    }
                }
                announcement = announcements.recv() => {
                    match announcement {
                        Ok(frame) => send(&mut framed, &frame).await?,
                        Err(RecvError::Lagged(skipped)) => {
                            tracing::warn!("Relay {} dropped {} announcements", connection_id, skipped);
                        }
                        Err(RecvError::Closed) => break,
                    }
                }
            }
        }

        tracing::info!("Relay {} from {} disconnected", connection_id, peer);
        Ok(())
    }

    /// Route one chat message
    ///
    /// Bot-authored messages in the console channel are ingested as console
    /// notices. Messages from people are checked for commands. Any events
    /// raised along the way are delivered before returning.
    pub async fn handle_message(&self, message: ChatMessage) -> Option<RelayOutbound> {
        let reply = if message.from_bot {
            if message.channel_id == self.context.channels().console {
                let now = message.sent_at.unwrap_or_else(Utc::now);
                if let Err(e) = self.context.ingest(&message.content, now).await {
                    tracing::error!("Console notice could not be applied: {}", e);
                }
            }
            None
        } else {
            self.commands
                .handle_message(Arc::clone(&self.context), &message)
                .await
                .map(|result| RelayOutbound::reply(message.channel_id.clone(), result.text()))
        };

        self.context.events().process_events();
        reply
    }
}

async fn send(framed: &mut RelayStream, frame: &RelayOutbound) -> Result<(), RelayError> {
    framed.send(serde_json::to_string(frame)?).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::test_utils::test_context;
    use chrono::Duration;
    use waypoint_common::AccountRole;

    fn message(channel_id: &str, from_bot: bool, content: &str) -> ChatMessage {
        ChatMessage {
            channel_id: channel_id.into(),
            account_id: "1001".into(),
            display_name: "Steve".into(),
            role: AccountRole::Member,
            from_bot,
            content: content.into(),
            sent_at: None,
        }
    }

    #[tokio::test]
    async fn test_command_reply_goes_to_source_channel() {
        let (_dir, context) = test_context();
        let relay = RelayListener::new(context, "secret");

        let reply = relay.handle_message(message("555", false, "!link Steve")).await;
        assert_eq!(
            reply,
            Some(RelayOutbound::reply(
                "555",
                "Steve, your Minecraft name is now registered as `Steve`."
            ))
        );
    }

    #[tokio::test]
    async fn test_plain_chat_is_ignored() {
        let (_dir, context) = test_context();
        let relay = RelayListener::new(context, "secret");

        assert_eq!(relay.handle_message(message("555", false, "hello there")).await, None);
    }

    #[tokio::test]
    async fn test_console_notice_ingested_only_from_bots() {
        let (_dir, context) = test_context();
        let relay = RelayListener::new(context.clone(), "secret");
        let joined = "Steve 님이 서버에 접속하셨습니다.";

        relay.handle_message(message("100", false, joined)).await;
        assert_eq!(context.open_sessions().await, 0);

        relay.handle_message(message("555", true, joined)).await;
        assert_eq!(context.open_sessions().await, 0);

        relay.handle_message(message("100", true, joined)).await;
        assert_eq!(context.open_sessions().await, 1);
    }

    #[tokio::test]
    async fn test_level_up_is_announced() {
        let (_dir, context) = test_context();
        let relay = RelayListener::new(context, "secret");
        let mut announcements = relay.announcements();

        let t0 = Utc::now() - Duration::minutes(30);
        let mut joined = message("100", true, "Alex 님이 서버에 접속하셨습니다.");
        joined.sent_at = Some(t0);
        relay.handle_message(joined).await;

        let mut left = message("100", true, "Alex 님이 서버에서 나가셨습니다.");
        left.sent_at = Some(t0 + Duration::seconds(650));
        relay.handle_message(left).await;

        assert_eq!(
            announcements.try_recv().unwrap(),
            RelayOutbound::Announce {
                channel_id: "200".into(),
                text: "Alex reached level 2! (played 10 minutes, gained 100 XP)".into(),
            }
        );
        assert!(announcements.try_recv().is_err());
    }
}
