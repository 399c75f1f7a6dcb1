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

//! Command system for processing member and admin chat commands

mod admin;
mod help;
mod level;
mod link;
mod session;

use crate::context::BotContext;
use crate::error::BotError;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use waypoint_common::AccountRole;
use waypoint_common::relay::{AccountId, ChannelId, ChatMessage};

pub type CommandFn = Box<
    dyn Fn(
            Arc<BotContext>,
            Invoker,
            String,
            Vec<String>,
        )
            -> std::pin::Pin<Box<dyn std::future::Future<Output = CommandResult> + Send + 'static>>
        + Send
        + Sync,
>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    Success(String),
    Failure(String),
    Invalid(String),
}

impl CommandResult {
    /// Text to post back to the invoker
    pub fn text(&self) -> &str {
        match self {
            CommandResult::Success(text)
            | CommandResult::Failure(text)
            | CommandResult::Invalid(text) => text,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, CommandResult::Success(_))
    }
}

/// Who issued a command, and from where
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invoker {
    pub account_id: AccountId,
    pub display_name: String,
    pub role: AccountRole,
    pub channel_id: ChannelId,
    pub sent_at: Option<DateTime<Utc>>,
}

impl Invoker {
    pub fn new(account_id: impl Into<AccountId>, display_name: impl Into<String>, role: AccountRole) -> Self {
        Self {
            account_id: account_id.into(),
            display_name: display_name.into(),
            role,
            channel_id: ChannelId::new(),
            sent_at: None,
        }
    }
}

impl From<&ChatMessage> for Invoker {
    fn from(message: &ChatMessage) -> Self {
        Self {
            account_id: message.account_id.clone(),
            display_name: message.display_name.clone(),
            role: message.role,
            channel_id: message.channel_id.clone(),
            sent_at: message.sent_at,
        }
    }
}

struct CommandMetadata {
    handler: CommandFn,
    help_text: String,
    aliases: Vec<String>,
    required_role: Option<AccountRole>,
}

pub struct CommandSystem {
    commands: HashMap<String, CommandMetadata>,
    aliases: HashMap<String, String>,
}

impl CommandSystem {
    /// Create a new command system with the default commands registered
    pub fn new() -> Self {
        let mut system = Self {
            commands: HashMap::new(),
            aliases: HashMap::new(),
        };

        system.register_default_commands();
        system
    }

    fn register_default_commands(&mut self) {
        self.register_command(
            "link".into(),
            vec![],
            "link <name> - Register your Minecraft name".into(),
            link::link_command,
        );
        self.register_command(
            "unlink".into(),
            vec![],
            "unlink - Remove your registered Minecraft name".into(),
            link::unlink_command,
        );
        self.register_command(
            "level".into(),
            vec!["레벨".into(), "lvl".into()],
            "level - Show your level and experience".into(),
            level::level_command,
        );
        self.register_command_with_role(
            "sever".into(),
            vec![],
            "sever <name> - Force-remove the link for a Minecraft name".into(),
            Some(AccountRole::Admin),
            link::sever_command,
        );
        self.register_command_with_role(
            "exadd".into(),
            vec![],
            "exadd <name> <amount> - Grant experience to a player".into(),
            Some(AccountRole::Admin),
            admin::exadd_command,
        );
        self.register_command_with_role(
            "exdel".into(),
            vec![],
            "exdel <name> <amount> - Remove experience from a player".into(),
            Some(AccountRole::Admin),
            admin::exdel_command,
        );
        self.register_command_with_role(
            "ping".into(),
            vec![],
            "ping - Check that the bot is responding".into(),
            Some(AccountRole::Admin),
            admin::ping_command,
        );
        self.register_command_with_role(
            "testin".into(),
            vec![],
            "testin <name> - Simulate a player joining".into(),
            Some(AccountRole::Admin),
            session::testin_command,
        );
        self.register_command_with_role(
            "testout".into(),
            vec![],
            "testout <name> - Simulate a player leaving".into(),
            Some(AccountRole::Admin),
            session::testout_command,
        );
    }

    /// Register a command with aliases and help text
    pub fn register_command<F, Fut>(
        &mut self,
        name: String,
        aliases: Vec<String>,
        help_text: String,
        handler: F,
    ) where
        F: Fn(Arc<BotContext>, Invoker, String, Vec<String>) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = CommandResult> + Send + 'static,
    {
        self.register_command_with_role(name, aliases, help_text, None, handler)
    }

    /// Register a command with role requirement
    pub fn register_command_with_role<F, Fut>(
        &mut self,
        name: String,
        aliases: Vec<String>,
        help_text: String,
        required_role: Option<AccountRole>,
        handler: F,
    ) where
        F: Fn(Arc<BotContext>, Invoker, String, Vec<String>) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = CommandResult> + Send + 'static,
    {
        let handler = Box::new(
            move |ctx: Arc<BotContext>, invoker: Invoker, cmd: String, args: Vec<String>| {
                Box::pin(handler(ctx, invoker, cmd, args))
                    as std::pin::Pin<
                        Box<dyn std::future::Future<Output = CommandResult> + Send + 'static>,
                    >
            },
        );
        let metadata = CommandMetadata {
            handler,
            help_text,
            aliases: aliases.clone(),
            required_role,
        };
        self.commands.insert(name.clone(), metadata);
        for alias in aliases {
            self.aliases.insert(alias, name.clone());
        }
    }

    /// Split a chat message into command name and arguments
    ///
    /// Returns `None` when the message does not start with the prefix.
    pub fn parse(prefix: &str, content: &str) -> Option<(String, Vec<String>)> {
        let body = content.trim_start().strip_prefix(prefix)?;
        let mut words = body.split_whitespace();
        let command = words.next()?.to_lowercase();
        let args = words.map(str::to_string).collect();
        Some((command, args))
    }

    /// Generate help text from registered commands, filtered by role
    pub fn generate_help(&self, prefix: &str, role: AccountRole) -> String {
        let mut member_commands = Vec::new();
        let mut admin_commands = Vec::new();

        for metadata in self.commands.values() {
            match metadata.required_role {
                Some(required) if !role.has_permission(required) => continue,
                Some(AccountRole::Admin) => admin_commands.push(&metadata.help_text),
                _ => member_commands.push(&metadata.help_text),
            }
        }

        member_commands.sort();
        admin_commands.sort();

        let mut help = String::from("Available Commands:\n");
        for cmd in member_commands {
            help.push_str(&format!("  {}{}\n", prefix, cmd));
        }

        if !admin_commands.is_empty() {
            help.push_str("\nAdmin Commands:\n");
            for cmd in admin_commands {
                help.push_str(&format!("  {}{}\n", prefix, cmd));
            }
        }

        help
    }

    /// Handle a chat message, if it is a command
    pub async fn handle_message(
        &self,
        context: Arc<BotContext>,
        message: &ChatMessage,
    ) -> Option<CommandResult> {
        let (command, args) = Self::parse(context.prefix(), &message.content)?;
        Some(self.execute(context, Invoker::from(message), &command, &args).await)
    }

    /// Execute a command
    pub async fn execute(
        &self,
        context: Arc<BotContext>,
        invoker: Invoker,
        command: &str,
        args: &[String],
    ) -> CommandResult {
        let cmd_name = command.to_lowercase();

        // Try to resolve alias
        let cmd_name = self.aliases.get(&cmd_name).unwrap_or(&cmd_name).clone();

        if cmd_name == "help" || cmd_name == "commands" {
            return help::help_command(self, context.prefix(), &invoker);
        }

        let Some(metadata) = self.commands.get(&cmd_name) else {
            tracing::debug!("Unknown command '{}' from {}", cmd_name, invoker.account_id);
            return CommandResult::Invalid("That command does not exist.".to_string());
        };

        if let Some(required_role) = metadata.required_role {
            if !invoker.role.has_permission(required_role) {
                tracing::warn!(
                    "Account {} ({}) denied '{}'",
                    invoker.account_id,
                    invoker.role,
                    cmd_name
                );
                return CommandResult::Failure(format!(
                    "You need {} role or higher to use this command",
                    required_role
                ));
            }
        }

        (metadata.handler)(context, invoker, cmd_name, args.to_vec()).await
    }
}

impl Default for CommandSystem {
    fn default() -> Self {
        Self::new()
    }
}

/// Reply text for a failed durable write
pub(crate) fn persistence_failure(error: &BotError) -> CommandResult {
    tracing::error!("Command could not be saved: {}", error);
    CommandResult::Failure("The change could not be saved. Please try again later.".to_string())
}

/// Parse a non-negative experience amount argument
pub(crate) fn parse_amount(arg: &str) -> Option<u64> {
    arg.parse::<u64>().ok()
}
