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

use crate::command::{CommandResult, Invoker, parse_amount, persistence_failure};
use crate::context::BotContext;
use crate::error::BotError;
use chrono::Utc;
use std::sync::Arc;

#[tracing::instrument(skip(context), fields(account_id = %invoker.account_id))]
pub async fn exadd_command(
    context: Arc<BotContext>,
    invoker: Invoker,
    _cmd: String,
    args: Vec<String>,
) -> CommandResult {
    let Some((player, amount)) = player_and_amount(&args) else {
        return CommandResult::Invalid(format!("Usage: {}exadd <name> <amount>", context.prefix()));
    };

    match context.award(player, amount).await {
        Ok(result) => {
            tracing::info!(
                "{} granted {} xp to {} (+{} levels)",
                invoker.account_id,
                amount,
                player,
                result.levels_gained
            );
            CommandResult::Success(format!(
                "Added {} XP to `{}`. (current XP: {})",
                amount, player, result.record.xp
            ))
        }
        Err(e) => persistence_failure(&e),
    }
}

#[tracing::instrument(skip(context), fields(account_id = %invoker.account_id))]
pub async fn exdel_command(
    context: Arc<BotContext>,
    invoker: Invoker,
    _cmd: String,
    args: Vec<String>,
) -> CommandResult {
    let Some((player, amount)) = player_and_amount(&args) else {
        return CommandResult::Invalid(format!("Usage: {}exdel <name> <amount>", context.prefix()));
    };

    match context.deduct(player, amount).await {
        Ok(record) => {
            tracing::info!("{} removed {} xp from {}", invoker.account_id, amount, player);
            CommandResult::Success(format!(
                "Removed {} XP from `{}`. (current XP: {})",
                amount, player, record.xp
            ))
        }
        Err(BotError::NotFound(_)) => {
            CommandResult::Failure(format!("`{}` has no experience yet.", player))
        }
        Err(e) => persistence_failure(&e),
    }
}

/// Round trip between the platform receiving the message and the bot
/// handling it
#[tracing::instrument(skip(_context), fields(account_id = %invoker.account_id))]
pub async fn ping_command(
    _context: Arc<BotContext>,
    invoker: Invoker,
    _cmd: String,
    _args: Vec<String>,
) -> CommandResult {
    match invoker.sent_at {
        Some(sent_at) => {
            let latency = (Utc::now() - sent_at).num_milliseconds().max(0);
            CommandResult::Success(format!("pong! {}ms", latency))
        }
        None => CommandResult::Success("pong!".to_string()),
    }
}

fn player_and_amount(args: &[String]) -> Option<(&str, u64)> {
    match args {
        [player, amount] => Some((player.as_str(), parse_amount(amount)?)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::test_utils::*;
    use crate::events::BotEvent;
    use waypoint_common::PlayerRecord;

    #[tokio::test]
    async fn test_exadd_creates_record_and_levels_up() {
        let (_dir, context) = test_context();

        let result = exadd_command(context.clone(), admin(), "exadd".into(), args(&["Steve", "150"])).await;
        assert_eq!(
            result,
            CommandResult::Success("Added 150 XP to `Steve`. (current XP: 50)".into())
        );
        assert_eq!(context.query("Steve").await, Some(PlayerRecord { xp: 50, level: 2 }));

        let announced = Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = announced.clone();
        context.events().subscribe(move |event| {
            if let BotEvent::LevelUp { level, .. } = event {
                sink.lock().unwrap().push(*level);
            }
        });
        context.events().process_events();
        assert_eq!(*announced.lock().unwrap(), vec![2]);
    }

    #[tokio::test]
    async fn test_exadd_rejects_bad_amounts() {
        let (_dir, context) = test_context();

        for bad in [vec!["Steve"], vec!["Steve", "-5"], vec!["Steve", "lots"]] {
            let result = exadd_command(context.clone(), admin(), "exadd".into(), args(&bad)).await;
            assert_eq!(result, CommandResult::Invalid("Usage: !exadd <name> <amount>".into()));
        }
        assert_eq!(context.query("Steve").await, None);
    }

    #[tokio::test]
    async fn test_exdel_clamps_at_zero() {
        let (_dir, context) = test_context();
        context.award("Steve", 5).await.unwrap();

        let result = exdel_command(context.clone(), admin(), "exdel".into(), args(&["Steve", "10"])).await;
        assert_eq!(
            result,
            CommandResult::Success("Removed 10 XP from `Steve`. (current XP: 0)".into())
        );
    }

    #[tokio::test]
    async fn test_exdel_unknown_player() {
        let (_dir, context) = test_context();
        let result = exdel_command(context.clone(), admin(), "exdel".into(), args(&["Nobody", "10"])).await;
        assert_eq!(result, CommandResult::Failure("`Nobody` has no experience yet.".into()));
        assert_eq!(context.query("Nobody").await, None);
    }

    #[tokio::test]
    async fn test_ping() {
        let (_dir, context) = test_context();
        let result = ping_command(context.clone(), admin(), "ping".into(), vec![]).await;
        assert_eq!(result, CommandResult::Success("pong!".into()));

        let mut invoker = admin();
        invoker.sent_at = Some(Utc::now());
        let result = ping_command(context, invoker, "ping".into(), vec![]).await;
        assert!(result.text().starts_with("pong! "));
        assert!(result.text().ends_with("ms"));
    }
}
