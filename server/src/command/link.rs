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

use crate::command::{CommandResult, Invoker, persistence_failure};
use crate::context::BotContext;
use crate::error::BotError;
use std::sync::Arc;

#[tracing::instrument(skip(context), fields(account_id = %invoker.account_id))]
pub async fn link_command(
    context: Arc<BotContext>,
    invoker: Invoker,
    _cmd: String,
    args: Vec<String>,
) -> CommandResult {
    let [player] = args.as_slice() else {
        return CommandResult::Invalid(format!("Usage: {}link <name>", context.prefix()));
    };

    match context.link(&invoker.account_id, player).await {
        Ok(()) => CommandResult::Success(format!(
            "{}, your Minecraft name is now registered as `{}`.",
            invoker.display_name, player
        )),
        Err(BotError::InvalidFormat(_)) => CommandResult::Invalid(format!(
            "`{}` is not a valid Minecraft name. (3-16 letters, digits or underscores)",
            player
        )),
        Err(BotError::AlreadyLinked(_)) => CommandResult::Failure(format!(
            "The Minecraft name `{}` is already registered.",
            player
        )),
        Err(e) => persistence_failure(&e),
    }
}

#[tracing::instrument(skip(context), fields(account_id = %invoker.account_id))]
pub async fn unlink_command(
    context: Arc<BotContext>,
    invoker: Invoker,
    _cmd: String,
    _args: Vec<String>,
) -> CommandResult {
    match context.unlink(&invoker.account_id).await {
        Ok(player) => CommandResult::Success(format!(
            "{}, your Minecraft name `{}` has been removed.",
            invoker.display_name, player
        )),
        Err(BotError::NotFound(_)) => CommandResult::Failure(format!(
            "{}, you have no registered Minecraft name.",
            invoker.display_name
        )),
        Err(e) => persistence_failure(&e),
    }
}

#[tracing::instrument(skip(context), fields(account_id = %invoker.account_id))]
pub async fn sever_command(
    context: Arc<BotContext>,
    invoker: Invoker,
    _cmd: String,
    args: Vec<String>,
) -> CommandResult {
    let [player] = args.as_slice() else {
        return CommandResult::Invalid(format!("Usage: {}sever <name>", context.prefix()));
    };

    match context.sever(player).await {
        Ok(account_id) => {
            tracing::info!("{} severed the link for {}", invoker.account_id, player);
            CommandResult::Success(format!(
                "The Minecraft name `{}` has been force-unlinked from account {}.",
                player, account_id
            ))
        }
        Err(BotError::NotFound(_)) => {
            CommandResult::Failure(format!("No account has registered `{}`.", player))
        }
        Err(e) => persistence_failure(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::test_utils::*;

    #[tokio::test]
    async fn test_link_and_unlink() {
        let (_dir, context) = test_context();

        let result = link_command(context.clone(), member("1001"), "link".into(), args(&["Player_1"])).await;
        assert!(result.is_success());
        assert_eq!(context.resolve("1001").await.as_deref(), Some("Player_1"));

        let result = unlink_command(context.clone(), member("1001"), "unlink".into(), vec![]).await;
        assert!(result.text().contains("`Player_1` has been removed"));
        assert_eq!(context.resolve("1001").await, None);

        let result = unlink_command(context, member("1001"), "unlink".into(), vec![]).await;
        assert!(matches!(result, CommandResult::Failure(_)));
    }

    #[tokio::test]
    async fn test_link_invalid_name() {
        let (_dir, context) = test_context();
        let result = link_command(context.clone(), member("1001"), "link".into(), args(&["ab"])).await;
        assert!(matches!(result, CommandResult::Invalid(_)));
        assert_eq!(context.resolve("1001").await, None);
    }

    #[tokio::test]
    async fn test_link_taken_name() {
        let (_dir, context) = test_context();
        link_command(context.clone(), member("1001"), "link".into(), args(&["Steve"])).await;

        let result = link_command(context.clone(), member("1002"), "link".into(), args(&["Steve"])).await;
        assert_eq!(
            result,
            CommandResult::Failure("The Minecraft name `Steve` is already registered.".into())
        );
    }

    #[tokio::test]
    async fn test_link_usage() {
        let (_dir, context) = test_context();
        let result = link_command(context.clone(), member("1001"), "link".into(), vec![]).await;
        assert_eq!(result, CommandResult::Invalid("Usage: !link <name>".into()));

        let result = link_command(context, member("1001"), "link".into(), args(&["a", "b"])).await;
        assert!(matches!(result, CommandResult::Invalid(_)));
    }

    #[tokio::test]
    async fn test_sever() {
        let (_dir, context) = test_context();
        context.link("1001", "Steve").await.unwrap();

        let result = sever_command(context.clone(), admin(), "sever".into(), args(&["Steve"])).await;
        assert!(result.text().contains("account 1001"));
        assert_eq!(context.resolve("1001").await, None);

        let result = sever_command(context, admin(), "sever".into(), args(&["Steve"])).await;
        assert!(matches!(result, CommandResult::Failure(_)));
    }
}
