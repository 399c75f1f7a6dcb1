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

//! Manual session commands for exercising the award path without a game
//! server

use crate::award::AwardOutcome;
use crate::command::{CommandResult, Invoker, persistence_failure};
use crate::context::BotContext;
use chrono::Utc;
use std::sync::Arc;

#[tracing::instrument(skip(context), fields(account_id = %invoker.account_id))]
pub async fn testin_command(
    context: Arc<BotContext>,
    invoker: Invoker,
    _cmd: String,
    args: Vec<String>,
) -> CommandResult {
    let [player] = args.as_slice() else {
        return CommandResult::Invalid(format!("Usage: {}testin <name>", context.prefix()));
    };

    context.player_joined(player, Utc::now()).await;
    CommandResult::Success(format!("{} joined for testing.", player))
}

#[tracing::instrument(skip(context), fields(account_id = %invoker.account_id))]
pub async fn testout_command(
    context: Arc<BotContext>,
    invoker: Invoker,
    _cmd: String,
    args: Vec<String>,
) -> CommandResult {
    let [player] = args.as_slice() else {
        return CommandResult::Invalid(format!("Usage: {}testout <name>", context.prefix()));
    };

    match context.player_left(player, Utc::now()).await {
        Ok(AwardOutcome::NoSession) => {
            CommandResult::Failure(format!("{} has no join record.", player))
        }
        Ok(AwardOutcome::TooShort { .. }) => CommandResult::Success(format!(
            "{} played for less than a minute, so no XP was awarded.",
            player
        )),
        Ok(AwardOutcome::Awarded {
            minutes, gained_xp, ..
        }) => CommandResult::Success(format!(
            "{} left the test session. (played {} minutes, gained {} XP)",
            player, minutes, gained_xp
        )),
        Err(e) => persistence_failure(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::test_utils::*;
    use chrono::Duration;

    #[tokio::test]
    async fn test_testin_then_immediate_testout() {
        let (_dir, context) = test_context();

        let result = testin_command(context.clone(), admin(), "testin".into(), args(&["Steve"])).await;
        assert_eq!(result, CommandResult::Success("Steve joined for testing.".into()));
        assert_eq!(context.open_sessions().await, 1);

        let result = testout_command(context.clone(), admin(), "testout".into(), args(&["Steve"])).await;
        assert_eq!(
            result,
            CommandResult::Success("Steve played for less than a minute, so no XP was awarded.".into())
        );
        assert_eq!(context.query("Steve").await, None);
    }

    #[tokio::test]
    async fn test_testout_without_join() {
        let (_dir, context) = test_context();
        let result = testout_command(context, admin(), "testout".into(), args(&["Steve"])).await;
        assert_eq!(result, CommandResult::Failure("Steve has no join record.".into()));
    }

    #[tokio::test]
    async fn test_testout_awards_experience() {
        let (_dir, context) = test_context();
        context
            .player_joined("Steve", Utc::now() - Duration::minutes(12))
            .await;

        let result = testout_command(context.clone(), admin(), "testout".into(), args(&["Steve"])).await;
        assert_eq!(
            result,
            CommandResult::Success("Steve left the test session. (played 12 minutes, gained 120 XP)".into())
        );
        assert_eq!(context.query("Steve").await.map(|record| record.level), Some(2));
    }
}
