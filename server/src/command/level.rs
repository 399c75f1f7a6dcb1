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

use crate::command::{CommandResult, Invoker};
use crate::context::{BotContext, Standing};
use std::sync::Arc;

#[tracing::instrument(skip(context), fields(account_id = %invoker.account_id))]
pub async fn level_command(
    context: Arc<BotContext>,
    invoker: Invoker,
    _cmd: String,
    _args: Vec<String>,
) -> CommandResult {
    match context.standing(&invoker.account_id).await {
        Standing::Unlinked => CommandResult::Failure(format!(
            "{}, you have not registered a Minecraft name. Use `{}link <name>` to register.",
            invoker.display_name,
            context.prefix()
        )),
        Standing::NoRecord { .. } => CommandResult::Success(format!(
            "{}, you have no experience yet.",
            invoker.display_name
        )),
        Standing::Ranked {
            record,
            next_level_xp,
            ..
        } => CommandResult::Success(format!(
            "{}, current level: {} (XP: {}/{})",
            invoker.display_name, record.level, record.xp, next_level_xp
        )),
    }
}
