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

use crate::command::{CommandResult, CommandSystem, Invoker};

pub fn help_command(system: &CommandSystem, prefix: &str, invoker: &Invoker) -> CommandResult {
    CommandResult::Success(system.generate_help(prefix, invoker.role))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::test_utils::*;

    #[tokio::test]
    async fn test_help_through_dispatch() {
        let (_dir, context) = test_context();
        let system = CommandSystem::new();

        let result = system.execute(context.clone(), member("1"), "help", &[]).await;
        assert!(result.text().starts_with("Available Commands:"));
        assert!(!result.text().contains("Admin Commands:"));

        let result = system.execute(context, admin(), "commands", &[]).await;
        assert!(result.text().contains("!testout <name>"));
    }
}
