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

//! Integration tests for the ledger and link table files

use chrono::{Duration, TimeZone, Utc};
use std::sync::Arc;
use waypoint_common::{AccountRole, PlayerRecord};
use waypoint_server::{
    AwardOutcome, BotChannels, BotContext, BotError, CommandResult, CommandSystem, ConsoleParser,
    ExperienceEngine, Invoker, LevelCurve, LinkTable, PlayerLedger,
};

fn context_in(dir: &tempfile::TempDir) -> Arc<BotContext> {
    let ledger = PlayerLedger::load(dir.path().join("levels.json"), LevelCurve::default()).unwrap();
    let links = LinkTable::load(dir.path().join("nicknames.json")).unwrap();
    Arc::new(BotContext::new(
        ledger,
        links,
        ExperienceEngine::default(),
        ConsoleParser::default(),
        BotChannels::default(),
        "!",
    ))
}

#[tokio::test]
async fn test_existing_files_are_loaded() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("levels.json"),
        "{\n  \"Steve\": {\n    \"xp\": 250,\n    \"level\": 2\n  }\n}",
    )
    .unwrap();
    std::fs::write(
        dir.path().join("nicknames.json"),
        "{\n  \"123456789012345678\": \"Steve\"\n}",
    )
    .unwrap();

    let context = context_in(&dir);
    assert_eq!(
        context.query("Steve").await,
        Some(PlayerRecord { xp: 250, level: 2 })
    );
    assert_eq!(
        context.resolve("123456789012345678").await.as_deref(),
        Some("Steve")
    );
}

#[tokio::test]
async fn test_progress_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let t0 = Utc.with_ymd_and_hms(2025, 3, 1, 20, 0, 0).unwrap();

    {
        let context = context_in(&dir);
        context.link("1001", "Alex").await.unwrap();
        context.player_joined("Alex", t0).await;
        let outcome = context
            .player_left("Alex", t0 + Duration::seconds(650))
            .await
            .unwrap();
        assert!(matches!(
            outcome,
            AwardOutcome::Awarded {
                minutes: 10,
                gained_xp: 100,
                levels_gained: 1,
                ..
            }
        ));
        context.award("Alex", 150).await.unwrap();
    }

    let context = context_in(&dir);
    assert_eq!(context.resolve("1001").await.as_deref(), Some("Alex"));
    assert_eq!(
        context.query("Alex").await,
        Some(PlayerRecord { xp: 150, level: 2 })
    );

    let written = std::fs::read_to_string(dir.path().join("levels.json")).unwrap();
    assert_eq!(
        written,
        "{\n  \"Alex\": {\n    \"xp\": 150,\n    \"level\": 2\n  }\n}"
    );
}

#[tokio::test]
async fn test_sessions_are_not_persisted() {
    let dir = tempfile::tempdir().unwrap();
    {
        let context = context_in(&dir);
        context.player_joined("Steve", Utc::now()).await;
        assert_eq!(context.open_sessions().await, 1);
    }

    let context = context_in(&dir);
    assert_eq!(context.open_sessions().await, 0);
    assert!(matches!(
        context.player_left("Steve", Utc::now()).await,
        Ok(AwardOutcome::NoSession)
    ));
}

#[tokio::test]
async fn test_admin_flow_over_command_system() {
    let dir = tempfile::tempdir().unwrap();
    let context = context_in(&dir);
    let commands = CommandSystem::new();
    let admin = Invoker::new("1", "mod", AccountRole::Admin);
    let member = Invoker::new("2", "Steve", AccountRole::Member);
    let args = |values: &[&str]| values.iter().map(|v| v.to_string()).collect::<Vec<_>>();

    let result = commands
        .execute(context.clone(), member.clone(), "link", &args(&["Steve"]))
        .await;
    assert!(result.is_success());

    let result = commands
        .execute(context.clone(), member.clone(), "exadd", &args(&["Steve", "500"]))
        .await;
    assert!(matches!(result, CommandResult::Failure(_)));
    assert_eq!(context.query("Steve").await, None);

    let result = commands
        .execute(context.clone(), admin.clone(), "exadd", &args(&["Steve", "500"]))
        .await;
    assert!(result.is_success());
    assert_eq!(
        context.query("Steve").await,
        Some(PlayerRecord { xp: 76, level: 3 })
    );

    let result = commands
        .execute(context.clone(), admin.clone(), "exdel", &args(&["Steve", "1000"]))
        .await;
    assert!(result.is_success());
    assert_eq!(
        context.query("Steve").await,
        Some(PlayerRecord { xp: 0, level: 3 })
    );

    let result = commands
        .execute(context.clone(), admin, "sever", &args(&["Steve"]))
        .await;
    assert!(result.is_success());
    assert_eq!(context.resolve("2").await, None);

    assert!(matches!(
        context.unlink("2").await,
        Err(BotError::NotFound(_))
    ));
}
