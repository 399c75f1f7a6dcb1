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

use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use waypoint_server::config::{Arguments, Configuration};
use waypoint_server::{BotContext, BotEvent, RelayListener};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load arguments from the command line
    let arguments: Arguments = Parser::parse();

    // Initialize tracing/logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_thread_ids(true)
        .with_level(true)
        .with_ansi(true)
        .init();

    // Load environment variables from .env file if specified
    if let Some(ref env_file) = arguments.env_file {
        if std::path::Path::new(env_file).exists() {
            tracing::debug!("Loading environment variables from file: {}", env_file);
            dotenv::from_filename(env_file).ok();
        }
    } else {
        tracing::debug!("Loading environment variables from default file");
        dotenv::dotenv().ok();
    }

    // Load configuration from a file with environment variable substitution
    let config = match Configuration::load(&arguments.config_file) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Unable to load configuration file {}: {}", arguments.config_file, e);
            return Err(e.into());
        }
    };

    tracing::debug!("Configuration loaded: {:?}", config);
    tracing::info!("Starting Waypoint...");

    // Load both tables and build the bot context
    let context = Arc::new(BotContext::load(&config)?);
    context.events().subscribe(|event| match event {
        BotEvent::SessionStarted { player } => tracing::debug!("Session started for {}", player),
        BotEvent::SessionEnded {
            player,
            minutes,
            gained_xp,
        } => tracing::info!("{} played {} minutes and gained {} XP", player, minutes, gained_xp),
        BotEvent::LevelUp { player, level, .. } => {
            tracing::info!("{} reached level {}", player, level)
        }
    });
    if context.channels().console.is_empty() {
        tracing::warn!("No console channel configured, join and leave notices will be ignored");
    }
    tracing::info!("Bot context initialized");

    let relay = Arc::new(RelayListener::new(
        context,
        config.listener.auth_key.as_str(),
    ));

    // Get listener address from configuration
    let listen_addr: SocketAddr = config.listener.addr.to_addr();

    tracing::info!("Binding relay listener to {}", listen_addr);
    let listener = TcpListener::bind(listen_addr).await?;
    tracing::info!("Relay listener listening on {}", listen_addr);

    tokio::select! {
        result = relay.serve(listener) => {
            if let Err(e) = &result {
                tracing::error!("Relay listener failed: {}", e);
            }
            result?;
        }
        signal = tokio::signal::ctrl_c() => {
            signal?;
            tracing::info!("Shutdown signal received, stopping");
        }
    }

    Ok(())
}
