// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! The `takopi` binary: parses CLI flags, loads config, and runs the
//! bridge loop until it exits or the process is signalled.

mod onboard;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use takopi_bridge::{Bridge, DeliveryMode, Lock, LockError};
use takopi_config::Config;
use takopi_core::{EngineId, SystemClock};
use takopi_scheduler::Scheduler;
use takopi_telegram::HttpTelegramClient;
use takopi_worktree::WorktreeResolver;

const EXIT_CONFIG_ERROR: i32 = 1;
const EXIT_LOCK_CONTENTION: i32 = 2;

/// A chat-to-coding-agent bridge: relays Telegram messages to a coding
/// agent CLI and streams its progress back as edited Telegram messages.
#[derive(Parser)]
#[command(name = "takopi", version, about)]
struct Cli {
    #[command(subcommand)]
    engine: Option<EngineCommand>,

    /// Send a push notification with the final message (default)
    #[arg(long, global = true, overrides_with = "no_final_notify")]
    final_notify: bool,
    /// Deliver the final message silently, without a push notification
    #[arg(long, global = true, overrides_with = "final_notify")]
    no_final_notify: bool,

    /// Also mirror logs to stderr
    #[arg(long, global = true, overrides_with = "no_debug")]
    debug: bool,
    #[arg(long, global = true, overrides_with = "debug")]
    no_debug: bool,

    /// Write a starter config file if none exists yet, then exit
    #[arg(long)]
    onboard: bool,

    /// Print the registered engine ids and exit
    #[arg(long)]
    list_engines: bool,
}

/// One subcommand per registered engine; selecting one forces that engine
/// as the default for this invocation, overriding the config file.
#[derive(Subcommand, Clone, Copy)]
enum EngineCommand {
    Codex,
    Claude,
    Opencode,
    Pi,
    /// The subprocess-free engine used for local testing.
    Mock,
}

impl EngineCommand {
    fn engine_id(self) -> EngineId {
        match self {
            Self::Codex => EngineId::new("codex"),
            Self::Claude => EngineId::new("claude"),
            Self::Opencode => EngineId::new("opencode"),
            Self::Pi => EngineId::new("pi"),
            Self::Mock => EngineId::new("mock"),
        }
    }
}

/// `true` unless `--no-final-notify` was the last of the pair given.
fn resolve_final_notify(cli: &Cli) -> bool {
    !cli.no_final_notify
}

fn resolve_debug(cli: &Cli) -> bool {
    cli.debug && !cli.no_debug
}

fn resolve_default_engine(cli_engine: Option<EngineCommand>, config_default: &str) -> EngineId {
    cli_engine.map(|e| e.engine_id()).unwrap_or_else(|| EngineId::new(config_default))
}

/// Moves the runner matching `default_engine` to the front, preserving the
/// relative order of the rest. The registry order is both the scheduler's
/// engine-mismatch-check order and the router's tie-breaking order for
/// resume-token extraction, so the configured default must lead it.
fn default_engine_first(mut registry: Vec<Arc<dyn takopi_runner::Runner>>, default_engine: &EngineId) -> Vec<Arc<dyn takopi_runner::Runner>> {
    if let Some(pos) = registry.iter().position(|r| &r.engine() == default_engine) {
        let runner = registry.remove(pos);
        registry.insert(0, runner);
    }
    registry
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.onboard {
        match onboard::run() {
            Ok(path) => {
                println!("wrote starter config to {}", path.display());
                std::process::exit(0);
            }
            Err(error) => {
                eprintln!("Error: {error}");
                std::process::exit(EXIT_CONFIG_ERROR);
            }
        }
    }

    if cli.list_engines {
        for runner in takopi_adapters::builtin_runners() {
            println!("{}", runner.engine());
        }
        std::process::exit(0);
    }

    if let Err(error) = run(cli).await {
        eprintln!("Error: {error}");
        let code = error
            .downcast_ref::<LockError>()
            .map(|e| match e {
                LockError::Contention(_) => EXIT_LOCK_CONTENTION,
                LockError::Io(_, _) => EXIT_CONFIG_ERROR,
            })
            .unwrap_or(EXIT_CONFIG_ERROR);
        std::process::exit(code);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let final_notify = resolve_final_notify(&cli);
    let debug = resolve_debug(&cli);
    let cli_engine = cli.engine;

    let config = Config::load().context("failed to load configuration")?;
    let default_engine = resolve_default_engine(cli_engine, &config.default_engine);

    let bot_token = std::env::var("TAKOPI_BOT_TOKEN").context("TAKOPI_BOT_TOKEN must be set")?;

    let state_dir = takopi_state_dir()?;
    let lock_path = state_dir.join("takopi.lock");
    let lock = Lock::acquire(&lock_path, takopi_bridge::fingerprint(&bot_token))?;

    let log_path = state_dir.join("takopi.log");
    takopi_bridge::rotate_log_if_needed(&log_path);
    let _log_guard = takopi_bridge::setup_logging(&log_path, &bot_token, debug).context("failed to set up logging")?;

    let registry = default_engine_first(takopi_adapters::builtin_runners(), &default_engine);
    let scheduler = Scheduler::new(registry.clone());
    let worktree = WorktreeResolver::system();
    let telegram = Arc::new(HttpTelegramClient::new(&bot_token).context("failed to build Telegram client")?);

    let bridge = Arc::new(Bridge::new(
        telegram,
        registry,
        scheduler,
        worktree,
        config,
        default_engine,
        DeliveryMode::NewMessageThenDelete,
        final_notify,
        std::env::current_dir().context("failed to determine the current directory")?,
        Arc::new(SystemClock),
    ));

    let result = bridge.run().await;
    lock.release();
    result.context("bridge loop exited with an error")
}

/// `TAKOPI_STATE_DIR` takes priority (also used by tests for isolation);
/// otherwise `$XDG_DATA_HOME/takopi` or `~/.local/share/takopi`.
fn takopi_state_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("TAKOPI_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    dirs::data_dir().map(|dir| dir.join("takopi")).context("could not determine a data directory for this platform")
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
