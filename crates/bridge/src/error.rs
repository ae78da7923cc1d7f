// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LockError {
    #[error("another bridge process for this bot token is already running (pid {0})")]
    Contention(u32),

    #[error("io error at {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),
}

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("unknown project alias {0:?}")]
    UnknownProject(String),

    #[error("no runner registered for engine {0}")]
    UnknownEngine(takopi_core::EngineId),

    #[error(transparent)]
    Router(#[from] takopi_router::RouterError),

    #[error(transparent)]
    Worktree(#[from] takopi_worktree::WorktreeError),

    #[error(transparent)]
    Scheduler(#[from] takopi_scheduler::SchedulerError),

    #[error(transparent)]
    Presenter(#[from] takopi_presenter::PresenterError),

    #[error(transparent)]
    Telegram(#[from] takopi_telegram::TelegramError),

    #[error(transparent)]
    Lock(#[from] LockError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
