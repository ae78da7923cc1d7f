// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The runner protocol every engine adapter implements.

use crate::error::RunnerError;
use crate::locks::ThreadLocks;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use takopi_core::{EngineId, Event, ResumeToken};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Per-run context supplied by the scheduler: where the process should run,
/// how to cancel it, and the lock registry it must acquire into.
#[derive(Clone)]
pub struct RunContext {
    pub cwd: PathBuf,
    pub cancel: CancellationToken,
    pub locks: Arc<dyn ThreadLocks>,
}

/// Capacity of the bounded channel between an adapter and its consumer.
/// Backpressure here is what keeps a fast-talking CLI from outrunning a
/// throttled Telegram edit loop.
pub const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Every engine adapter (Codex, Claude, OpenCode, Pi, …) implements this.
///
/// `run` is lazy, finite, and non-restartable: each call spawns a fresh
/// subprocess and the returned receiver is drained exactly once.
#[async_trait]
pub trait Runner: Send + Sync {
    fn engine(&self) -> EngineId;

    /// The canonical CLI resume line for `token`. Fails if
    /// `token.engine != self.engine()`.
    fn format_resume(&self, token: &ResumeToken) -> Result<String, RunnerError>;

    /// Extract a resume token from free text. Last match wins when multiple
    /// lines match; `None` if no confident match.
    fn extract_resume(&self, text: &str) -> Option<ResumeToken>;

    /// Fast predicate used by the presenter's truncator to protect resume
    /// lines from being cut.
    fn is_resume_line(&self, line: &str) -> bool;

    /// Run `prompt` (optionally resuming `resume`), yielding normalized
    /// events in production order. Errors surface as a terminal
    /// `Event::Completed { ok: false, .. }`, never as an `Err` after
    /// `Started` has been yielded.
    async fn run(
        &self,
        prompt: String,
        resume: Option<ResumeToken>,
        ctx: RunContext,
    ) -> mpsc::Receiver<Event>;
}
