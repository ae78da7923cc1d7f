// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The JSONL subprocess driver every engine adapter is built from.
//!
//! `JsonlDriver<E>` is generic over an engine-specific `JsonlEngineSpec`,
//! so each CLI's quirks live in one small trait impl rather than in a
//! family of near-duplicate driver structs.

use crate::error::{DecodeError, RunnerError};
use crate::locks::LockHandle;
use crate::runner::{Runner, RunContext, EVENT_CHANNEL_CAPACITY};
use async_trait::async_trait;
use std::process::Stdio;
use std::sync::Arc;
use takopi_core::{Action, ActionKind, Event, Level};
use takopi_core::{EngineId, ResumeToken};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;

/// Tail length kept from a run's stderr for diagnostics.
pub const STDERR_TAIL_BYTES: usize = 4096;

/// Engine-specific behavior the JSONL driver is parameterized over.
///
/// Every method here is synchronous and side-effect free (besides the
/// `state` it's handed) so the driver remains the only place that touches
/// the subprocess, stdio, and locking.
pub trait JsonlEngineSpec: Send + Sync + 'static {
    /// Adapter-local scratch state threaded through a single run (e.g. the
    /// CLI's own tool-use ids mapped to our `Action.id`s).
    type State: Default + Send;
    /// One decoded JSONL record.
    type Decoded: Send;

    fn engine(&self) -> EngineId;

    /// Executable name or path.
    fn command(&self) -> String;

    /// CLI arguments for this run. Called with the prompt already
    /// space-padded if it starts with `-` (see [`pad_dash_prefixed`]).
    fn build_args(
        &self,
        prompt: &str,
        resume: Option<&ResumeToken>,
        cwd: &std::path::Path,
        state: &Self::State,
    ) -> Vec<String>;

    /// Extra environment variables, or overrides. Defaults to none.
    fn env(&self, _state: &Self::State) -> Vec<(String, String)> {
        Vec::new()
    }

    /// Payload written to stdin, when the CLI accepts the prompt that way
    /// (preferred — avoids argv-escaping hazards). `None` means the prompt
    /// was already placed in argv by `build_args` and stdin should just be
    /// closed.
    fn stdin_payload(&self, prompt: &str, resume: Option<&ResumeToken>, state: &Self::State) -> Option<String>;

    /// Decode one non-empty stdout line.
    fn decode_jsonl(&self, line: &str, state: &mut Self::State) -> Result<Self::Decoded, DecodeError>;

    /// Map one decoded record to zero or more normalized events.
    /// `found_session` is the resume token learned so far this run, if any.
    fn translate(
        &self,
        decoded: Self::Decoded,
        state: &mut Self::State,
        resume: Option<&ResumeToken>,
        found_session: Option<&ResumeToken>,
        cwd: &std::path::Path,
    ) -> Vec<Event>;

    /// Optional warning action emitted when a line fails to decode.
    /// Default: a `note`-kind warning action carrying the decode error.
    fn decode_error_event(&self, _line: &str, error: &DecodeError) -> Option<Event> {
        Some(Event::Action {
            engine: self.engine(),
            action: Action::new("decode-error", ActionKind::Warning, "malformed event")
                .with_detail("error", error.0.clone()),
            phase: takopi_core::ActionPhase::Completed,
            ok: Some(false),
            message: Some(error.0.clone()),
            level: Some(Level::Warning),
        })
    }

    fn format_resume(&self, token: &ResumeToken) -> Result<String, RunnerError>;
    fn extract_resume(&self, text: &str) -> Option<ResumeToken>;
    fn is_resume_line(&self, line: &str) -> bool;
}

/// Space-pad a prompt starting with `-` so the CLI doesn't parse it as a
/// flag.
pub fn pad_dash_prefixed(prompt: &str) -> String {
    if prompt.starts_with('-') {
        format!(" {prompt}")
    } else {
        prompt.to_string()
    }
}

/// Wraps an engine spec and implements [`Runner`] generically over it.
pub struct JsonlDriver<E: JsonlEngineSpec> {
    spec: Arc<E>,
}

impl<E: JsonlEngineSpec> JsonlDriver<E> {
    pub fn new(spec: E) -> Self {
        Self {
            spec: Arc::new(spec),
        }
    }
}

impl<E: JsonlEngineSpec> Clone for JsonlDriver<E> {
    fn clone(&self) -> Self {
        Self {
            spec: Arc::clone(&self.spec),
        }
    }
}

#[async_trait]
impl<E: JsonlEngineSpec> Runner for JsonlDriver<E> {
    fn engine(&self) -> EngineId {
        self.spec.engine()
    }

    fn format_resume(&self, token: &ResumeToken) -> Result<String, RunnerError> {
        self.spec.format_resume(token)
    }

    fn extract_resume(&self, text: &str) -> Option<ResumeToken> {
        self.spec.extract_resume(text)
    }

    fn is_resume_line(&self, line: &str) -> bool {
        self.spec.is_resume_line(line)
    }

    async fn run(
        &self,
        prompt: String,
        resume: Option<ResumeToken>,
        ctx: RunContext,
    ) -> mpsc::Receiver<Event> {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let spec = Arc::clone(&self.spec);
        tokio::spawn(async move {
            drive(spec, prompt, resume, ctx, tx).await;
        });
        rx
    }
}

struct Outcome {
    started_seen: bool,
    completed_seen: bool,
    found_session: Option<ResumeToken>,
}

async fn drive<E: JsonlEngineSpec>(
    spec: Arc<E>,
    prompt: String,
    resume: Option<ResumeToken>,
    ctx: RunContext,
    tx: mpsc::Sender<Event>,
) {
    let engine = spec.engine();
    let padded_prompt = pad_dash_prefixed(&prompt);

    // Resuming acquires the lock before the process even starts; a
    // brand-new thread acquires it only once `Started` reveals the key.
    let mut lock_guard: Option<LockHandle> = if let Some(token) = &resume {
        Some(ctx.locks.acquire(&token.thread_key()).await)
    } else {
        None
    };

    let mut state = E::State::default();
    let args = spec.build_args(&padded_prompt, resume.as_ref(), &ctx.cwd, &state);
    let env = spec.env(&state);
    let stdin_payload = spec.stdin_payload(&padded_prompt, resume.as_ref(), &state);

    let mut cmd = Command::new(spec.command());
    cmd.args(&args)
        .current_dir(&ctx.cwd)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    for (key, value) in &env {
        cmd.env(key, value);
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        cmd.process_group(0);
    }

    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(source) => {
            let _ = tx
                .send(Event::Completed {
                    engine: engine.clone(),
                    ok: false,
                    answer: String::new(),
                    resume: None,
                    error: Some(format!("failed to spawn {}: {source}", spec.command())),
                    usage: None,
                })
                .await;
            return;
        }
    };

    let mut stdin = child.stdin.take();
    let stdout = child.stdout.take().expect("stdout was piped");
    let stderr = child.stderr.take().expect("stderr was piped");

    if let Some(payload) = stdin_payload {
        if let Some(handle) = stdin.as_mut() {
            let _ = handle.write_all(payload.as_bytes()).await;
        }
    }
    drop(stdin); // close stdin regardless, so the CLI sees EOF

    let stderr_tail = Arc::new(parking_lot::Mutex::new(Vec::<u8>::new()));
    let stderr_task = tokio::spawn(drain_stderr(stderr, Arc::clone(&stderr_tail)));

    let mut outcome = Outcome {
        started_seen: false,
        completed_seen: false,
        found_session: None,
    };

    let mut lines = BufReader::new(stdout).lines();
    loop {
        tokio::select! {
            biased;
            _ = ctx.cancel.cancelled() => {
                tracing::info!(%engine, "run cancelled, terminating subprocess");
                terminate(&mut child);
                break;
            }
            line = lines.next_line() => {
                match line {
                    Ok(Some(line)) => {
                        if line.trim().is_empty() {
                            continue;
                        }
                        if !process_line(&*spec, &line, &mut state, resume.as_ref(), &mut outcome, &ctx, &mut lock_guard, &tx).await {
                            break;
                        }
                    }
                    Ok(None) => break, // EOF
                    Err(e) => {
                        tracing::warn!(%engine, error = %e, "error reading subprocess stdout");
                        break;
                    }
                }
            }
        }
    }

    let cancelled = ctx.cancel.is_cancelled();
    let exit_status = if cancelled {
        None
    } else {
        tokio::time::timeout(std::time::Duration::from_secs(5), child.wait())
            .await
            .ok()
            .and_then(|r| r.ok())
    };
    let _ = stderr_task.await;

    if !outcome.completed_seen {
        let error = if cancelled {
            "cancelled".to_string()
        } else {
            match exit_status {
                Some(status) if status.success() => "run ended without completion".to_string(),
                Some(status) => {
                    let tail = String::from_utf8_lossy(&stderr_tail.lock()).to_string();
                    if tail.trim().is_empty() {
                        format!("process exited with {status}")
                    } else {
                        tail
                    }
                }
                None => "run ended without completion".to_string(),
            }
        };
        let _ = tx
            .send(Event::Completed {
                engine: engine.clone(),
                ok: false,
                answer: String::new(),
                resume: outcome.found_session.clone(),
                error: Some(error),
                usage: None,
            })
            .await;
    }

    drop(lock_guard);
}

/// Returns `false` when the caller should stop reading stdout (a
/// `Completed` was observed).
#[allow(clippy::too_many_arguments)]
async fn process_line<E: JsonlEngineSpec>(
    spec: &E,
    line: &str,
    state: &mut E::State,
    resume: Option<&ResumeToken>,
    outcome: &mut Outcome,
    ctx: &RunContext,
    lock_guard: &mut Option<LockHandle>,
    tx: &mpsc::Sender<Event>,
) -> bool {
    let decoded = match spec.decode_jsonl(line, state) {
        Ok(decoded) => decoded,
        Err(error) => {
            if let Some(event) = spec.decode_error_event(line, &error) {
                let _ = tx.send(event).await;
            }
            return true;
        }
    };

    let events = spec.translate(decoded, state, resume, outcome.found_session.as_ref(), &ctx.cwd);
    for event in events {
        match &event {
            Event::Started { resume, .. } => {
                if outcome.started_seen {
                    tracing::warn!(engine = %spec.engine(), "dropping duplicate Started event");
                    continue;
                }
                outcome.started_seen = true;
                outcome.found_session = Some(resume.clone());
                if lock_guard.is_none() {
                    *lock_guard = Some(ctx.locks.acquire(&resume.thread_key()).await);
                }
            }
            Event::Completed { .. } => {
                if outcome.completed_seen {
                    tracing::warn!(engine = %spec.engine(), "dropping duplicate Completed event");
                    continue;
                }
                outcome.completed_seen = true;
            }
            Event::Action { .. } => {}
        }
        let is_completed = matches!(event, Event::Completed { .. });
        if tx.send(event).await.is_err() {
            // Consumer dropped the receiver; nothing left to do but stop.
            return false;
        }
        if is_completed {
            return false;
        }
    }
    true
}

async fn drain_stderr(
    mut stderr: tokio::process::ChildStderr,
    tail: Arc<parking_lot::Mutex<Vec<u8>>>,
) {
    use tokio::io::AsyncReadExt;
    let mut buf = [0u8; 1024];
    loop {
        match stderr.read(&mut buf).await {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                let mut guard = tail.lock();
                guard.extend_from_slice(&buf[..n]);
                if guard.len() > STDERR_TAIL_BYTES {
                    let overflow = guard.len() - STDERR_TAIL_BYTES;
                    guard.drain(0..overflow);
                }
            }
        }
    }
}

fn terminate(child: &mut tokio::process::Child) {
    #[cfg(unix)]
    {
        use nix::sys::signal::{killpg, Signal};
        use nix::unistd::Pid;

        if let Some(pid) = child.id() {
            // SIGTERM the whole process group, matching the
            // `process_group(0)` used at spawn time.
            let _ = killpg(Pid::from_raw(pid as i32), Signal::SIGTERM);
        } else {
            let _ = child.start_kill();
        }
    }
    #[cfg(not(unix))]
    {
        let _ = child.start_kill();
    }
}

#[cfg(test)]
#[path = "driver_tests.rs"]
mod tests;
