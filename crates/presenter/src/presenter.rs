// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The presenter itself: a [`takopi_scheduler::RunSink`] that turns
//! normalized events into throttled Telegram edits and one final render.

use crate::error::PresenterError;
use crate::render::{render_final, render_progress, TRANSPORT_LIMIT};
use crate::sink::ProgressSink;
use crate::state::ProgressState;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};
use takopi_core::{Clock, Event};
use takopi_runner::Runner;
use takopi_scheduler::RunSink;
use tokio::sync::mpsc;

/// Edits are never sent more often than this.
const EDIT_THROTTLE: Duration = Duration::from_secs(1);
/// How often the throttle worker wakes to check for a due edit, independent
/// of whether a new event arrived.
const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Drives one progress message for the lifetime of one run. Cheap events
/// (`Started`, `Action`) only touch in-memory state and nudge a background
/// worker; the worker — not the event producer — is the one that ever
/// awaits a Telegram call, so a slow or rate-limited edit never backs up
/// the adapter's event stream.
pub struct Presenter {
    state: parking_lot::Mutex<ProgressState>,
    runner: Arc<dyn Runner>,
    sink: Arc<dyn ProgressSink>,
    clock: Arc<dyn Clock>,
    ctx_footer: Option<String>,
    wake: mpsc::Sender<()>,
}

impl Presenter {
    /// Spawns the throttled-edit worker and returns the presenter handle.
    /// `ctx_footer` is the already-formatted `ctx: project [@ branch]` line
    /// carried over from the triggering message, if any.
    pub fn spawn(
        runner: Arc<dyn Runner>,
        sink: Arc<dyn ProgressSink>,
        ctx_footer: Option<String>,
        clock: Arc<dyn Clock>,
    ) -> Result<Arc<Self>, PresenterError> {
        if let Some(footer) = &ctx_footer {
            if footer.contains('\n') {
                return Err(PresenterError::InvalidCtxFooter(footer.clone()));
            }
        }

        let (wake, wake_rx) = mpsc::channel(1);
        let state = parking_lot::Mutex::new(ProgressState::new(clock.as_ref()));
        let presenter = Arc::new(Self {
            state,
            runner,
            sink,
            clock,
            ctx_footer,
            wake,
        });

        let worker = presenter.clone();
        tokio::spawn(async move { worker.run_throttle_loop(wake_rx).await });

        Ok(presenter)
    }

    fn resume_line(&self, state: &ProgressState) -> Option<String> {
        state.resume.as_ref().and_then(|token| self.runner.format_resume(token).ok())
    }

    fn rendered_progress(&self, state: &ProgressState) -> String {
        let resume_line = self.resume_line(state);
        let rendered = render_progress(state, self.clock.as_ref(), resume_line.as_deref());
        truncate_for_transport(&rendered, |line| self.runner.is_resume_line(line))
    }

    fn rendered_final(&self, state: &ProgressState) -> String {
        let resume_line = self.resume_line(state);
        let rendered = render_final(state, resume_line.as_deref(), self.ctx_footer.as_deref());
        truncate_for_transport(&rendered, |line| self.runner.is_resume_line(line))
    }

    async fn run_throttle_loop(self: Arc<Self>, mut wake: mpsc::Receiver<()>) {
        let mut last_edit: Option<Instant> = None;
        let mut last_rendered: Option<String> = None;

        loop {
            let _ = tokio::time::timeout(POLL_INTERVAL, wake.recv()).await;

            let (dirty, finished) = {
                let mut state = self.state.lock();
                (std::mem::take(&mut state.dirty), state.finished)
            };

            if finished {
                break;
            }
            if !dirty {
                continue;
            }

            let due = last_edit
                .map(|t| self.clock.now().duration_since(t) >= EDIT_THROTTLE)
                .unwrap_or(true);
            if !due {
                // Not our turn yet; leave the flag set so a later tick catches it.
                self.state.lock().dirty = true;
                continue;
            }
            let rendered = {
                let state = self.state.lock();
                self.rendered_progress(&state)
            };
            if last_rendered.as_deref() == Some(rendered.as_str()) {
                continue;
            }

            self.sink.edit(&rendered).await;
            last_rendered = Some(rendered);
            last_edit = Some(self.clock.now());
        }
    }
}

fn truncate_for_transport(rendered: &str, is_resume_line: impl Fn(&str) -> bool) -> String {
    crate::render::truncate_rendered(rendered, TRANSPORT_LIMIT, |line| {
        is_resume_line(line) || line.starts_with("ctx:")
    })
}

#[async_trait]
impl RunSink for Presenter {
    async fn on_event(&self, event: Event) {
        match event {
            Event::Started { engine, resume, title, .. } => {
                self.state.lock().apply_started(engine, resume, title);
                let _ = self.wake.try_send(());
            }
            Event::Action { action, phase, .. } => {
                self.state.lock().apply_action(action, phase);
                let _ = self.wake.try_send(());
            }
            Event::Completed { ok, answer, resume, error, .. } => {
                let rendered = {
                    let mut state = self.state.lock();
                    state.apply_completed(ok, answer, resume, error);
                    self.rendered_final(&state)
                };
                self.sink.finalize(&rendered).await;
                let _ = self.wake.try_send(());
            }
        }
    }
}

#[cfg(test)]
#[path = "presenter_tests.rs"]
mod tests;
