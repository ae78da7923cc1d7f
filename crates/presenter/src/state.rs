// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-progress-message state: the thing one Telegram message's edits are
//! rendered from. Owned by one [`crate::Presenter`] per run.

use indexmap::IndexMap;
use std::time::Instant;
use takopi_core::{Action, ActionKind, ActionPhase, Clock, EngineId, ResumeToken};

/// A single action line, active or completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionLine {
    pub id: String,
    pub kind: ActionKind,
    pub title: String,
}

/// The terminal outcome of a run, once `Completed` has been observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub ok: bool,
    pub answer: String,
    pub error: Option<String>,
}

/// State for one progress message, updated as normalized events arrive.
pub struct ProgressState {
    pub engine: Option<EngineId>,
    pub title: Option<String>,
    pub resume: Option<ResumeToken>,
    /// Keyed by `Action.id`, insertion-ordered so the rendered list reflects
    /// the order actions started in.
    pub active: IndexMap<String, ActionLine>,
    pub completed: Vec<ActionLine>,
    pub started_at: Instant,
    pub dirty: bool,
    pub finished: bool,
    pub outcome: Option<Outcome>,
}

impl ProgressState {
    pub fn new(clock: &dyn Clock) -> Self {
        Self {
            engine: None,
            title: None,
            resume: None,
            active: IndexMap::new(),
            completed: Vec::new(),
            started_at: clock.now(),
            dirty: false,
            finished: false,
            outcome: None,
        }
    }

    pub fn apply_started(&mut self, engine: EngineId, resume: ResumeToken, title: Option<String>) {
        self.engine = Some(engine);
        self.resume = Some(resume);
        self.title = title;
        self.dirty = true;
    }

    /// Applies one `Action` event. An event for an id already in
    /// `completed` is dropped (a late `updated`, or a duplicate
    /// `completed`, arriving after the matching completion).
    pub fn apply_action(&mut self, action: Action, phase: ActionPhase) {
        if self.completed.iter().any(|c| c.id == action.id) {
            tracing::debug!(action_id = %action.id, ?phase, "dropping action event after completion");
            return;
        }

        let line = ActionLine {
            id: action.id,
            kind: action.kind,
            title: action.title,
        };

        match phase {
            ActionPhase::Completed => {
                self.active.shift_remove(&line.id);
                self.completed.push(line);
            }
            ActionPhase::Started | ActionPhase::Updated => {
                self.active.insert(line.id.clone(), line);
            }
        }
        self.dirty = true;
    }

    pub fn apply_completed(&mut self, ok: bool, answer: String, resume: Option<ResumeToken>, error: Option<String>) {
        if resume.is_some() {
            self.resume = resume;
        }
        self.outcome = Some(Outcome { ok, answer, error });
        self.finished = true;
        self.dirty = true;
    }

    pub fn elapsed_secs(&self, clock: &dyn Clock) -> u64 {
        clock.now().saturating_duration_since(self.started_at).as_secs()
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
