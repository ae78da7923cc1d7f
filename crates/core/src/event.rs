// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The normalized event model every engine adapter produces.

use crate::action::{Action, ActionPhase};
use crate::id::EngineId;
use crate::resume::ResumeToken;
use serde::{Deserialize, Serialize};

/// Severity for a warning-style [`Event::Action`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Info,
    Warning,
    Error,
}

/// Token usage reported at completion, when the engine exposes it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub input_tokens: u64,
    #[serde(default)]
    pub output_tokens: u64,
}

/// The normalized event model every engine adapter produces.
///
/// Serializes with `{"type": "started", ...}` tagging so events round-trip
/// for diagnostics and replay in tests.
///
/// Invariants (enforced by the JSONL driver, not by this type):
/// at most one `Started` per run; if `Started` is emitted, exactly one
/// `Completed` is emitted on controlled termination and its `resume` (when
/// present) equals `Started`'s; events are never reordered once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Emitted at most once per run, after the adapter has learned the
    /// thread identity.
    Started {
        engine: EngineId,
        resume: ResumeToken,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        meta: Option<serde_json::Value>,
    },

    /// Multiple events may share an `action.id`; later events supersede
    /// earlier ones for that id in progress UI.
    Action {
        engine: EngineId,
        action: Action,
        phase: ActionPhase,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ok: Option<bool>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        level: Option<Level>,
    },

    /// Terminal: emitted exactly once for any controlled termination after
    /// `Started`.
    Completed {
        engine: EngineId,
        ok: bool,
        answer: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        resume: Option<ResumeToken>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        usage: Option<Usage>,
    },
}

impl Event {
    pub fn engine(&self) -> &EngineId {
        match self {
            Event::Started { engine, .. } => engine,
            Event::Action { engine, .. } => engine,
            Event::Completed { engine, .. } => engine,
        }
    }

    pub fn is_started(&self) -> bool {
        matches!(self, Event::Started { .. })
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Event::Completed { .. })
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
