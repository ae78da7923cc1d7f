// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Actions: the unit of progress an adapter reports mid-run.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Extensible kind tag for an [`Action`]. Unknown kinds (e.g. an adapter
/// emitting a kind added by a newer engine version) deserialize to
/// [`ActionKind::Note`] rather than failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Command,
    Tool,
    FileChange,
    WebSearch,
    Subagent,
    Turn,
    Warning,
    Telemetry,
    #[serde(other)]
    Note,
}

/// Where an [`Action`] sits in its own lifecycle. Ordered: a later event for
/// the same `Action.id` must never report an earlier phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionPhase {
    Started,
    Updated,
    Completed,
}

/// A single unit of agent activity: a shell command, a tool call, a file
/// edit, a web search, a subagent invocation, and so on.
///
/// `id` is unique within one run and stable across every event referring to
/// the same underlying action. `detail` is freeform — consumers must
/// tolerate missing keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub id: String,
    pub kind: ActionKind,
    pub title: String,
    #[serde(default)]
    pub detail: Map<String, Value>,
}

impl Action {
    pub fn new(id: impl Into<String>, kind: ActionKind, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            title: title.into(),
            detail: Map::new(),
        }
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.detail.insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
#[path = "action_tests.rs"]
mod tests;
