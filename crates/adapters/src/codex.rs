// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Codex engine adapter.
//!
//! `codex exec --json` streams one `ConversationEvent` per line; this module
//! mirrors that wire shape and translates it to normalized events.

use crate::path_util::relativize;
use crate::resume_regex::{extract_last, verb_regex};
use regex::Regex;
use serde::Deserialize;
use serde_json::json;
use std::path::Path;
use takopi_core::{Action, ActionKind, ActionPhase, EngineId, Event, ResumeToken, Usage};
use takopi_runner::{DecodeError, JsonlEngineSpec, RunnerError};

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum ConversationEvent {
    #[serde(rename = "session.created")]
    SessionCreated { session_id: String },
    #[serde(rename = "turn.started")]
    TurnStarted {},
    #[serde(rename = "turn.completed")]
    TurnCompleted { usage: CodexUsage },
    #[serde(rename = "item.started")]
    ItemStarted { item: ConversationItem },
    #[serde(rename = "item.updated")]
    ItemUpdated { item: ConversationItem },
    #[serde(rename = "item.completed")]
    ItemCompleted { item: ConversationItem },
    #[serde(rename = "error")]
    Error { message: String },
}

#[derive(Debug, Deserialize, Default)]
struct CodexUsage {
    #[serde(default)]
    input_tokens: u64,
    #[serde(default)]
    output_tokens: u64,
}

#[derive(Debug, Deserialize)]
struct ConversationItem {
    id: String,
    #[serde(flatten)]
    details: ItemDetails,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "item_type", rename_all = "snake_case")]
enum ItemDetails {
    AssistantMessage { text: String },
    Reasoning { text: String },
    CommandExecution {
        command: String,
        #[serde(default)]
        exit_code: Option<i32>,
        #[serde(default)]
        status: CommandStatus,
    },
    FileChange {
        changes: Vec<FileUpdateChange>,
        #[serde(default)]
        status: PatchStatus,
    },
    McpToolCall {
        server: String,
        tool: String,
        #[serde(default)]
        status: McpStatus,
    },
    WebSearch { query: String },
    TodoList { items: Vec<serde_json::Value> },
    Error { message: String },
}

#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(rename_all = "snake_case")]
enum CommandStatus {
    #[default]
    InProgress,
    Completed,
    Failed,
}

#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(rename_all = "snake_case")]
enum PatchStatus {
    #[default]
    InProgress,
    Completed,
    Failed,
}

#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(rename_all = "snake_case")]
enum McpStatus {
    #[default]
    InProgress,
    Completed,
    Failed,
}

#[derive(Debug, Deserialize)]
struct FileUpdateChange {
    path: String,
    #[allow(dead_code)]
    kind: String,
}

#[derive(Default)]
pub struct CodexState {
    last_assistant_text: String,
}

pub struct CodexSpec {
    resume_re: Regex,
}

impl Default for CodexSpec {
    fn default() -> Self {
        Self {
            resume_re: verb_regex("codex resume"),
        }
    }
}

impl JsonlEngineSpec for CodexSpec {
    type State = CodexState;
    type Decoded = ConversationEvent;

    fn engine(&self) -> EngineId {
        EngineId::new("codex")
    }

    fn command(&self) -> String {
        "codex".to_string()
    }

    fn build_args(
        &self,
        _prompt: &str,
        resume: Option<&ResumeToken>,
        _cwd: &Path,
        _state: &Self::State,
    ) -> Vec<String> {
        match resume {
            Some(token) => vec![
                "exec".to_string(),
                "resume".to_string(),
                token.value.clone(),
                "--json".to_string(),
                "--skip-git-repo-check".to_string(),
            ],
            None => vec![
                "exec".to_string(),
                "--json".to_string(),
                "--skip-git-repo-check".to_string(),
            ],
        }
    }

    fn stdin_payload(
        &self,
        prompt: &str,
        _resume: Option<&ResumeToken>,
        _state: &Self::State,
    ) -> Option<String> {
        Some(prompt.to_string())
    }

    fn decode_jsonl(&self, line: &str, _state: &mut Self::State) -> Result<Self::Decoded, DecodeError> {
        serde_json::from_str(line).map_err(|e| DecodeError::new(e.to_string()))
    }

    fn translate(
        &self,
        decoded: Self::Decoded,
        state: &mut Self::State,
        _resume: Option<&ResumeToken>,
        found_session: Option<&ResumeToken>,
        cwd: &Path,
    ) -> Vec<Event> {
        let engine = self.engine();
        match decoded {
            ConversationEvent::SessionCreated { session_id } => vec![Event::Started {
                engine: engine.clone(),
                resume: ResumeToken::new(engine, session_id),
                title: None,
                meta: None,
            }],
            ConversationEvent::TurnStarted {} => vec![],
            ConversationEvent::TurnCompleted { usage } => vec![Event::Completed {
                engine,
                ok: true,
                answer: state.last_assistant_text.clone(),
                resume: found_session.cloned(),
                error: None,
                usage: Some(Usage {
                    input_tokens: usage.input_tokens,
                    output_tokens: usage.output_tokens,
                }),
            }],
            ConversationEvent::ItemStarted { item } => {
                progress_action(&engine, &item, ActionPhase::Started, cwd)
                    .into_iter()
                    .collect()
            }
            ConversationEvent::ItemUpdated { item } => {
                progress_action(&engine, &item, ActionPhase::Updated, cwd)
                    .into_iter()
                    .collect()
            }
            ConversationEvent::ItemCompleted { item } => {
                completed_action(&engine, item, state, cwd).into_iter().collect()
            }
            ConversationEvent::Error { message } => vec![Event::Completed {
                engine,
                ok: false,
                answer: state.last_assistant_text.clone(),
                resume: found_session.cloned(),
                error: Some(message),
                usage: None,
            }],
        }
    }

    fn format_resume(&self, token: &ResumeToken) -> Result<String, RunnerError> {
        if token.engine != self.engine() {
            return Err(RunnerError::EngineMismatch {
                expected: self.engine().to_string(),
                actual: token.engine.to_string(),
            });
        }
        Ok(format!("`codex resume {}`", token.value))
    }

    fn extract_resume(&self, text: &str) -> Option<ResumeToken> {
        extract_last(&self.resume_re, text).map(|v| ResumeToken::new(self.engine(), v))
    }

    fn is_resume_line(&self, line: &str) -> bool {
        self.resume_re.is_match(line)
    }
}

fn progress_action(
    engine: &EngineId,
    item: &ConversationItem,
    phase: ActionPhase,
    cwd: &Path,
) -> Option<Event> {
    let (kind, title) = match &item.details {
        ItemDetails::CommandExecution { command, .. } => {
            (ActionKind::Command, relativize(command, cwd))
        }
        ItemDetails::FileChange { changes, .. } => (
            ActionKind::FileChange,
            changes
                .iter()
                .map(|c| relativize(&c.path, cwd))
                .collect::<Vec<_>>()
                .join(", "),
        ),
        ItemDetails::McpToolCall { server, tool, .. } => {
            (ActionKind::Tool, format!("{server}/{tool}"))
        }
        ItemDetails::WebSearch { query } => (ActionKind::WebSearch, query.clone()),
        ItemDetails::TodoList { .. } => (ActionKind::Note, "todo list".to_string()),
        ItemDetails::Error { message } => {
            return Some(Event::Action {
                engine: engine.clone(),
                action: Action::new(item.id.clone(), ActionKind::Warning, message.clone()),
                phase: ActionPhase::Completed,
                ok: Some(false),
                message: Some(message.clone()),
                level: Some(takopi_core::Level::Warning),
            })
        }
        ItemDetails::AssistantMessage { .. } | ItemDetails::Reasoning { .. } => return None,
    };
    Some(Event::Action {
        engine: engine.clone(),
        action: Action::new(item.id.clone(), kind, title),
        phase,
        ok: None,
        message: None,
        level: None,
    })
}

fn completed_action(
    engine: &EngineId,
    item: ConversationItem,
    state: &mut CodexState,
    cwd: &Path,
) -> Option<Event> {
    match item.details {
        ItemDetails::AssistantMessage { text } => {
            state.last_assistant_text = text;
            None
        }
        ItemDetails::Reasoning { .. } => None,
        ItemDetails::CommandExecution {
            command,
            exit_code,
            status,
        } => Some(Event::Action {
            engine: engine.clone(),
            action: Action::new(item.id, ActionKind::Command, relativize(&command, cwd))
                .with_detail("exit_code", json!(exit_code)),
            phase: ActionPhase::Completed,
            ok: Some(status == CommandStatus::Completed),
            message: None,
            level: None,
        }),
        ItemDetails::FileChange { changes, status } => Some(Event::Action {
            engine: engine.clone(),
            action: Action::new(
                item.id,
                ActionKind::FileChange,
                changes
                    .iter()
                    .map(|c| relativize(&c.path, cwd))
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
            phase: ActionPhase::Completed,
            ok: Some(status == PatchStatus::Completed),
            message: None,
            level: None,
        }),
        ItemDetails::McpToolCall {
            server,
            tool,
            status,
        } => Some(Event::Action {
            engine: engine.clone(),
            action: Action::new(item.id, ActionKind::Tool, format!("{server}/{tool}")),
            phase: ActionPhase::Completed,
            ok: Some(status == McpStatus::Completed),
            message: None,
            level: None,
        }),
        ItemDetails::WebSearch { query } => Some(Event::Action {
            engine: engine.clone(),
            action: Action::new(item.id, ActionKind::WebSearch, query),
            phase: ActionPhase::Completed,
            ok: Some(true),
            message: None,
            level: None,
        }),
        ItemDetails::TodoList { .. } => Some(Event::Action {
            engine: engine.clone(),
            action: Action::new(item.id, ActionKind::Note, "todo list"),
            phase: ActionPhase::Completed,
            ok: Some(true),
            message: None,
            level: None,
        }),
        ItemDetails::Error { message } => Some(Event::Action {
            engine: engine.clone(),
            action: Action::new(item.id, ActionKind::Warning, message.clone()),
            phase: ActionPhase::Completed,
            ok: Some(false),
            message: Some(message),
            level: Some(takopi_core::Level::Warning),
        }),
    }
}

#[cfg(test)]
#[path = "codex_tests.rs"]
mod tests;
