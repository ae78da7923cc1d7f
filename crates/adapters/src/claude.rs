// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Claude Code engine adapter.
//!
//! `claude -p --output-format stream-json` emits one JSON object per line:
//! a `system`/`init` record carrying the session id, `assistant` records
//! whose `message.content` blocks include tool uses, and a terminal
//! `result` record. Parsed as raw [`serde_json::Value`], the same way the
//! session-log tailer reads Claude's own transcript format.

use crate::path_util::relativize;
use crate::resume_regex::{extract_last, verb_regex};
use regex::Regex;
use serde_json::Value;
use std::path::Path;
use takopi_core::{Action, ActionKind, ActionPhase, EngineId, Event, Level, ResumeToken, Usage};
use takopi_runner::{DecodeError, JsonlEngineSpec, RunnerError};

fn get_str<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(|v| v.as_str())
}

#[derive(Default)]
pub struct ClaudeState {
    started: bool,
    last_assistant_text: String,
}

pub struct ClaudeSpec {
    resume_re: Regex,
}

impl Default for ClaudeSpec {
    fn default() -> Self {
        Self {
            resume_re: verb_regex("claude --resume"),
        }
    }
}

impl JsonlEngineSpec for ClaudeSpec {
    type State = ClaudeState;
    type Decoded = Value;

    fn engine(&self) -> EngineId {
        EngineId::new("claude")
    }

    fn command(&self) -> String {
        "claude".to_string()
    }

    fn build_args(
        &self,
        _prompt: &str,
        resume: Option<&ResumeToken>,
        _cwd: &Path,
        _state: &Self::State,
    ) -> Vec<String> {
        let mut args = vec![
            "-p".to_string(),
            "--output-format".to_string(),
            "stream-json".to_string(),
            "--verbose".to_string(),
        ];
        if let Some(token) = resume {
            args.push("--resume".to_string());
            args.push(token.value.clone());
        }
        args
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
        let record_type = get_str(&decoded, "type").unwrap_or_default();

        if record_type == "system" {
            if state.started {
                return vec![];
            }
            let Some(session_id) = get_str(&decoded, "session_id") else {
                return vec![];
            };
            state.started = true;
            return vec![Event::Started {
                engine: engine.clone(),
                resume: ResumeToken::new(engine, session_id),
                title: None,
                meta: None,
            }];
        }

        if record_type == "assistant" {
            return translate_assistant(&engine, &decoded, state, cwd);
        }

        if record_type == "user" {
            return translate_tool_errors(&engine, &decoded);
        }

        if record_type == "result" {
            let subtype = get_str(&decoded, "subtype").unwrap_or_default();
            let ok = subtype == "success";
            let resume = found_session.cloned().or_else(|| {
                get_str(&decoded, "session_id").map(|id| ResumeToken::new(engine.clone(), id))
            });
            let usage = decoded.get("usage").map(|u| Usage {
                input_tokens: u.get("input_tokens").and_then(|v| v.as_u64()).unwrap_or(0),
                output_tokens: u.get("output_tokens").and_then(|v| v.as_u64()).unwrap_or(0),
            });
            let answer = if ok {
                if !state.last_assistant_text.is_empty() {
                    state.last_assistant_text.clone()
                } else {
                    get_str(&decoded, "result").unwrap_or_default().to_string()
                }
            } else {
                state.last_assistant_text.clone()
            };
            return vec![Event::Completed {
                engine,
                ok,
                answer,
                resume,
                error: if ok {
                    None
                } else {
                    Some(
                        get_str(&decoded, "result")
                            .unwrap_or("run failed")
                            .to_string(),
                    )
                },
                usage,
            }];
        }

        vec![]
    }

    fn format_resume(&self, token: &ResumeToken) -> Result<String, RunnerError> {
        if token.engine != self.engine() {
            return Err(RunnerError::EngineMismatch {
                expected: self.engine().to_string(),
                actual: token.engine.to_string(),
            });
        }
        Ok(format!("`claude --resume {}`", token.value))
    }

    fn extract_resume(&self, text: &str) -> Option<ResumeToken> {
        extract_last(&self.resume_re, text).map(|v| ResumeToken::new(self.engine(), v))
    }

    fn is_resume_line(&self, line: &str) -> bool {
        self.resume_re.is_match(line)
    }
}

fn translate_assistant(
    engine: &EngineId,
    decoded: &Value,
    state: &mut ClaudeState,
    cwd: &Path,
) -> Vec<Event> {
    let mut events = Vec::new();
    let Some(message) = decoded.get("message") else {
        return events;
    };

    if let Some(content) = message.get("content").and_then(|c| c.as_array()) {
        for (idx, block) in content.iter().enumerate() {
            match get_str(block, "type") {
                Some("text") => {
                    if let Some(text) = get_str(block, "text") {
                        state.last_assistant_text = text.to_string();
                    }
                }
                Some("tool_use") => {
                    if let Some(event) = translate_tool_use(engine, block, idx, cwd) {
                        events.push(event);
                    }
                }
                _ => {}
            }
        }
    }

    events
}

fn translate_tool_use(engine: &EngineId, block: &Value, idx: usize, cwd: &Path) -> Option<Event> {
    let name = get_str(block, "name")?;
    let input = block.get("input").cloned().unwrap_or(Value::Null);
    let id = get_str(block, "id")
        .map(String::from)
        .unwrap_or_else(|| format!("tool-{idx}"));

    let (kind, title) = match name {
        "Read" => {
            let path = get_str(&input, "file_path")?;
            (ActionKind::Tool, relativize(path, cwd))
        }
        "Edit" | "NotebookEdit" => {
            let key = if name == "NotebookEdit" {
                "notebook_path"
            } else {
                "file_path"
            };
            let path = get_str(&input, key)?;
            (ActionKind::FileChange, relativize(path, cwd))
        }
        "Write" => {
            let path = get_str(&input, "file_path")?;
            (ActionKind::FileChange, relativize(path, cwd))
        }
        "Bash" => {
            let command = get_str(&input, "command").unwrap_or_default();
            (ActionKind::Command, command.to_string())
        }
        "WebSearch" | "WebFetch" => {
            let query = get_str(&input, "query")
                .or_else(|| get_str(&input, "url"))
                .unwrap_or_default();
            (ActionKind::WebSearch, query.to_string())
        }
        "Task" => {
            let description = get_str(&input, "description").unwrap_or(name);
            (ActionKind::Subagent, description.to_string())
        }
        _ => (ActionKind::Tool, name.to_string()),
    };

    Some(Event::Action {
        engine: engine.clone(),
        action: Action::new(id, kind, title),
        phase: ActionPhase::Completed,
        ok: Some(true),
        message: None,
        level: None,
    })
}

/// `tool_result` blocks with `is_error: true` surface as warning actions,
/// keyed by the tool-use id they answer.
fn translate_tool_errors(engine: &EngineId, decoded: &Value) -> Vec<Event> {
    let Some(content) = decoded
        .get("message")
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_array())
    else {
        return vec![];
    };

    content
        .iter()
        .filter(|block| get_str(block, "type") == Some("tool_result"))
        .filter(|block| block.get("is_error").and_then(|v| v.as_bool()).unwrap_or(false))
        .map(|block| {
            let id = get_str(block, "tool_use_id")
                .map(String::from)
                .unwrap_or_else(|| "tool-error".to_string());
            let message = block
                .get("content")
                .and_then(|c| c.as_str().map(String::from).or_else(|| {
                    c.as_array()?.first().and_then(|b| get_str(b, "text")).map(String::from)
                }))
                .unwrap_or_else(|| "tool call failed".to_string());
            warn(engine, id, message)
        })
        .collect()
}

fn warn(engine: &EngineId, id: impl Into<String>, message: impl Into<String>) -> Event {
    let message = message.into();
    Event::Action {
        engine: engine.clone(),
        action: Action::new(id, ActionKind::Warning, message.clone()),
        phase: ActionPhase::Completed,
        ok: Some(false),
        message: Some(message),
        level: Some(Level::Warning),
    }
}

#[cfg(test)]
#[path = "claude_tests.rs"]
mod tests;
