// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! OpenCode engine adapter.
//!
//! `opencode run --print-logs --format json` emits one record per line,
//! tagged by `type`: `session`, `tool`, `message`, `done`.

use crate::path_util::relativize;
use crate::resume_regex::{extract_last, verb_regex};
use regex::Regex;
use serde::Deserialize;
use std::path::Path;
use takopi_core::{Action, ActionKind, ActionPhase, EngineId, Event, ResumeToken, Usage};
use takopi_runner::{DecodeError, JsonlEngineSpec, RunnerError};

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum OpencodeEvent {
    Session {
        id: String,
    },
    Tool {
        id: String,
        name: String,
        #[serde(default)]
        target: Option<String>,
        status: ToolStatus,
        #[serde(default)]
        ok: Option<bool>,
    },
    Message {
        text: String,
    },
    Done {
        #[serde(default)]
        usage: Option<OpencodeUsage>,
    },
    Fatal {
        message: String,
    },
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
enum ToolStatus {
    Start,
    End,
}

#[derive(Debug, Deserialize, Default)]
struct OpencodeUsage {
    #[serde(default)]
    input_tokens: u64,
    #[serde(default)]
    output_tokens: u64,
}

#[derive(Default)]
pub struct OpencodeState {
    last_message: String,
}

pub struct OpencodeSpec {
    resume_re: Regex,
}

impl Default for OpencodeSpec {
    fn default() -> Self {
        Self {
            resume_re: verb_regex("opencode --session"),
        }
    }
}

impl JsonlEngineSpec for OpencodeSpec {
    type State = OpencodeState;
    type Decoded = OpencodeEvent;

    fn engine(&self) -> EngineId {
        EngineId::new("opencode")
    }

    fn command(&self) -> String {
        "opencode".to_string()
    }

    fn build_args(
        &self,
        _prompt: &str,
        resume: Option<&ResumeToken>,
        _cwd: &Path,
        _state: &Self::State,
    ) -> Vec<String> {
        let mut args = vec![
            "run".to_string(),
            "--print-logs".to_string(),
            "--format".to_string(),
            "json".to_string(),
        ];
        if let Some(token) = resume {
            args.push("--session".to_string());
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
        match decoded {
            OpencodeEvent::Session { id } => vec![Event::Started {
                engine: engine.clone(),
                resume: ResumeToken::new(engine, id),
                title: None,
                meta: None,
            }],
            OpencodeEvent::Tool {
                id,
                name,
                target,
                status,
                ok,
            } => {
                let title = target
                    .as_deref()
                    .map(|t| relativize(t, cwd))
                    .unwrap_or_else(|| name.clone());
                let kind = match name.as_str() {
                    "bash" | "shell" => ActionKind::Command,
                    "edit" | "write" | "patch" => ActionKind::FileChange,
                    "search" | "web_search" => ActionKind::WebSearch,
                    _ => ActionKind::Tool,
                };
                let phase = match status {
                    ToolStatus::Start => ActionPhase::Started,
                    ToolStatus::End => ActionPhase::Completed,
                };
                vec![Event::Action {
                    engine,
                    action: Action::new(id, kind, title),
                    phase,
                    ok,
                    message: None,
                    level: None,
                }]
            }
            OpencodeEvent::Message { text } => {
                state.last_message = text;
                vec![]
            }
            OpencodeEvent::Done { usage } => vec![Event::Completed {
                engine,
                ok: true,
                answer: state.last_message.clone(),
                resume: found_session.cloned(),
                error: None,
                usage: usage.map(|u| Usage {
                    input_tokens: u.input_tokens,
                    output_tokens: u.output_tokens,
                }),
            }],
            OpencodeEvent::Fatal { message } => vec![Event::Completed {
                engine,
                ok: false,
                answer: state.last_message.clone(),
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
        Ok(format!("`opencode --session {}`", token.value))
    }

    fn extract_resume(&self, text: &str) -> Option<ResumeToken> {
        extract_last(&self.resume_re, text).map(|v| ResumeToken::new(self.engine(), v))
    }

    fn is_resume_line(&self, line: &str) -> bool {
        self.resume_re.is_match(line)
    }
}

#[cfg(test)]
#[path = "opencode_tests.rs"]
mod tests;
