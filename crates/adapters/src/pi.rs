// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pi engine adapter.
//!
//! `pi --json` emits one record per line tagged by `event` rather than
//! `type` — a deliberately different wire shape from the other adapters,
//! proving the JSONL driver is agnostic to the tagging convention an
//! engine happens to use.

use crate::resume_regex::{extract_last, verb_regex};
use regex::Regex;
use serde::Deserialize;
use std::path::Path;
use takopi_core::{Action, ActionKind, ActionPhase, EngineId, Event, ResumeToken, Usage};
use takopi_runner::{DecodeError, JsonlEngineSpec, RunnerError};

#[derive(Debug, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum PiEvent {
    SessionStart {
        session: String,
    },
    ToolCall {
        id: String,
        tool: String,
        running: bool,
        #[serde(default)]
        ok: Option<bool>,
        #[serde(default)]
        summary: Option<String>,
    },
    Message {
        text: String,
    },
    Done {
        #[serde(default)]
        summary: Option<String>,
        #[serde(default)]
        usage: Option<PiUsage>,
    },
    Error {
        reason: String,
    },
}

#[derive(Debug, Deserialize, Default)]
struct PiUsage {
    #[serde(default)]
    input_tokens: u64,
    #[serde(default)]
    output_tokens: u64,
}

#[derive(Default)]
pub struct PiState {
    last_message: String,
}

pub struct PiSpec {
    resume_re: Regex,
}

impl Default for PiSpec {
    fn default() -> Self {
        Self {
            resume_re: verb_regex("pi --session"),
        }
    }
}

impl JsonlEngineSpec for PiSpec {
    type State = PiState;
    type Decoded = PiEvent;

    fn engine(&self) -> EngineId {
        EngineId::new("pi")
    }

    fn command(&self) -> String {
        "pi".to_string()
    }

    fn build_args(
        &self,
        _prompt: &str,
        resume: Option<&ResumeToken>,
        _cwd: &Path,
        _state: &Self::State,
    ) -> Vec<String> {
        let mut args = vec!["--json".to_string()];
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
        _cwd: &Path,
    ) -> Vec<Event> {
        let engine = self.engine();
        match decoded {
            PiEvent::SessionStart { session } => vec![Event::Started {
                engine: engine.clone(),
                resume: ResumeToken::new(engine, session),
                title: None,
                meta: None,
            }],
            PiEvent::ToolCall {
                id,
                tool,
                running,
                ok,
                summary,
            } => {
                let title = summary.unwrap_or(tool);
                vec![Event::Action {
                    engine,
                    action: Action::new(id, ActionKind::Tool, title),
                    phase: if running {
                        ActionPhase::Started
                    } else {
                        ActionPhase::Completed
                    },
                    ok,
                    message: None,
                    level: None,
                }]
            }
            PiEvent::Message { text } => {
                state.last_message = text;
                vec![]
            }
            PiEvent::Done { summary, usage } => vec![Event::Completed {
                engine,
                ok: true,
                answer: summary.unwrap_or_else(|| state.last_message.clone()),
                resume: found_session.cloned(),
                error: None,
                usage: usage.map(|u| Usage {
                    input_tokens: u.input_tokens,
                    output_tokens: u.output_tokens,
                }),
            }],
            PiEvent::Error { reason } => vec![Event::Completed {
                engine,
                ok: false,
                answer: state.last_message.clone(),
                resume: found_session.cloned(),
                error: Some(reason),
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
        Ok(format!("`pi --session {}`", token.value))
    }

    fn extract_resume(&self, text: &str) -> Option<ResumeToken> {
        extract_last(&self.resume_re, text).map(|v| ResumeToken::new(self.engine(), v))
    }

    fn is_resume_line(&self, line: &str) -> bool {
        self.resume_re.is_match(line)
    }
}

#[cfg(test)]
#[path = "pi_tests.rs"]
mod tests;
