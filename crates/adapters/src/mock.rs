// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `mock` engine: a deterministic, subprocess-free [`Runner`]
//! implementation used by `takopi mock` and by tests that exercise the
//! scheduler/presenter without a real CLI installed.

use crate::resume_regex::{extract_last, verb_regex};
use async_trait::async_trait;
use regex::Regex;
use std::time::Duration;
use takopi_core::{Action, ActionKind, ActionPhase, EngineId, Event, IdGen, ResumeToken, UuidIdGen};
use takopi_runner::{RunContext, Runner, RunnerError, EVENT_CHANNEL_CAPACITY};
use tokio::sync::mpsc;

/// How long the mock run "works" before completing, giving the presenter
/// something to throttle-edit against.
const MOCK_RUN_DELAY: Duration = Duration::from_millis(300);

pub struct MockRunner<G: IdGen = UuidIdGen> {
    id_gen: G,
    resume_re: Regex,
}

impl Default for MockRunner<UuidIdGen> {
    fn default() -> Self {
        Self::new(UuidIdGen)
    }
}

impl<G: IdGen> MockRunner<G> {
    pub fn new(id_gen: G) -> Self {
        Self {
            id_gen,
            resume_re: verb_regex("mock resume"),
        }
    }
}

#[async_trait]
impl<G: IdGen + 'static> Runner for MockRunner<G> {
    fn engine(&self) -> EngineId {
        EngineId::new("mock")
    }

    fn format_resume(&self, token: &ResumeToken) -> Result<String, RunnerError> {
        if token.engine != self.engine() {
            return Err(RunnerError::EngineMismatch {
                expected: self.engine().to_string(),
                actual: token.engine.to_string(),
            });
        }
        Ok(format!("`mock resume {}`", token.value))
    }

    fn extract_resume(&self, text: &str) -> Option<ResumeToken> {
        extract_last(&self.resume_re, text).map(|v| ResumeToken::new(self.engine(), v))
    }

    fn is_resume_line(&self, line: &str) -> bool {
        self.resume_re.is_match(line)
    }

    async fn run(
        &self,
        prompt: String,
        resume: Option<ResumeToken>,
        ctx: RunContext,
    ) -> mpsc::Receiver<Event> {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let engine = self.engine();
        let token = resume.unwrap_or_else(|| ResumeToken::new(engine.clone(), self.id_gen.next()));

        tokio::spawn(async move {
            let _guard = ctx.locks.acquire(&token.thread_key()).await;

            if tx
                .send(Event::Started {
                    engine: engine.clone(),
                    resume: token.clone(),
                    title: Some("mock run".to_string()),
                    meta: None,
                })
                .await
                .is_err()
            {
                return;
            }

            let action_id = "mock-echo";
            let _ = tx
                .send(Event::Action {
                    engine: engine.clone(),
                    action: Action::new(action_id, ActionKind::Command, "echo prompt"),
                    phase: ActionPhase::Started,
                    ok: None,
                    message: None,
                    level: None,
                })
                .await;

            tokio::select! {
                _ = ctx.cancel.cancelled() => {
                    let _ = tx
                        .send(Event::Completed {
                            engine,
                            ok: false,
                            answer: String::new(),
                            resume: Some(token),
                            error: Some("cancelled".to_string()),
                            usage: None,
                        })
                        .await;
                    return;
                }
                _ = tokio::time::sleep(MOCK_RUN_DELAY) => {}
            }

            let _ = tx
                .send(Event::Action {
                    engine: engine.clone(),
                    action: Action::new(action_id, ActionKind::Command, "echo prompt")
                        .with_detail("prompt", prompt.clone()),
                    phase: ActionPhase::Completed,
                    ok: Some(true),
                    message: None,
                    level: None,
                })
                .await;

            let _ = tx
                .send(Event::Completed {
                    engine,
                    ok: true,
                    answer: format!("mock response to: {prompt}"),
                    resume: Some(token),
                    error: None,
                    usage: Some(takopi_core::Usage {
                        input_tokens: prompt.len() as u64,
                        output_tokens: 8,
                    }),
                })
                .await;
        });

        rx
    }
}

#[cfg(test)]
#[path = "mock_tests.rs"]
mod tests;
