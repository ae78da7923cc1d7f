// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::locks::NoopThreadLocks;
use std::sync::Arc;
use takopi_core::ResumeToken;
use tokio_util::sync::CancellationToken;

#[derive(Default)]
struct EchoState {
    seen_started: bool,
}

/// A minimal spec whose "CLI" is `/bin/echo`, used to exercise the driver's
/// plumbing without depending on any real engine binary.
struct EchoSpec;

impl JsonlEngineSpec for EchoSpec {
    type State = EchoState;
    type Decoded = serde_json::Value;

    fn engine(&self) -> EngineId {
        EngineId::new("echo")
    }

    fn command(&self) -> String {
        "printf".to_string()
    }

    fn build_args(
        &self,
        prompt: &str,
        _resume: Option<&ResumeToken>,
        _cwd: &std::path::Path,
        _state: &Self::State,
    ) -> Vec<String> {
        vec![
            "%s\\n".to_string(),
            r#"{"type":"started","resume":"abc"}"#.to_string(),
            format!(r#"{{"type":"done","answer":"{prompt}"}}"#),
        ]
    }

    fn stdin_payload(&self, _prompt: &str, _resume: Option<&ResumeToken>, _state: &Self::State) -> Option<String> {
        None
    }

    fn decode_jsonl(&self, line: &str, _state: &mut Self::State) -> Result<Self::Decoded, DecodeError> {
        serde_json::from_str(line).map_err(|e| DecodeError::new(e.to_string()))
    }

    fn translate(
        &self,
        decoded: Self::Decoded,
        state: &mut Self::State,
        _resume: Option<&ResumeToken>,
        _found_session: Option<&ResumeToken>,
        _cwd: &std::path::Path,
    ) -> Vec<Event> {
        match decoded.get("type").and_then(|v| v.as_str()) {
            Some("started") if !state.seen_started => {
                state.seen_started = true;
                vec![Event::Started {
                    engine: self.engine(),
                    resume: ResumeToken::new(self.engine(), "abc"),
                    title: None,
                    meta: None,
                }]
            }
            Some("done") => vec![Event::Completed {
                engine: self.engine(),
                ok: true,
                answer: decoded
                    .get("answer")
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .to_string(),
                resume: Some(ResumeToken::new(self.engine(), "abc")),
                error: None,
                usage: None,
            }],
            _ => vec![],
        }
    }

    fn format_resume(&self, token: &ResumeToken) -> Result<String, RunnerError> {
        Ok(format!("resume: {}", token.value))
    }

    fn extract_resume(&self, text: &str) -> Option<ResumeToken> {
        text.strip_prefix("resume: ")
            .map(|v| ResumeToken::new(self.engine(), v.trim()))
    }

    fn is_resume_line(&self, line: &str) -> bool {
        line.starts_with("resume: ")
    }
}

fn test_ctx() -> RunContext {
    RunContext {
        cwd: std::env::temp_dir(),
        cancel: CancellationToken::new(),
        locks: Arc::new(NoopThreadLocks),
    }
}

#[tokio::test]
async fn pad_dash_prefixed_prompt() {
    assert_eq!(pad_dash_prefixed("-x"), " -x");
    assert_eq!(pad_dash_prefixed("plain"), "plain");
}

#[tokio::test]
async fn happy_path_emits_started_then_completed() {
    let driver = JsonlDriver::new(EchoSpec);
    let mut rx = driver.run("hello world".to_string(), None, test_ctx()).await;

    let first = rx.recv().await.expect("started event");
    assert!(matches!(first, Event::Started { .. }));

    let second = rx.recv().await.expect("completed event");
    match second {
        Event::Completed { ok, answer, .. } => {
            assert!(ok);
            assert!(answer.contains("hello world"));
        }
        other => panic!("expected Completed, got {other:?}"),
    }

    assert!(rx.recv().await.is_none());
}

#[tokio::test]
async fn spawn_failure_yields_synthetic_completed() {
    struct MissingBinarySpec;

    impl JsonlEngineSpec for MissingBinarySpec {
        type State = ();
        type Decoded = ();

        fn engine(&self) -> EngineId {
            EngineId::new("missing")
        }

        fn command(&self) -> String {
            "takopi-definitely-not-a-real-binary".to_string()
        }

        fn build_args(
            &self,
            _: &str,
            _: Option<&ResumeToken>,
            _: &std::path::Path,
            _: &Self::State,
        ) -> Vec<String> {
            vec![]
        }

        fn stdin_payload(&self, _: &str, _: Option<&ResumeToken>, _: &Self::State) -> Option<String> {
            None
        }

        fn decode_jsonl(&self, _: &str, _: &mut Self::State) -> Result<Self::Decoded, DecodeError> {
            Ok(())
        }

        fn translate(
            &self,
            _: Self::Decoded,
            _: &mut Self::State,
            _: Option<&ResumeToken>,
            _: Option<&ResumeToken>,
            _: &std::path::Path,
        ) -> Vec<Event> {
            vec![]
        }

        fn format_resume(&self, _: &ResumeToken) -> Result<String, RunnerError> {
            unreachable!()
        }

        fn extract_resume(&self, _: &str) -> Option<ResumeToken> {
            None
        }

        fn is_resume_line(&self, _: &str) -> bool {
            false
        }
    }

    let driver = JsonlDriver::new(MissingBinarySpec);
    let mut rx = driver.run("hi".to_string(), None, test_ctx()).await;
    let event = rx.recv().await.expect("synthetic completed");
    match event {
        Event::Completed { ok, error, .. } => {
            assert!(!ok);
            assert!(error.unwrap().contains("failed to spawn"));
        }
        other => panic!("expected Completed, got {other:?}"),
    }
}
