// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use async_trait::async_trait;
use std::sync::Arc;
use takopi_core::{Action, ActionKind, ActionPhase, EngineId, Event, ResumeToken, SystemClock};
use takopi_runner::{RunContext, RunnerError};
use takopi_scheduler::RunSink;
use tokio::sync::mpsc;

struct StubRunner;

#[async_trait]
impl Runner for StubRunner {
    fn engine(&self) -> EngineId {
        EngineId::new("codex")
    }

    fn format_resume(&self, token: &ResumeToken) -> Result<String, RunnerError> {
        Ok(format!("`codex resume {}`", token.value))
    }

    fn extract_resume(&self, _text: &str) -> Option<ResumeToken> {
        None
    }

    fn is_resume_line(&self, line: &str) -> bool {
        line.starts_with('`')
    }

    async fn run(&self, _prompt: String, _resume: Option<ResumeToken>, _ctx: RunContext) -> mpsc::Receiver<Event> {
        let (_tx, rx) = mpsc::channel(1);
        rx
    }
}

struct RecordingSink {
    edits: parking_lot::Mutex<Vec<String>>,
    finals: parking_lot::Mutex<Vec<String>>,
}

impl RecordingSink {
    fn new() -> Self {
        Self {
            edits: parking_lot::Mutex::new(Vec::new()),
            finals: parking_lot::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ProgressSink for RecordingSink {
    async fn edit(&self, rendered: &str) {
        self.edits.lock().push(rendered.to_string());
    }

    async fn finalize(&self, rendered: &str) {
        self.finals.lock().push(rendered.to_string());
    }
}

fn token() -> ResumeToken {
    ResumeToken::new(EngineId::new("codex"), "U")
}

#[tokio::test]
async fn started_and_action_events_produce_a_throttled_edit() {
    let sink = Arc::new(RecordingSink::new());
    let presenter = Presenter::spawn(Arc::new(StubRunner), sink.clone(), None, Arc::new(SystemClock)).unwrap();

    presenter
        .on_event(Event::Started {
            engine: EngineId::new("codex"),
            resume: token(),
            title: Some("refactor this".to_string()),
            meta: None,
        })
        .await;
    presenter
        .on_event(Event::Action {
            engine: EngineId::new("codex"),
            action: Action::new("a1", ActionKind::Command, "pytest"),
            phase: ActionPhase::Started,
            ok: None,
            message: None,
            level: None,
        })
        .await;

    tokio::time::sleep(std::time::Duration::from_millis(1200)).await;

    let edits = sink.edits.lock();
    assert!(!edits.is_empty());
    let last = edits.last().unwrap();
    assert!(last.contains("pytest"));
    assert!(last.contains("`codex resume U`"));
}

#[tokio::test]
async fn identical_renders_are_not_re_sent() {
    let sink = Arc::new(RecordingSink::new());
    let presenter = Presenter::spawn(Arc::new(StubRunner), sink.clone(), None, Arc::new(SystemClock)).unwrap();

    let action_event = || Event::Action {
        engine: EngineId::new("codex"),
        action: Action::new("a1", ActionKind::Command, "pytest"),
        phase: ActionPhase::Started,
        ok: None,
        message: None,
        level: None,
    };

    presenter.on_event(action_event()).await;
    tokio::time::sleep(std::time::Duration::from_millis(1200)).await;
    let after_first = sink.edits.lock().len();
    assert_eq!(after_first, 1);

    presenter.on_event(action_event()).await;
    tokio::time::sleep(std::time::Duration::from_millis(1200)).await;

    assert_eq!(sink.edits.lock().len(), 1, "an identical render must not trigger a second edit");
}

#[tokio::test]
async fn completed_event_finalizes_and_stops_progress_edits() {
    let sink = Arc::new(RecordingSink::new());
    let presenter = Presenter::spawn(Arc::new(StubRunner), sink.clone(), None, Arc::new(SystemClock)).unwrap();

    presenter
        .on_event(Event::Started {
            engine: EngineId::new("codex"),
            resume: token(),
            title: None,
            meta: None,
        })
        .await;
    presenter
        .on_event(Event::Completed {
            engine: EngineId::new("codex"),
            ok: true,
            answer: "Done.".to_string(),
            resume: Some(token()),
            error: None,
            usage: None,
        })
        .await;

    tokio::time::sleep(std::time::Duration::from_millis(300)).await;

    let finals = sink.finals.lock();
    assert_eq!(finals.len(), 1);
    assert!(finals[0].starts_with("done"));
    assert!(finals[0].contains("Done."));
    assert!(finals[0].contains("`codex resume U`"));
}

#[tokio::test]
async fn spawn_rejects_a_multiline_ctx_footer() {
    let sink = Arc::new(RecordingSink::new());
    let err = Presenter::spawn(
        Arc::new(StubRunner),
        sink,
        Some("ctx: my-app\n@ main".to_string()),
        Arc::new(SystemClock),
    )
    .unwrap_err();

    assert!(matches!(err, PresenterError::InvalidCtxFooter(_)));
}
