// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::action::{Action, ActionKind};

fn token() -> ResumeToken {
    ResumeToken::new(EngineId::new("codex"), "abc")
}

#[test]
fn started_round_trips_through_json() {
    let event = Event::Started {
        engine: EngineId::new("codex"),
        resume: token(),
        title: Some("refactor this".to_string()),
        meta: None,
    };
    let json = serde_json::to_string(&event).unwrap();
    assert!(json.contains("\"type\":\"started\""));
    let back: Event = serde_json::from_str(&json).unwrap();
    assert_eq!(back, event);
}

#[test]
fn completed_without_resume_round_trips() {
    let event = Event::Completed {
        engine: EngineId::new("codex"),
        ok: false,
        answer: String::new(),
        resume: None,
        error: Some("spawn failed".to_string()),
        usage: None,
    };
    let json = serde_json::to_string(&event).unwrap();
    let back: Event = serde_json::from_str(&json).unwrap();
    assert_eq!(back, event);
}

#[test]
fn engine_accessor_covers_every_variant() {
    let engine = EngineId::new("pi");
    let action = Event::Action {
        engine: engine.clone(),
        action: Action::new("a1", ActionKind::Command, "ls"),
        phase: ActionPhase::Started,
        ok: None,
        message: None,
        level: None,
    };
    assert_eq!(action.engine(), &engine);
    assert!(!action.is_started());
    assert!(!action.is_completed());
}

#[test]
fn is_started_and_is_completed_discriminate_variants() {
    let started = Event::Started {
        engine: EngineId::new("codex"),
        resume: token(),
        title: None,
        meta: None,
    };
    assert!(started.is_started());
    assert!(!started.is_completed());

    let completed = Event::Completed {
        engine: EngineId::new("codex"),
        ok: true,
        answer: "done".to_string(),
        resume: Some(token()),
        error: None,
        usage: None,
    };
    assert!(completed.is_completed());
}
