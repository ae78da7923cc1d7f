// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use async_trait::async_trait;
use takopi_runner::{RunContext, RunnerError};

/// A `Runner` stub whose only purpose is to hand the router an `EngineId`
/// and a trivial resume regex (`"{engine} resume <id>"`).
struct StubRunner {
    id: &'static str,
}

#[async_trait]
impl Runner for StubRunner {
    fn engine(&self) -> EngineId {
        EngineId::new(self.id)
    }

    fn format_resume(&self, token: &ResumeToken) -> Result<String, RunnerError> {
        Ok(format!("{} resume {}", self.id, token.value))
    }

    fn extract_resume(&self, text: &str) -> Option<ResumeToken> {
        text.lines().find_map(|line| {
            line.strip_prefix(&format!("{} resume ", self.id))
                .map(|value| ResumeToken::new(self.engine(), value.trim()))
        })
    }

    fn is_resume_line(&self, line: &str) -> bool {
        line.starts_with(&format!("{} resume ", self.id))
    }

    async fn run(&self, _: String, _: Option<ResumeToken>, _: RunContext) -> tokio::sync::mpsc::Receiver<takopi_core::Event> {
        unreachable!("router tests never execute a run")
    }
}

fn router() -> Router {
    Router::new(
        vec![Arc::new(StubRunner { id: "codex" }), Arc::new(StubRunner { id: "claude" })],
        ["takopi", "infra"].iter().map(|s| s.to_string()).collect(),
        EngineId::new("codex"),
    )
}

fn msg(text: &str) -> IncomingMessage {
    IncomingMessage {
        text: text.to_string(),
        chat_id: 1,
        sender_id: 2,
        message_id: 3,
        ..Default::default()
    }
}

#[test]
fn defaults_to_configured_engine_with_no_directives() {
    let job = router().route(&msg("fix the bug")).unwrap();
    assert_eq!(job.adapter.as_str(), "codex");
    assert_eq!(job.prompt, "fix the bug");
    assert!(job.resume.is_none());
}

#[test]
fn engine_directive_selects_adapter_and_is_stripped() {
    let job = router().route(&msg("/claude please help")).unwrap();
    assert_eq!(job.adapter.as_str(), "claude");
    assert_eq!(job.prompt, "please help");
}

#[test]
fn project_and_branch_directives_populate_context() {
    let job = router().route(&msg("/infra @release fix deploy")).unwrap();
    assert_eq!(job.project_ctx.as_deref(), Some("infra"));
    assert_eq!(job.branch_ctx.as_deref(), Some("release"));
    assert_eq!(job.prompt, "fix deploy");
}

#[test]
fn resume_line_overrides_engine_directive() {
    let job = router()
        .route(&msg("/claude continuing\nclaude resume abc123"))
        .unwrap();
    assert_eq!(job.adapter.as_str(), "claude");
    assert_eq!(job.resume.as_ref().unwrap().value, "abc123");
}

#[test]
fn resume_from_codex_wins_over_claude_directive() {
    let job = router()
        .route(&msg("/claude continuing\ncodex resume xyz"))
        .unwrap();
    assert_eq!(job.adapter.as_str(), "codex");
    assert_eq!(job.resume.as_ref().unwrap().value, "xyz");
}

#[test]
fn resume_falls_back_to_reply_text() {
    let mut m = msg("keep going");
    m.reply_text = Some("codex resume from-reply".to_string());
    let job = router().route(&m).unwrap();
    assert_eq!(job.resume.as_ref().unwrap().value, "from-reply");
}

#[test]
fn duplicate_engine_directive_errors() {
    let err = router().route(&msg("/codex /claude hi")).unwrap_err();
    assert_eq!(err, RouterError::DuplicateDirective { directive: "engine" });
}

#[test]
fn unknown_project_alias_errors() {
    let err = router().route(&msg("/nope hi")).unwrap_err();
    assert_eq!(err, RouterError::UnknownEngineOrProject { token: "nope".to_string() });
}

#[test]
fn illegal_branch_path_errors() {
    let err = router().route(&msg("/infra @../escape hi")).unwrap_err();
    assert!(matches!(err, RouterError::IllegalBranch { .. }));
}

#[test]
fn ctx_footer_on_reply_adopts_project_and_ignores_text_directives() {
    let mut m = msg("/claude do the thing");
    m.reply_text = Some("some earlier answer\nctx: infra @ main".to_string());
    let job = router().route(&m).unwrap();
    assert_eq!(job.project_ctx.as_deref(), Some("infra"));
    assert_eq!(job.branch_ctx.as_deref(), Some("main"));
    // ctx footer present -> text directives ignored -> default engine used.
    assert_eq!(job.adapter.as_str(), "codex");
    assert_eq!(job.prompt, "/claude do the thing");
}

#[test]
fn ctx_footer_with_unknown_project_errors() {
    let mut m = msg("hi");
    m.reply_text = Some("ctx: nonexistent".to_string());
    let err = router().route(&m).unwrap_err();
    assert_eq!(err, RouterError::UnknownEngineOrProject { token: "nonexistent".to_string() });
}
