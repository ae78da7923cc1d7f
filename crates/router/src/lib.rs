// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! takopi-router: turns a normalized incoming chat message into a [`Job`],
//! resolving the `/engine`, `/project`, and `@branch` directives, the
//! `ctx:` footer on a reply, and the resume line (if any).

mod directive;
mod error;
mod job;
mod message;

pub use error::RouterError;
pub use job::Job;
pub use message::IncomingMessage;

use directive::{find_ctx_footer, first_non_empty_line, parse_directives, strip_directives};
use std::collections::HashSet;
use std::sync::Arc;
use takopi_core::{ChatRef, EngineId, ResumeToken};
use takopi_runner::Runner;

/// Parses directives and resolves the engine for incoming messages,
/// given the adapter registry (in configured order) and the set of
/// known project aliases.
pub struct Router {
    registry: Vec<Arc<dyn Runner>>,
    known_projects: HashSet<String>,
    default_engine: EngineId,
}

impl Router {
    pub fn new(
        registry: Vec<Arc<dyn Runner>>,
        known_projects: HashSet<String>,
        default_engine: EngineId,
    ) -> Self {
        Self {
            registry,
            known_projects,
            default_engine,
        }
    }

    fn known_engines(&self) -> HashSet<String> {
        self.registry.iter().map(|r| r.engine().to_string()).collect()
    }

    fn resolve_engine(&self, id: &str) -> Option<EngineId> {
        self.registry
            .iter()
            .map(|r| r.engine())
            .find(|e| e.as_str() == id)
    }

    /// First non-null `extract_resume` across the registry, in order.
    fn extract_resume(&self, text: &str) -> Option<ResumeToken> {
        self.registry.iter().find_map(|r| r.extract_resume(text))
    }

    fn validate_branch(branch: &str) -> Result<(), RouterError> {
        if branch.starts_with('/') || branch.split('/').any(|segment| segment == "..") {
            return Err(RouterError::IllegalBranch {
                branch: branch.to_string(),
            });
        }
        Ok(())
    }

    pub fn route(&self, msg: &IncomingMessage) -> Result<Job, RouterError> {
        let chat_ref = ChatRef {
            chat_id: msg.chat_id,
            message_id: msg.message_id,
            reply_to_id: msg.reply_to_id,
            topic_id: msg.topic_id,
        };

        let ctx_footer = msg.reply_text.as_deref().and_then(find_ctx_footer);

        let (directive_engine, project_ctx, branch_ctx, prompt) = match ctx_footer {
            Some((project, branch)) => {
                if !self.known_projects.contains(&project) {
                    return Err(RouterError::UnknownEngineOrProject { token: project });
                }
                if let Some(branch) = &branch {
                    Self::validate_branch(branch)?;
                }
                (None, Some(project), branch, msg.text.trim().to_string())
            }
            None => {
                let (first_line, offset) = first_non_empty_line(&msg.text);
                let parsed = parse_directives(first_line, &self.known_engines(), &self.known_projects)?;
                if let Some(branch) = &parsed.branch {
                    Self::validate_branch(branch)?;
                }
                let stripped = strip_directives(&msg.text[offset..], first_line, parsed.consumed_tokens);
                (parsed.engine, parsed.project, parsed.branch, stripped)
            }
        };

        Ok(self.finish(
            directive_engine,
            project_ctx,
            branch_ctx,
            prompt,
            &msg.text,
            msg.reply_text.as_deref(),
            chat_ref,
        ))
    }

    fn finish(
        &self,
        directive_engine: Option<String>,
        project_ctx: Option<String>,
        branch_ctx: Option<String>,
        prompt: String,
        text: &str,
        reply_text: Option<&str>,
        chat_ref: ChatRef,
    ) -> Job {
        let resume = self
            .extract_resume(text)
            .or_else(|| reply_text.and_then(|t| self.extract_resume(t)));

        let adapter = match &resume {
            Some(token) => token.engine.clone(),
            None => directive_engine
                .as_deref()
                .and_then(|id| self.resolve_engine(id))
                .unwrap_or_else(|| self.default_engine.clone()),
        };

        Job {
            adapter,
            prompt,
            resume,
            project_ctx,
            branch_ctx,
            chat_ref,
        }
    }
}

#[cfg(test)]
#[path = "router_tests.rs"]
mod tests;
