// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The resolved unit of work a [`Router`](crate::Router) hands the
//! scheduler.

use takopi_core::{ChatRef, EngineId, ResumeToken};

/// A single prompt routed to a specific engine, with whatever project and
/// branch context it carries and a resume token if one was found.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub adapter: EngineId,
    pub prompt: String,
    pub resume: Option<ResumeToken>,
    pub project_ctx: Option<String>,
    pub branch_ctx: Option<String>,
    pub chat_ref: ChatRef,
}
