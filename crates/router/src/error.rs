// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User-visible routing failures. Every variant maps to a chat reply; none
//! of them produce a [`Job`](crate::Job).

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RouterError {
    #[error("duplicate /{directive} directive")]
    DuplicateDirective { directive: &'static str },

    #[error("unknown engine or project: /{token}")]
    UnknownEngineOrProject { token: String },

    #[error("disallowed branch: {branch}")]
    IllegalBranch { branch: String },
}
