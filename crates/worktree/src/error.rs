// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorktreeError {
    #[error("branch name escapes the worktrees root: {0:?}")]
    IllegalBranch(String),

    #[error("base branch {0:?} does not exist in the project repository")]
    MissingBaseBranch(String),

    #[error("git worktree command failed: {0}")]
    GitFailed(String),

    #[error("io error: {0}")]
    Io(String),
}

impl From<std::io::Error> for WorktreeError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
