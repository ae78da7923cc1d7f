// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resolves a project alias and optional branch to a working directory,
//! creating or reusing a git worktree as needed.

use crate::error::WorktreeError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Everything `WorktreeResolver` needs from `git`. A test double records
/// calls instead of shelling out.
#[async_trait]
pub trait GitOps: Send + Sync {
    async fn branch_exists(&self, repo: &Path, branch: &str) -> Result<bool, WorktreeError>;

    /// Adds a worktree at `target` for `branch`. When `new_from` is set,
    /// `branch` does not exist yet and is created from that base.
    async fn add_worktree(
        &self,
        repo: &Path,
        target: &Path,
        branch: &str,
        new_from: Option<&str>,
    ) -> Result<(), WorktreeError>;
}

/// `git`-CLI-backed `GitOps`, run via `tokio::process::Command`.
pub struct SystemGit;

#[async_trait]
impl GitOps for SystemGit {
    async fn branch_exists(&self, repo: &Path, branch: &str) -> Result<bool, WorktreeError> {
        let output = tokio::process::Command::new("git")
            .arg("rev-parse")
            .arg("--verify")
            .arg("--quiet")
            .arg(format!("refs/heads/{branch}"))
            .current_dir(repo)
            .output()
            .await?;
        Ok(output.status.success())
    }

    async fn add_worktree(
        &self,
        repo: &Path,
        target: &Path,
        branch: &str,
        new_from: Option<&str>,
    ) -> Result<(), WorktreeError> {
        let mut cmd = tokio::process::Command::new("git");
        cmd.arg("worktree").arg("add");
        match new_from {
            Some(base) => {
                cmd.arg("-b").arg(branch).arg(target).arg(base);
            }
            None => {
                cmd.arg(target).arg(branch);
            }
        }
        let output = cmd.current_dir(repo).output().await?;
        if !output.status.success() {
            return Err(WorktreeError::GitFailed(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }
        Ok(())
    }
}

/// Rejects branch names that could escape the worktrees root: a leading
/// `/` or a `..` path segment anywhere.
pub fn validate_branch(branch: &str) -> Result<(), WorktreeError> {
    if branch.is_empty() || branch.starts_with('/') || branch.split('/').any(|seg| seg == "..") {
        return Err(WorktreeError::IllegalBranch(branch.to_string()));
    }
    Ok(())
}

pub struct WorktreeResolver {
    git: Arc<dyn GitOps>,
}

impl WorktreeResolver {
    pub fn new(git: Arc<dyn GitOps>) -> Self {
        Self { git }
    }

    pub fn system() -> Self {
        Self::new(Arc::new(SystemGit))
    }

    /// With no branch, returns the project's own checkout unchanged. With
    /// a branch, reuses an existing worktree directory or creates one,
    /// branching off `base_branch` if `branch` is new.
    pub async fn resolve(
        &self,
        project_path: &Path,
        worktrees_dir: &Path,
        base_branch: &str,
        branch: Option<&str>,
    ) -> Result<PathBuf, WorktreeError> {
        let Some(branch) = branch else {
            return Ok(project_path.to_path_buf());
        };
        validate_branch(branch)?;

        let target = worktrees_dir.join(branch);
        if target.exists() {
            return Ok(target);
        }

        if !self.git.branch_exists(project_path, base_branch).await? {
            return Err(WorktreeError::MissingBaseBranch(base_branch.to_string()));
        }

        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        if self.git.branch_exists(project_path, branch).await? {
            self.git.add_worktree(project_path, &target, branch, None).await?;
        } else {
            self.git
                .add_worktree(project_path, &target, branch, Some(base_branch))
                .await?;
        }

        tracing::info!(branch, target = %target.display(), "worktree resolved");
        Ok(target)
    }
}

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;
