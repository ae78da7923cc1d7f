// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The on-disk TOML shape: a default engine id, a per-engine options
//! table, and a per-project table.

use crate::error::ConfigError;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub default_engine: String,
    #[serde(default)]
    pub engines: HashMap<String, EngineConfig>,
    #[serde(default)]
    pub projects: HashMap<String, ProjectConfig>,
}

/// Per-engine overrides. Missing fields fall back to the adapter's own
/// defaults; this table only ever narrows or extends them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub extra_args: Vec<String>,
    #[serde(default)]
    pub allowed_tools: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    pub path: PathBuf,
    #[serde(default)]
    pub worktrees_dir: Option<PathBuf>,
    #[serde(default)]
    pub worktree_base: Option<String>,
    pub chat_id: i64,
    #[serde(default)]
    pub default_engine: Option<String>,
}

impl Config {
    /// Checks invariants `toml`'s own deserialization can't express: no two
    /// projects may route the same Telegram chat to different configs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen: HashMap<i64, &str> = HashMap::new();
        for (alias, project) in &self.projects {
            if let Some(first) = seen.insert(project.chat_id, alias) {
                return Err(ConfigError::DuplicateChatId {
                    chat_id: project.chat_id,
                    first: first.to_string(),
                    second: alias.clone(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "model_tests.rs"]
mod tests;
