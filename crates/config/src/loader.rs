// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resolves the config file path and loads+validates the table it holds.

use crate::error::ConfigError;
use crate::model::Config;
use std::path::{Path, PathBuf};

/// `TAKOPI_CONFIG` takes priority (also used by tests for isolation);
/// otherwise `$XDG_CONFIG_HOME/takopi/config.toml` or
/// `~/.config/takopi/config.toml`.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    if let Ok(path) = std::env::var("TAKOPI_CONFIG") {
        return Ok(PathBuf::from(path));
    }
    dirs::config_dir()
        .map(|dir| dir.join("takopi").join("config.toml"))
        .ok_or(ConfigError::NoConfigDir)
}

impl Config {
    /// Loads from the resolved default path (see [`config_path`]).
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_path()?)
    }

    /// Loads and validates a specific config file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        let config: Config =
            toml::from_str(&text).map_err(|e| ConfigError::Toml(path.to_path_buf(), e))?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
