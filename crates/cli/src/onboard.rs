// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `--onboard`: writes a starter config file if none exists yet.

use std::path::{Path, PathBuf};

const STARTER_CONFIG: &str = r#"default_engine = "codex"

[projects.demo]
path = "/path/to/your/repo"
chat_id = 0
"#;

/// Returns the path written, or the existing path if a config is already
/// there (in which case nothing is touched).
pub fn run() -> std::io::Result<PathBuf> {
    let path = takopi_config::config_path().map_err(std::io::Error::other)?;
    write_starter(&path)?;
    Ok(path)
}

fn write_starter(path: &Path) -> std::io::Result<()> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, STARTER_CONFIG)
}

#[cfg(test)]
#[path = "onboard_tests.rs"]
mod tests;
