// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine a config directory for this platform")]
    NoConfigDir,

    #[error("failed to read config file {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("failed to parse config file {0}: {1}")]
    Toml(PathBuf, #[source] toml::de::Error),

    #[error("chat_id {chat_id} is used by both project {first:?} and project {second:?}")]
    DuplicateChatId { chat_id: i64, first: String, second: String },
}
