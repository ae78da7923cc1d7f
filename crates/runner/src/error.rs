// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runner-level errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("resume token belongs to engine {actual}, expected {expected}")]
    EngineMismatch {
        expected: String,
        actual: String,
    },

    #[error("failed to spawn {command}: {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A JSONL line that failed to decode into the adapter's typed shape.
#[derive(Debug, Error, Clone)]
#[error("decode error: {0}")]
pub struct DecodeError(pub String);

impl DecodeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}
