// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resume tokens and the thread keys derived from them.

use crate::id::EngineId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Uniquely names an engine-side conversation ("thread").
///
/// Immutable. Only trusted once the owning adapter has produced it (see
/// invariants in the runner protocol: a `ResumeToken` is learned from the
/// engine, never invented by the router or scheduler).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResumeToken {
    pub engine: EngineId,
    pub value: String,
}

impl ResumeToken {
    pub fn new(engine: EngineId, value: impl Into<String>) -> Self {
        Self {
            engine,
            value: value.into(),
        }
    }

    /// `engine + ":" + value`, used for scheduling and per-thread locking.
    pub fn thread_key(&self) -> ThreadKey {
        ThreadKey::new(self.engine.clone(), &self.value)
    }
}

impl fmt::Display for ResumeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.engine, self.value)
    }
}

/// `engine:value` string identifying a thread for scheduling and locking.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ThreadKey(String);

impl ThreadKey {
    pub fn new(engine: EngineId, value: &str) -> Self {
        Self(format!("{engine}:{value}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ThreadKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[path = "resume_tests.rs"]
mod tests;
