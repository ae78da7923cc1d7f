// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! takopi-adapters: one `JsonlEngineSpec` per engine CLI, plus the
//! subprocess-free `mock` engine.

mod claude;
mod codex;
mod mock;
mod opencode;
mod path_util;
mod pi;
mod resume_regex;

pub use claude::ClaudeSpec;
pub use codex::CodexSpec;
pub use mock::MockRunner;
pub use opencode::OpencodeSpec;
pub use pi::PiSpec;

use std::sync::Arc;
use takopi_runner::{JsonlDriver, Runner};

/// Build a `Runner` for every engine adapter takopi ships, in registry
/// order (the first is the configured default unless overridden).
pub fn builtin_runners() -> Vec<Arc<dyn Runner>> {
    vec![
        Arc::new(JsonlDriver::new(CodexSpec::default())),
        Arc::new(JsonlDriver::new(ClaudeSpec::default())),
        Arc::new(JsonlDriver::new(OpencodeSpec::default())),
        Arc::new(JsonlDriver::new(PiSpec::default())),
        Arc::new(MockRunner::default()),
    ]
}
