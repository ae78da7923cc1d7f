// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The seam between the presenter and whatever actually talks to Telegram.

use async_trait::async_trait;

/// Delivers rendered text for one progress message. Implemented by the
/// bridge's Telegram glue; a test double just records calls.
#[async_trait]
pub trait ProgressSink: Send + Sync {
    /// A throttled in-progress edit. Never called more than once per
    /// ~1 s window, and never with content identical to the last call.
    async fn edit(&self, rendered: &str);

    /// The one-time final render for a completed (or cancelled) run.
    async fn finalize(&self, rendered: &str);
}
