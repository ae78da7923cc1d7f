// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Where a scheduled run's events go. The presenter implements this per
//! progress message; tests use a channel-backed stub.

use async_trait::async_trait;
use takopi_core::Event;

#[async_trait]
pub trait RunSink: Send + Sync {
    async fn on_event(&self, event: Event);
}
