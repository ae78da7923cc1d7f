// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The real [`ThreadLocks`] implementation: one `tokio::sync::Mutex` per
//! thread key, created lazily and kept around for the life of the process.
//! This is what actually guarantees "at most one run per `ThreadKey`" —
//! the scheduler's queue/worker bookkeeping is ordering on top of it, not
//! a substitute for it.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use takopi_core::ThreadKey;
use takopi_runner::{LockHandle, ThreadLocks};

#[derive(Default)]
pub struct SchedulerLocks {
    locks: parking_lot::Mutex<HashMap<ThreadKey, Arc<tokio::sync::Mutex<()>>>>,
}

impl SchedulerLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn mutex_for(&self, key: &ThreadKey) -> Arc<tokio::sync::Mutex<()>> {
        self.locks
            .lock()
            .entry(key.clone())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }
}

#[async_trait]
impl ThreadLocks for SchedulerLocks {
    async fn acquire(&self, key: &ThreadKey) -> LockHandle {
        let mutex = self.mutex_for(key);
        Box::new(mutex.lock_owned().await)
    }
}

#[cfg(test)]
#[path = "locks_tests.rs"]
mod tests;
