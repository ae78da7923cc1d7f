// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The lock registry the JSONL driver acquires into on behalf of the
//! scheduler. Defined here (not in `takopi-scheduler`) so the driver can
//! depend on the capability without depending on the scheduler crate —
//! dynamic dispatch across the seam, per the "compose by parameterization,
//! not inheritance" design note.

use async_trait::async_trait;
use takopi_core::ThreadKey;

/// An opaque guard releasing a per-thread lock on drop.
pub type LockHandle = Box<dyn Send + Sync>;

/// Registry of per-`ThreadKey` locks. At any instant at most one run holds
/// the lock for a given key; a second acquire for the same key blocks until
/// the first is dropped.
#[async_trait]
pub trait ThreadLocks: Send + Sync {
    async fn acquire(&self, key: &ThreadKey) -> LockHandle;
}

/// A `ThreadLocks` implementation with no contention — every acquire
/// succeeds immediately. Used by adapters exercised outside the scheduler
/// (unit tests, the `mock` engine's smoke tests).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopThreadLocks;

#[async_trait]
impl ThreadLocks for NoopThreadLocks {
    async fn acquire(&self, _key: &ThreadKey) -> LockHandle {
        Box::new(())
    }
}

#[cfg(test)]
#[path = "locks_tests.rs"]
mod tests;
