// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-`ThreadKey` FIFO queues with one worker task draining each. Safety
//! (at most one run per key executing at a time) comes from the driver's
//! `ThreadLocks` acquisition, not from this bookkeeping — the queue just
//! gives predictable ordering and lets an idle thread's worker exit
//! instead of sitting around forever.

use crate::error::SchedulerError;
use crate::locks::SchedulerLocks;
use crate::sink::RunSink;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use takopi_core::{EngineId, Event, ThreadKey};
use takopi_router::Job;
use takopi_runner::{RunContext, Runner};
use tokio_util::sync::CancellationToken;

struct Enqueued {
    job: Job,
    sink: Arc<dyn RunSink>,
}

#[derive(Default)]
struct Queues {
    /// Pending jobs per key, not counting the one currently executing.
    queued: HashMap<ThreadKey, VecDeque<Enqueued>>,
    /// Keys with a live worker task (it may be idle between a pop and
    /// running a job, but it is accounted for until it exits).
    workers: HashSet<ThreadKey>,
    /// Cancellation token for whichever run is currently executing under
    /// a key, if any.
    active: HashMap<ThreadKey, CancellationToken>,
}

pub struct Scheduler {
    registry: Vec<Arc<dyn Runner>>,
    locks: Arc<SchedulerLocks>,
    state: tokio::sync::Mutex<Queues>,
    pending_counter: std::sync::atomic::AtomicU64,
}

impl Scheduler {
    pub fn new(registry: Vec<Arc<dyn Runner>>) -> Arc<Self> {
        Arc::new(Self {
            registry,
            locks: Arc::new(SchedulerLocks::new()),
            state: tokio::sync::Mutex::new(Queues::default()),
            pending_counter: std::sync::atomic::AtomicU64::new(0),
        })
    }

    fn runner_for(&self, engine: &EngineId) -> Option<Arc<dyn Runner>> {
        self.registry.iter().find(|r| &r.engine() == engine).cloned()
    }

    fn next_pending_key(&self, engine: &EngineId) -> ThreadKey {
        let n = self
            .pending_counter
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        ThreadKey::new(engine.clone(), &format!("pending-{n}"))
    }

    /// Enqueue `job`, starting a worker for its key if none is running.
    /// Takes `Arc<Self>` by value because a fresh worker task may need to
    /// hold its own clone across the `spawn`; pass `scheduler.clone()`.
    pub async fn submit(
        self: Arc<Self>,
        job: Job,
        sink: Arc<dyn RunSink>,
        cwd: std::path::PathBuf,
    ) -> Result<(), SchedulerError> {
        if self.runner_for(&job.adapter).is_none() {
            return Err(SchedulerError::UnknownEngine(job.adapter));
        }

        let key = match &job.resume {
            Some(token) => token.thread_key(),
            None => self.next_pending_key(&job.adapter),
        };

        let mut state = self.state.lock().await;
        state
            .queued
            .entry(key.clone())
            .or_default()
            .push_back(Enqueued { job, sink });

        if state.workers.insert(key.clone()) {
            tokio::spawn(async move {
                self.run_worker(key, cwd).await;
            });
        }

        Ok(())
    }

    /// Signal cancellation of whatever run is currently active under `key`.
    /// Returns `false` if nothing is active there.
    pub async fn cancel(&self, key: &ThreadKey) -> bool {
        let state = self.state.lock().await;
        match state.active.get(key) {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    async fn run_worker(self: Arc<Self>, mut key: ThreadKey, cwd: std::path::PathBuf) {
        loop {
            let next = {
                let mut state = self.state.lock().await;
                match state.queued.get_mut(&key).and_then(VecDeque::pop_front) {
                    Some(item) => Some(item),
                    None => {
                        state.queued.remove(&key);
                        state.workers.remove(&key);
                        None
                    }
                }
            };

            let Some(Enqueued { job, sink }) = next else {
                break;
            };

            key = self.execute(key, job, sink, &cwd).await;
        }
    }

    /// Run one job to completion, returning the key the worker should keep
    /// draining from (unchanged unless the run adopted a newly-learned
    /// resume token).
    async fn execute(
        &self,
        mut key: ThreadKey,
        job: Job,
        sink: Arc<dyn RunSink>,
        cwd: &std::path::Path,
    ) -> ThreadKey {
        let Some(runner) = self.runner_for(&job.adapter) else {
            tracing::warn!(engine = %job.adapter, "runner disappeared between submit and execute");
            return key;
        };

        let cancel = CancellationToken::new();
        {
            let mut state = self.state.lock().await;
            state.active.insert(key.clone(), cancel.clone());
        }

        let ctx = RunContext {
            cwd: cwd.to_path_buf(),
            cancel: cancel.clone(),
            locks: self.locks.clone(),
        };

        let mut rx = runner.run(job.prompt, job.resume, ctx).await;
        while let Some(event) = rx.recv().await {
            if let Event::Started { resume, .. } = &event {
                let real_key = resume.thread_key();
                if real_key != key {
                    if self.adopt(&key, &real_key).await {
                        key = real_key;
                    }
                }
            }
            sink.on_event(event).await;
        }

        let mut state = self.state.lock().await;
        state.active.remove(&key);
        key
    }

    /// Rename a pending worker's identity to the resume token it just
    /// learned. Returns `false` (and leaves the worker under its old
    /// pending key) if another worker already owns `real_key` — the
    /// in-flight run still finishes correctly since the driver's lock
    /// already serializes it against that other worker.
    async fn adopt(&self, pending_key: &ThreadKey, real_key: &ThreadKey) -> bool {
        let mut state = self.state.lock().await;
        if state.workers.contains(real_key) {
            tracing::warn!(
                %pending_key, %real_key,
                "adoption collision: a worker already owns this thread key"
            );
            return false;
        }

        state.workers.remove(pending_key);
        state.workers.insert(real_key.clone());

        if let Some(queue) = state.queued.remove(pending_key) {
            state.queued.entry(real_key.clone()).or_default().extend(queue);
        }

        if let Some(token) = state.active.remove(pending_key) {
            state.active.insert(real_key.clone(), token);
        }

        true
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
