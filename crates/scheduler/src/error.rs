// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use takopi_core::EngineId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("no runner registered for engine {0}")]
    UnknownEngine(EngineId),
}
