// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! takopi-bridge: the long-poll loop that wires the router, scheduler, and
//! presenter to Telegram, plus the process-level concerns (lockfile,
//! logging) that only make sense at the top of the process.

mod bridge;
mod error;
mod lock;
mod logging;
mod progress_sink;

pub use bridge::Bridge;
pub use error::{BridgeError, LockError};
pub use lock::{fingerprint, Lock};
pub use logging::{rotate_log_if_needed, setup_logging};
pub use progress_sink::{DeliveryMode, TelegramProgressSink};
