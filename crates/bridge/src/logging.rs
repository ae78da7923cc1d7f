// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Log rotation, subscriber setup, and bot-token redaction.

use std::io;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::fmt::MakeWriter;

const MAX_LOG_SIZE: u64 = 10 * 1024 * 1024;
const MAX_ROTATED_LOGS: u32 = 3;

/// Shifts `log_path.1 -> .2 -> .3` (oldest dropped) and the live file to
/// `.1`, if it has grown past [`MAX_LOG_SIZE`]. Call before the subscriber
/// opens the file so rotation never races a live writer.
pub fn rotate_log_if_needed(log_path: &Path) {
    let size = match std::fs::metadata(log_path) {
        Ok(meta) => meta.len(),
        Err(_) => return,
    };
    if size < MAX_LOG_SIZE {
        return;
    }

    let log_str = log_path.display().to_string();
    for i in (1..MAX_ROTATED_LOGS).rev() {
        let from = format!("{log_str}.{i}");
        let to = format!("{log_str}.{}", i + 1);
        let _ = std::fs::rename(&from, &to);
    }
    let _ = std::fs::rename(log_path, format!("{log_str}.1"));
}

/// Installs the `tracing-subscriber` registry: an `EnvFilter` (`RUST_LOG`,
/// default `info`) plus a `fmt` layer writing to the rotated log file, and
/// additionally to stderr when `debug` is set. Every layer redacts
/// `bot_token` from its output.
pub fn setup_logging(
    log_path: &Path,
    bot_token: &str,
    debug: bool,
) -> io::Result<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file_appender = tracing_appender::rolling::never(
        log_path.parent().unwrap_or_else(|| Path::new(".")),
        log_path.file_name().unwrap_or_else(|| std::ffi::OsStr::new("takopi.log")),
    );
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let file_writer = RedactingMakeWriter::new(non_blocking, bot_token);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(file_writer));

    if debug {
        let stderr_writer = RedactingMakeWriter::new(io::stderr, bot_token);
        registry.with(fmt::layer().with_writer(stderr_writer)).init();
    } else {
        registry.init();
    }

    Ok(guard)
}

/// Wraps any `MakeWriter` so every write has `bot_token` replaced with a
/// placeholder before it reaches disk or stderr.
#[derive(Clone)]
struct RedactingMakeWriter<M> {
    inner: M,
    needle: Arc<str>,
}

impl<M> RedactingMakeWriter<M> {
    fn new(inner: M, needle: &str) -> Self {
        Self {
            inner,
            needle: Arc::from(needle),
        }
    }
}

impl<'a, M: MakeWriter<'a>> MakeWriter<'a> for RedactingMakeWriter<M> {
    type Writer = RedactingWriter<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        RedactingWriter {
            inner: self.inner.make_writer(),
            needle: self.needle.clone(),
        }
    }
}

struct RedactingWriter<W> {
    inner: W,
    needle: Arc<str>,
}

impl<W: io::Write> io::Write for RedactingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.needle.is_empty() || !buf.windows(self.needle.len().max(1)).any(|w| w == self.needle.as_bytes()) {
            return self.inner.write(buf);
        }
        let text = String::from_utf8_lossy(buf);
        let redacted = text.replace(self.needle.as_ref(), "[REDACTED]");
        self.inner.write_all(redacted.as_bytes())?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod tests;
