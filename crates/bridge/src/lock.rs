// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single-bridge-process-per-bot-token lockfile: `{pid, token_fingerprint}`
//! at a well-known path, PID-liveness and fingerprint checked before an OS
//! exclusive lock is attempted, so a stale lock left by a crashed process
//! is silently replaced rather than refused.

use crate::error::LockError;
use fs2::FileExt;
use std::collections::hash_map::DefaultHasher;
use std::fs::File;
use std::hash::{Hash, Hasher};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// A non-reversible stand-in for the bot token, so the lockfile never
/// carries the secret itself onto disk.
pub fn fingerprint(bot_token: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    bot_token.hash(&mut hasher);
    hasher.finish()
}

fn process_alive(pid: u32) -> bool {
    nix::sys::signal::kill(nix::unistd::Pid::from_raw(pid as i32), None).is_ok()
}

/// Held for the lifetime of the bridge process. The OS exclusive lock is
/// released when `file` is dropped (even on a hard crash); `release`
/// additionally removes the file on a clean shutdown, mirroring the
/// PID-file cleanup a graceful stop performs.
pub struct Lock {
    file: File,
    path: PathBuf,
}

impl Lock {
    pub fn acquire(path: &Path, token_fingerprint: u64) -> Result<Self, LockError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| LockError::Io(path.to_path_buf(), e))?;
        }

        if let Some((pid, existing_fingerprint)) = read_existing(path) {
            if existing_fingerprint == token_fingerprint && process_alive(pid) {
                return Err(LockError::Contention(pid));
            }
        }

        let mut file = std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(|e| LockError::Io(path.to_path_buf(), e))?;

        file.try_lock_exclusive().map_err(|_| LockError::Contention(0))?;

        file.set_len(0).map_err(|e| LockError::Io(path.to_path_buf(), e))?;
        writeln!(file, "{}\n{}", std::process::id(), token_fingerprint)
            .map_err(|e| LockError::Io(path.to_path_buf(), e))?;

        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    /// Removes the lockfile. Only call this on a clean shutdown; a process
    /// that dies without calling it just leaves a stale file behind for
    /// the next `acquire` to replace.
    pub fn release(self) {
        let _ = std::fs::remove_file(&self.path);
        drop(self.file);
    }
}

fn read_existing(path: &Path) -> Option<(u32, u64)> {
    let mut text = String::new();
    File::open(path).ok()?.read_to_string(&mut text).ok()?;
    let mut lines = text.lines();
    let pid: u32 = lines.next()?.trim().parse().ok()?;
    let fingerprint: u64 = lines.next()?.trim().parse().ok()?;
    Some((pid, fingerprint))
}

#[cfg(test)]
#[path = "lock_tests.rs"]
mod tests;
