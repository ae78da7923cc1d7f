//! Test helpers for black-box CLI specifications.
//!
//! Provides a small DSL for invoking the built `takopi` binary and
//! asserting on stdout/stderr/exit codes.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use std::process::Output;

/// Build a `Command` for the `takopi` binary with no ambient env leaking in
/// from the test process itself.
fn takopi_cmd() -> Command {
    let mut cmd = Command::cargo_bin("takopi").expect("takopi binary should be built");
    cmd.env_remove("TAKOPI_CONFIG");
    cmd.env_remove("TAKOPI_STATE_DIR");
    cmd.env_remove("TAKOPI_BOT_TOKEN");
    cmd
}

/// Create a CLI builder for `takopi` invocations.
pub fn cli() -> CliBuilder {
    CliBuilder::new()
}

pub struct CliBuilder {
    cmd: Command,
}

impl CliBuilder {
    fn new() -> Self {
        Self { cmd: takopi_cmd() }
    }

    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn env(mut self, key: &str, value: impl AsRef<Path>) -> Self {
        self.cmd.env(key, value.as_ref());
        self
    }

    /// Run and expect success (exit code 0).
    pub fn passes(mut self) -> RunAssert {
        let output = self.cmd.output().expect("command should run");
        assert!(
            output.status.success(),
            "expected command to pass, got exit code {:?}\nstdout: {}\nstderr: {}",
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        RunAssert { output }
    }

    /// Run and expect a specific non-zero exit code.
    pub fn fails_with(mut self, code: i32) -> RunAssert {
        let output = self.cmd.output().expect("command should run");
        assert_eq!(
            output.status.code(),
            Some(code),
            "expected exit code {code}, got {:?}\nstdout: {}\nstderr: {}",
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        RunAssert { output }
    }
}

pub struct RunAssert {
    output: Output,
}

impl RunAssert {
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    pub fn stdout_eq(self, expected: &str) -> Self {
        let stdout = self.stdout();
        similar_asserts::assert_eq!(stdout, expected);
        self
    }

    pub fn stdout_has(self, expected: &str) -> Self {
        let stdout = self.stdout();
        assert!(stdout.contains(expected), "stdout does not contain '{expected}'\nstdout: {stdout}");
        self
    }

    pub fn stderr_has(self, expected: &str) -> Self {
        let stderr = self.stderr();
        assert!(stderr.contains(expected), "stderr does not contain '{expected}'\nstderr: {stderr}");
        self
    }
}

/// An isolated config file and state directory pair, so a test never reads
/// or writes the operator's real `~/.config/takopi`.
pub struct Sandbox {
    config_dir: tempfile::TempDir,
    state_dir: tempfile::TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        Self {
            config_dir: tempfile::tempdir().unwrap(),
            state_dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn config_path(&self) -> PathBuf {
        self.config_dir.path().join("config.toml")
    }

    pub fn state_dir(&self) -> &Path {
        self.state_dir.path()
    }

    pub fn write_config(&self, contents: &str) {
        std::fs::write(self.config_path(), contents).unwrap();
    }

    /// A `takopi` invocation scoped to this sandbox's config and state dir.
    pub fn cli(&self) -> CliBuilder {
        cli().env("TAKOPI_CONFIG", self.config_path()).env("TAKOPI_STATE_DIR", self.state_dir())
    }
}
