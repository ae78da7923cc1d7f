//! Black-box specifications for the `takopi` CLI binary.
//!
//! These tests invoke the built binary and verify stdout, stderr, and
//! exit codes.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

#[path = "specs/prelude.rs"]
mod prelude;

#[path = "specs/cli/help.rs"]
mod cli_help;
#[path = "specs/cli/errors.rs"]
mod cli_errors;
