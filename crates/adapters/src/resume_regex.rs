// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared construction of the resume-line regex every adapter uses.
//!
//! Canonical shape: one line, optionally wrapped in backticks, case
//! insensitive, capturing a non-whitespace token after the CLI verb.

use regex::Regex;

/// Build the regex matching a resume line for the given literal CLI verb
/// (e.g. `"codex resume"`, `"claude --resume"`).
pub fn verb_regex(verb: &str) -> Regex {
    let escaped = regex::escape(verb);
    let pattern = format!(r"(?im)^\s*`?{escaped}\s+(\S+?)\s*`?\s*$");
    Regex::new(&pattern).expect("resume regex must compile")
}

/// Last match in `text` wins, matching multi-line chat messages where a
/// resume line may repeat in a quoted reply.
pub fn extract_last(re: &Regex, text: &str) -> Option<String> {
    re.captures_iter(text)
        .last()
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
#[path = "resume_regex_tests.rs"]
mod tests;
