// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn matches_plain_and_backticked_lines() {
    let re = verb_regex("codex resume");
    assert_eq!(
        extract_last(&re, "codex resume abc123"),
        Some("abc123".to_string())
    );
    assert_eq!(
        extract_last(&re, "`codex resume abc123`"),
        Some("abc123".to_string())
    );
    assert_eq!(
        extract_last(&re, "  CODEX RESUME abc123  "),
        Some("abc123".to_string())
    );
}

#[test]
fn last_match_wins_across_lines() {
    let re = verb_regex("codex resume");
    let text = "earlier thread:\n`codex resume first`\n\nlatest thread:\n`codex resume second`";
    assert_eq!(extract_last(&re, text), Some("second".to_string()));
}

#[test]
fn no_match_returns_none() {
    let re = verb_regex("codex resume");
    assert_eq!(extract_last(&re, "just chatting, no resume here"), None);
}

#[test]
fn does_not_match_a_different_verb() {
    let re = verb_regex("codex resume");
    assert_eq!(extract_last(&re, "`claude --resume abc123`"), None);
}
