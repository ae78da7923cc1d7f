// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tokenizing the leading `/engine`, `/project`, and `@branch` directives
//! off a message's first line, and recognizing a `ctx:` footer on a reply.

use crate::error::RouterError;
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

/// Directives recognized on the first non-empty line of a message, plus
/// how many leading whitespace-separated tokens they consumed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct ParsedDirectives {
    pub engine: Option<String>,
    pub project: Option<String>,
    pub branch: Option<String>,
    pub consumed_tokens: usize,
}

/// Walk leading tokens of `first_line`, classifying each as `/engine`,
/// `/project`, or `@branch` until the first token that is none of those.
pub(crate) fn parse_directives(
    first_line: &str,
    known_engines: &HashSet<String>,
    known_projects: &HashSet<String>,
) -> Result<ParsedDirectives, RouterError> {
    let mut out = ParsedDirectives::default();

    for token in first_line.split_whitespace() {
        if let Some(branch) = token.strip_prefix('@') {
            if out.branch.is_some() {
                return Err(RouterError::DuplicateDirective { directive: "branch" });
            }
            out.branch = Some(branch.to_string());
            out.consumed_tokens += 1;
            continue;
        }

        if let Some(name) = token.strip_prefix('/') {
            if known_engines.contains(name) {
                if out.engine.is_some() {
                    return Err(RouterError::DuplicateDirective { directive: "engine" });
                }
                out.engine = Some(name.to_string());
            } else if known_projects.contains(name) {
                if out.project.is_some() {
                    return Err(RouterError::DuplicateDirective { directive: "project" });
                }
                out.project = Some(name.to_string());
            } else {
                return Err(RouterError::UnknownEngineOrProject { token: name.to_string() });
            }
            out.consumed_tokens += 1;
            continue;
        }

        break;
    }

    Ok(out)
}

/// Remove the first `consumed_tokens` whitespace-separated tokens from
/// `first_line`, rejoin with the rest of the message, and trim.
pub(crate) fn strip_directives(text: &str, first_line: &str, consumed_tokens: usize) -> String {
    let rest_of_first_line: Vec<&str> = first_line
        .split_whitespace()
        .skip(consumed_tokens)
        .collect();
    let rest_of_message = text.split_once('\n').map(|(_, tail)| tail).unwrap_or("");

    let mut prompt = rest_of_first_line.join(" ");
    if !rest_of_message.is_empty() {
        if !prompt.is_empty() {
            prompt.push('\n');
        }
        prompt.push_str(rest_of_message);
    }
    prompt.trim().to_string()
}

fn ctx_footer_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?im)^\s*`?ctx:\s*(\S+?)(?:\s*@\s*(\S+?))?`?\s*$")
            .expect("ctx footer regex is a valid literal")
    })
}

/// Find a `ctx: project [@ branch]` footer, last match wins.
pub(crate) fn find_ctx_footer(text: &str) -> Option<(String, Option<String>)> {
    ctx_footer_regex()
        .captures_iter(text)
        .last()
        .map(|caps| {
            let project = caps.get(1).map(|m| m.as_str().to_string()).unwrap_or_default();
            let branch = caps.get(2).map(|m| m.as_str().to_string());
            (project, branch)
        })
}

/// Split `text` into its first non-empty line and everything after it.
pub(crate) fn first_non_empty_line(text: &str) -> (&str, usize) {
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            let line_without_newline = line.strip_suffix('\n').unwrap_or(line);
            return (line_without_newline, offset);
        }
        offset += line.len();
    }
    ("", text.len())
}

#[cfg(test)]
#[path = "directive_tests.rs"]
mod tests;
