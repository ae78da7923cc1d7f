// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pure rendering and truncation: turns [`crate::state::ProgressState`] into
//! the text Telegram actually receives. Kept free of any Telegram or
//! `Runner` dependency so it is trivial to table-test.

use crate::state::ProgressState;
use takopi_core::{format_elapsed, Clock};

/// Telegram's hard message-length limit, after entity expansion.
pub const TRANSPORT_LIMIT: usize = 4096;

/// Renders the in-progress ("Running…") message for one progress message.
/// `resume_line` is the adapter's canonical, already-backticked resume
/// command (see `Runner::format_resume`), once learned.
pub fn render_progress(state: &ProgressState, clock: &dyn Clock, resume_line: Option<&str>) -> String {
    let elapsed = format_elapsed(state.elapsed_secs(clock));
    let title = state.title.as_deref().unwrap_or("Running…");

    let mut out = format!("{title} ({elapsed})");
    for line in state.active.values() {
        out.push('\n');
        out.push_str("→ ");
        out.push_str(&line.title);
    }
    if !state.completed.is_empty() {
        out.push('\n');
        out.push_str(&format!("✓ {} done", state.completed.len()));
    }
    if let Some(line) = resume_line {
        out.push('\n');
        out.push_str(line);
    }
    out
}

/// Renders the final message for a completed run: status line, answer body,
/// resume footer (if known), then an optional `ctx:` footer.
pub fn render_final(state: &ProgressState, resume_line: Option<&str>, ctx_footer: Option<&str>) -> String {
    let outcome = state.outcome.as_ref();
    let cancelled = outcome.map(|o| o.error.as_deref() == Some("cancelled")).unwrap_or(false);
    let status = match outcome {
        Some(_) if cancelled => "cancelled",
        Some(o) if o.ok => "done",
        _ => "error",
    };

    let mut out = String::from(status);
    if let Some(o) = outcome {
        if !o.answer.is_empty() {
            out.push('\n');
            out.push_str(&o.answer);
        }
        if !o.ok && !cancelled {
            if let Some(err) = &o.error {
                out.push('\n');
                out.push_str(err);
            }
        }
    }
    if let Some(line) = resume_line {
        out.push('\n');
        out.push_str(line);
    }
    if let Some(ctx) = ctx_footer {
        out.push('\n');
        out.push_str(ctx);
    }
    out
}

/// Truncates `rendered` to fit `limit` characters, cutting the body
/// head-first: the leading status line and the trailing lines `is_protected`
/// recognizes (the resume line and the `ctx:` footer) survive byte-for-byte;
/// everything else is kept from the front up to budget, then an ellipsis
/// marker closes the body.
pub fn truncate_rendered(rendered: &str, limit: usize, is_protected: impl Fn(&str) -> bool) -> String {
    if rendered.chars().count() <= limit {
        return rendered.to_string();
    }

    let lines: Vec<&str> = rendered.lines().collect();
    let Some((status_line, rest)) = lines.split_first() else {
        return rendered.chars().take(limit).collect();
    };

    let mut protect_from = rest.len();
    for (i, line) in rest.iter().enumerate().rev() {
        if is_protected(line) {
            protect_from = i;
        } else {
            break;
        }
    }
    let footer = &rest[protect_from..];
    let body = &rest[..protect_from];

    const ELLIPSIS: &str = "…";
    let footer_len: usize = footer.iter().map(|l| l.chars().count() + 1).sum();
    let fixed_len = status_line.chars().count() + 1 + footer_len + ELLIPSIS.chars().count() + 1;
    let body_budget = limit.saturating_sub(fixed_len);

    let mut kept_body = String::new();
    let mut used = 0usize;
    for line in body {
        let line_len = line.chars().count() + 1;
        if used + line_len > body_budget {
            break;
        }
        kept_body.push_str(line);
        kept_body.push('\n');
        used += line_len;
    }

    let mut out = String::with_capacity(limit);
    out.push_str(status_line);
    out.push('\n');
    out.push_str(&kept_body);
    out.push_str(ELLIPSIS);
    for line in footer {
        out.push('\n');
        out.push_str(line);
    }
    out
}

#[cfg(test)]
#[path = "render_tests.rs"]
mod tests;
