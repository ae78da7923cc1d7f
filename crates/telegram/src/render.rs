// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pure Markdown-subset renderer: strips formatting markers out of the
//! source text and records them as `MessageEntity` spans instead, so
//! messages can be sent with explicit `entities` rather than `parse_mode`
//! (no Markdown-escaping hazard at the transport boundary).
//!
//! Supported spans: fenced ``` code blocks (`Pre`), inline `` `code` ``
//! (`Code`), `**bold**` (`Bold`), and `*italic*`/`_italic_` (`Italic`).
//! Unmatched markers (no closing delimiter found) are passed through as
//! literal text.

use crate::entity::{Entity, EntityKind};

struct Builder {
    text: String,
    utf16_len: u32,
    entities: Vec<Entity>,
}

impl Builder {
    fn push(&mut self, s: &str) {
        self.text.push_str(s);
        self.utf16_len += s.encode_utf16().count() as u32;
    }

    fn push_spanned(&mut self, kind: EntityKind, content: &str) {
        let start = self.utf16_len;
        self.push(content);
        let len = self.utf16_len - start;
        if len > 0 {
            self.entities.push(Entity {
                kind,
                offset: start,
                length: len,
            });
        }
    }
}

/// Renders `markdown` into `(text, entities)` for a single Telegram message.
pub fn render(markdown: &str) -> (String, Vec<Entity>) {
    let chars: Vec<char> = markdown.chars().collect();
    let mut b = Builder {
        text: String::new(),
        utf16_len: 0,
        entities: Vec::new(),
    };

    let mut i = 0;
    while i < chars.len() {
        if starts_with(&chars, i, "```") {
            let close = find_pattern(&chars, i + 3, "```");
            let content_end = close.unwrap_or(chars.len());
            let next = close.map(|c| c + 3).unwrap_or(chars.len());
            let mut start = i + 3;
            if start < content_end && chars[start] == '\n' {
                start += 1;
            }
            let content: String = chars[start..content_end].iter().collect();
            b.push_spanned(EntityKind::Pre, &content);
            i = next;
            continue;
        }

        if starts_with(&chars, i, "**") {
            if let Some(close) = find_pattern(&chars, i + 2, "**") {
                let content: String = chars[i + 2..close].iter().collect();
                b.push_spanned(EntityKind::Bold, &content);
                i = close + 2;
                continue;
            }
        }

        if chars[i] == '`' {
            if let Some(close) = find_char(&chars, i + 1, '`') {
                let content: String = chars[i + 1..close].iter().collect();
                b.push_spanned(EntityKind::Code, &content);
                i = close + 1;
                continue;
            }
        }

        if chars[i] == '*' || chars[i] == '_' {
            let marker = chars[i];
            if let Some(close) = find_char(&chars, i + 1, marker) {
                let content: String = chars[i + 1..close].iter().collect();
                b.push_spanned(EntityKind::Italic, &content);
                i = close + 1;
                continue;
            }
        }

        let ch = chars[i];
        let mut buf = [0u8; 4];
        b.push(ch.encode_utf8(&mut buf));
        i += 1;
    }

    (b.text, b.entities)
}

fn starts_with(chars: &[char], i: usize, pat: &str) -> bool {
    let pat: Vec<char> = pat.chars().collect();
    i + pat.len() <= chars.len() && chars[i..i + pat.len()] == pat[..]
}

fn find_pattern(chars: &[char], from: usize, pat: &str) -> Option<usize> {
    let pat: Vec<char> = pat.chars().collect();
    if from + pat.len() > chars.len() {
        return None;
    }
    (from..=chars.len() - pat.len()).find(|&j| chars[j..j + pat.len()] == pat[..])
}

fn find_char(chars: &[char], from: usize, c: char) -> Option<usize> {
    chars[from..].iter().position(|&x| x == c).map(|p| from + p)
}

#[cfg(test)]
#[path = "render_tests.rs"]
mod tests;
