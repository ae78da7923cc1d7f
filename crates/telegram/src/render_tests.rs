// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn plain_text_has_no_entities() {
    let (text, entities) = render("done, no formatting here");
    assert_eq!(text, "done, no formatting here");
    assert!(entities.is_empty());
}

#[test]
fn bold_span_strips_markers_and_records_offsets() {
    let (text, entities) = render("say **hello** now");
    assert_eq!(text, "say hello now");
    assert_eq!(
        entities,
        vec![Entity {
            kind: EntityKind::Bold,
            offset: 4,
            length: 5
        }]
    );
}

#[test]
fn inline_code_is_stripped_into_a_code_entity() {
    let (text, entities) = render("run `pytest -q` please");
    assert_eq!(text, "run pytest -q please");
    assert_eq!(
        entities,
        vec![Entity {
            kind: EntityKind::Code,
            offset: 4,
            length: 9
        }]
    );
}

#[test]
fn resume_line_in_backticks_matches_codex_resume_line_length() {
    let (text, entities) = render("`codex resume U`");
    assert_eq!(text, "codex resume U");
    assert_eq!(entities.len(), 1);
    assert_eq!(entities[0].kind, EntityKind::Code);
    assert_eq!(entities[0].offset, 0);
    assert_eq!(entities[0].length, text.encode_utf16().count() as u32);
}

#[test]
fn fenced_code_block_becomes_a_pre_entity_without_the_fence_markers() {
    let (text, entities) = render("```\nfn main() {}\n```");
    assert_eq!(text, "fn main() {}\n");
    assert_eq!(entities.len(), 1);
    assert_eq!(entities[0].kind, EntityKind::Pre);
}

#[test]
fn italic_supports_both_asterisk_and_underscore_markers() {
    let (text_star, entities_star) = render("*emph*");
    let (text_under, entities_under) = render("_emph_");
    assert_eq!(text_star, "emph");
    assert_eq!(text_under, "emph");
    assert_eq!(entities_star[0].kind, EntityKind::Italic);
    assert_eq!(entities_under[0].kind, EntityKind::Italic);
}

#[test]
fn unmatched_marker_is_passed_through_literally() {
    let (text, entities) = render("cost is $5 * 3 = $15");
    assert_eq!(text, "cost is $5 * 3 = $15");
    assert!(entities.is_empty());
}

#[test]
fn offsets_are_utf16_code_units_not_bytes() {
    // "café " has a 2-byte 'é' but one UTF-16 code unit, so the bold span's
    // offset must count code units, not bytes, to land correctly.
    let (text, entities) = render("café **ok**");
    assert_eq!(text, "café ok");
    assert_eq!(entities[0].offset, "café ".encode_utf16().count() as u32);
}
