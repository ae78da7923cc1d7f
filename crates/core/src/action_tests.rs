// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn unknown_kind_falls_back_to_note() {
    let value: ActionKind = serde_json::from_str("\"future_kind_nobody_invented_yet\"").unwrap();
    assert_eq!(value, ActionKind::Note);
}

#[test]
fn phase_ordering_is_started_lt_updated_lt_completed() {
    assert!(ActionPhase::Started < ActionPhase::Updated);
    assert!(ActionPhase::Updated < ActionPhase::Completed);
}

#[test]
fn with_detail_builds_up_freeform_map() {
    let action = Action::new("a1", ActionKind::Command, "pytest")
        .with_detail("exit_code", 0)
        .with_detail("cwd", "/repo");
    assert_eq!(action.detail.get("exit_code").unwrap(), 0);
    assert_eq!(action.detail.get("cwd").unwrap(), "/repo");
}

#[test]
fn missing_detail_keys_are_tolerated() {
    let action = Action::new("a1", ActionKind::Tool, "read_file");
    assert!(action.detail.get("result_preview").is_none());
}
