// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn builder_sets_optional_fields() {
    let chat_ref = ChatRef::new(1, 2).with_reply_to(3).with_topic(4);
    assert_eq!(chat_ref.chat_id, 1);
    assert_eq!(chat_ref.message_id, 2);
    assert_eq!(chat_ref.reply_to_id, Some(3));
    assert_eq!(chat_ref.topic_id, Some(4));
}

#[test]
fn default_has_no_reply_or_topic() {
    let chat_ref = ChatRef::new(10, 20);
    assert_eq!(chat_ref.reply_to_id, None);
    assert_eq!(chat_ref.topic_id, None);
}
