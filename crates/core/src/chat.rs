// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Where a message lives: the chat, the message itself, and the
//! reply/topic threading needed to route a reply back to the right place.

use serde::{Deserialize, Serialize};

/// Identifies a Telegram message well enough to reply to it or edit it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatRef {
    pub chat_id: i64,
    pub message_id: i64,
    pub reply_to_id: Option<i64>,
    pub topic_id: Option<i64>,
}

impl ChatRef {
    pub fn new(chat_id: i64, message_id: i64) -> Self {
        Self {
            chat_id,
            message_id,
            reply_to_id: None,
            topic_id: None,
        }
    }

    pub fn with_reply_to(mut self, reply_to_id: i64) -> Self {
        self.reply_to_id = Some(reply_to_id);
        self
    }

    pub fn with_topic(mut self, topic_id: i64) -> Self {
        self.topic_id = Some(topic_id);
        self
    }
}

#[cfg(test)]
#[path = "chat_tests.rs"]
mod tests;
