// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The normalized shape of an incoming chat message, before routing.

/// A message handed to the [`Router`](crate::Router). `reply_text` is the
/// text of the message this one replies to, when any — it's where a `ctx:`
/// footer or an earlier resume line is looked for.
#[derive(Debug, Clone, Default)]
pub struct IncomingMessage {
    pub text: String,
    pub reply_text: Option<String>,
    pub chat_id: i64,
    pub sender_id: i64,
    pub message_id: i64,
    pub reply_to_id: Option<i64>,
    pub topic_id: Option<i64>,
}
