// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `ProgressSink` that turns the presenter's rendered text into actual
//! Telegram calls.

use async_trait::async_trait;
use std::sync::Arc;
use takopi_presenter::ProgressSink;
use takopi_telegram::TelegramClient;

/// Default delivery posts a fresh message and deletes the progress
/// message; `EditInPlace` instead edits the progress message with the
/// final content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryMode {
    NewMessageThenDelete,
    EditInPlace,
}

pub struct TelegramProgressSink {
    client: Arc<dyn TelegramClient>,
    chat_id: i64,
    message_id: i64,
    delivery: DeliveryMode,
    notify: bool,
}

impl TelegramProgressSink {
    /// `notify` controls whether a final message delivered as a fresh send
    /// (rather than an in-place edit) triggers a push notification.
    pub fn new(client: Arc<dyn TelegramClient>, chat_id: i64, message_id: i64, delivery: DeliveryMode, notify: bool) -> Self {
        Self {
            client,
            chat_id,
            message_id,
            delivery,
            notify,
        }
    }
}

#[async_trait]
impl ProgressSink for TelegramProgressSink {
    async fn edit(&self, rendered: &str) {
        let (text, entities) = takopi_telegram::render(rendered);
        if let Err(error) = self.client.edit(self.chat_id, self.message_id, &text, &entities).await {
            tracing::warn!(%error, "failed to edit progress message");
        }
    }

    async fn finalize(&self, rendered: &str) {
        let (text, entities) = takopi_telegram::render(rendered);
        match self.delivery {
            DeliveryMode::EditInPlace => {
                if let Err(error) = self.client.edit(self.chat_id, self.message_id, &text, &entities).await {
                    tracing::warn!(%error, "failed to finalize progress message in place");
                }
            }
            DeliveryMode::NewMessageThenDelete => {
                match self.client.send(self.chat_id, &text, &entities, !self.notify).await {
                    Ok(_) => {
                        if let Err(error) = self.client.delete(self.chat_id, self.message_id).await {
                            tracing::warn!(%error, "failed to delete progress message");
                        }
                    }
                    Err(error) => tracing::warn!(%error, "failed to send final message"),
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "progress_sink_tests.rs"]
mod tests;
