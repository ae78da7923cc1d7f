// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `TelegramClient` trait and its `reqwest`-backed implementation.

use crate::entity::Entity;
use crate::error::TelegramError;
use crate::update::Update;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

/// Adapter-to-collaborator boundary for everything the bridge needs from
/// Telegram. A test double records calls instead of making them.
#[async_trait]
pub trait TelegramClient: Send + Sync {
    async fn send(&self, chat_id: i64, text: &str, entities: &[Entity], silent: bool) -> Result<i64, TelegramError>;

    async fn edit(&self, chat_id: i64, message_id: i64, text: &str, entities: &[Entity]) -> Result<(), TelegramError>;

    async fn delete(&self, chat_id: i64, message_id: i64) -> Result<(), TelegramError>;

    async fn long_poll(&self, offset: i64, timeout_secs: u32) -> Result<Vec<Update>, TelegramError>;
}

#[derive(Debug, Deserialize)]
struct TgResponse<T> {
    ok: bool,
    #[serde(default)]
    result: Option<T>,
    #[serde(default)]
    error_code: Option<i64>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    parameters: Option<ResponseParameters>,
}

#[derive(Debug, Deserialize)]
struct ResponseParameters {
    #[serde(default)]
    retry_after: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct SentMessage {
    message_id: i64,
}

/// `reqwest`-backed `TelegramClient`. One instance is shared by every
/// progress message's presenter; rate-limit retries happen transparently
/// inside `call`, so callers never see a 429.
pub struct HttpTelegramClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTelegramClient {
    pub fn new(bot_token: &str) -> Result<Self, TelegramError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(65))
            .build()?;
        Ok(Self {
            client,
            base_url: format!("https://api.telegram.org/bot{bot_token}"),
        })
    }

    async fn call<T>(&self, method: &str, body: Value) -> Result<T, TelegramError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let url = format!("{}/{method}", self.base_url);
        loop {
            let response = self.client.post(&url).json(&body).send().await?;
            let payload: TgResponse<T> = response.json().await?;

            if payload.ok {
                return payload.result.ok_or(TelegramError::MissingResult);
            }

            if let Some(retry_after) = payload.parameters.as_ref().and_then(|p| p.retry_after) {
                tracing::warn!(method, retry_after, "telegram rate limit; retrying");
                tokio::time::sleep(Duration::from_secs(retry_after)).await;
                continue;
            }

            return Err(TelegramError::Api {
                code: payload.error_code.unwrap_or(0),
                description: payload.description.unwrap_or_default(),
            });
        }
    }
}

#[async_trait]
impl TelegramClient for HttpTelegramClient {
    async fn send(&self, chat_id: i64, text: &str, entities: &[Entity], silent: bool) -> Result<i64, TelegramError> {
        let sent: SentMessage = self
            .call(
                "sendMessage",
                json!({
                    "chat_id": chat_id,
                    "text": text,
                    "entities": entities,
                    "disable_notification": silent,
                }),
            )
            .await?;
        Ok(sent.message_id)
    }

    async fn edit(&self, chat_id: i64, message_id: i64, text: &str, entities: &[Entity]) -> Result<(), TelegramError> {
        let _: Value = self
            .call(
                "editMessageText",
                json!({
                    "chat_id": chat_id,
                    "message_id": message_id,
                    "text": text,
                    "entities": entities,
                }),
            )
            .await?;
        Ok(())
    }

    async fn delete(&self, chat_id: i64, message_id: i64) -> Result<(), TelegramError> {
        let _: Value = self
            .call(
                "deleteMessage",
                json!({
                    "chat_id": chat_id,
                    "message_id": message_id,
                }),
            )
            .await?;
        Ok(())
    }

    async fn long_poll(&self, offset: i64, timeout_secs: u32) -> Result<Vec<Update>, TelegramError> {
        self.call(
            "getUpdates",
            json!({
                "offset": offset,
                "timeout": timeout_secs,
                "allowed_updates": ["message"],
            }),
        )
        .await
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
