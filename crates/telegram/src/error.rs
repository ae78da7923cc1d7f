// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TelegramError {
    #[error("telegram transport error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("telegram api error {code}: {description}")]
    Api { code: i64, description: String },
    #[error("telegram response for a successful call carried no result")]
    MissingResult,
}
