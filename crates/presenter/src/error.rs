// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PresenterError {
    #[error("ctx footer must not span multiple lines: {0:?}")]
    InvalidCtxFooter(String),
}
