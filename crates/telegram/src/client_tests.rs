// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn tg_response_parses_a_successful_result() {
    let json = r#"{"ok": true, "result": {"message_id": 5}}"#;
    let parsed: TgResponse<SentMessage> = serde_json::from_str(json).unwrap();
    assert!(parsed.ok);
    assert_eq!(parsed.result.unwrap().message_id, 5);
}

#[test]
fn tg_response_parses_rate_limit_parameters() {
    let json = r#"{
        "ok": false,
        "error_code": 429,
        "description": "Too Many Requests: retry after 3",
        "parameters": {"retry_after": 3}
    }"#;
    let parsed: TgResponse<SentMessage> = serde_json::from_str(json).unwrap();
    assert!(!parsed.ok);
    assert_eq!(parsed.parameters.unwrap().retry_after, Some(3));
}

#[test]
fn tg_response_parses_a_plain_api_error_without_parameters() {
    let json = r#"{"ok": false, "error_code": 400, "description": "Bad Request: chat not found"}"#;
    let parsed: TgResponse<SentMessage> = serde_json::from_str(json).unwrap();
    assert!(!parsed.ok);
    assert!(parsed.parameters.is_none());
    assert_eq!(parsed.error_code, Some(400));
}

#[test]
fn new_client_embeds_the_bot_token_in_the_base_url() {
    let client = HttpTelegramClient::new("123:ABC").unwrap();
    assert_eq!(client.base_url, "https://api.telegram.org/bot123:ABC");
}
