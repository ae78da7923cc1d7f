//! CLI error-path specs: each exit code the binary can produce.

use crate::prelude::*;

const VALID_CONFIG: &str = "default_engine = \"mock\"\n";

#[test]
fn missing_config_file_exits_with_config_error() {
    let sandbox = Sandbox::new();

    sandbox
        .cli()
        .env("TAKOPI_BOT_TOKEN", "test-token")
        .fails_with(1)
        .stderr_has("failed to load configuration");
}

#[test]
fn missing_bot_token_exits_with_config_error() {
    let sandbox = Sandbox::new();
    sandbox.write_config(VALID_CONFIG);

    sandbox.cli().fails_with(1).stderr_has("TAKOPI_BOT_TOKEN");
}

#[test]
fn a_live_lock_held_by_the_same_bot_token_exits_with_lock_contention() {
    let sandbox = Sandbox::new();
    sandbox.write_config(VALID_CONFIG);
    let bot_token = "test-token";

    std::fs::create_dir_all(sandbox.state_dir()).unwrap();
    let lock_path = sandbox.state_dir().join("takopi.lock");
    std::fs::write(&lock_path, format!("{}\n{}\n", std::process::id(), takopi_bridge::fingerprint(bot_token))).unwrap();

    sandbox
        .cli()
        .env("TAKOPI_BOT_TOKEN", bot_token)
        .fails_with(2)
        .stderr_has("already running");
}
