// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::io::Write;

#[test]
fn load_from_parses_and_validates_a_file_on_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
default_engine = "codex"
[projects.my-app]
path = "/home/user/src/my-app"
chat_id = 1
"#
    )
    .unwrap();

    let config = Config::load_from(file.path()).unwrap();
    assert_eq!(config.default_engine, "codex");
    assert_eq!(config.projects["my-app"].chat_id, 1);
}

#[test]
fn load_from_surfaces_a_toml_error_with_the_path() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "this is not valid toml =====").unwrap();

    let err = Config::load_from(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Toml(path, _) if path == file.path()));
}

#[test]
fn load_from_surfaces_an_io_error_for_a_missing_file() {
    let err = Config::load_from(Path::new("/nonexistent/takopi-config-test.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_, _)));
}

#[test]
fn load_from_rejects_duplicate_chat_ids() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
default_engine = "codex"
[projects.a]
path = "/a"
chat_id = 7

[projects.b]
path = "/b"
chat_id = 7
"#
    )
    .unwrap();

    let err = Config::load_from(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::DuplicateChatId { chat_id: 7, .. }));
}

#[test]
fn config_path_honors_the_takopi_config_env_var() {
    std::env::set_var("TAKOPI_CONFIG", "/tmp/some-override.toml");
    let path = config_path().unwrap();
    std::env::remove_var("TAKOPI_CONFIG");
    assert_eq!(path, PathBuf::from("/tmp/some-override.toml"));
}
