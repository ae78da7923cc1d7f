//! CLI help/informational-flag specs.

use crate::prelude::*;

#[test]
fn help_flag_shows_usage() {
    cli().args(&["--help"]).passes().stdout_has("Usage");
}

#[test]
fn version_flag_shows_the_version() {
    cli().args(&["--version"]).passes().stdout_has("takopi");
}

#[test]
fn list_engines_prints_the_registered_engine_ids_in_registry_order() {
    cli().args(&["--list-engines"]).passes().stdout_eq("codex\nclaude\nopencode\npi\nmock\n");
}

#[test]
fn onboard_writes_a_starter_config_when_none_exists() {
    let sandbox = Sandbox::new();

    sandbox.cli().args(&["--onboard"]).passes().stdout_has("wrote starter config");

    let contents = std::fs::read_to_string(sandbox.config_path()).unwrap();
    assert!(contents.contains("default_engine"));
}

#[test]
fn onboard_does_not_overwrite_an_existing_config() {
    let sandbox = Sandbox::new();
    sandbox.write_config("default_engine = \"claude\"\n");

    sandbox.cli().args(&["--onboard"]).passes();

    let contents = std::fs::read_to_string(sandbox.config_path()).unwrap();
    assert_eq!(contents, "default_engine = \"claude\"\n");
}
