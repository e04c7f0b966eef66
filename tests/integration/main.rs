//! Integration tests for the Epinio panel CLI.

#![allow(clippy::unwrap_used)] // Tests can use unwrap for cleaner assertions

mod common;

use assert_cmd::Command;
use common::Sandbox;
use predicates::prelude::*;

/// A binary that accepts any arguments and prints nothing.
const NOOP_BINARY: &str = "true";

/// A binary that cannot be found on the path.
const MISSING_BINARY: &str = "epinio-panel-test-missing-binary";

fn panel_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("epinio-panel"))
}

#[test]
fn test_help() {
    panel_cmd().arg("--help").assert().success().stdout(predicate::str::contains("Epinio"));
}

#[test]
fn test_version() {
    panel_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_unknown_command() {
    panel_cmd().arg("unknown-command").assert().failure();
}

#[test]
fn test_apps_push_help() {
    panel_cmd()
        .args(["apps", "push", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--path"));
}

#[test]
fn test_completion_bash() {
    panel_cmd()
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("epinio-panel"));
}

#[test]
fn test_connections_list_empty() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd(NOOP_BINARY)
        .args(["connections", "list"])
        .assert()
        .success()
        .stderr(predicate::str::contains("No connections configured."));
}

#[test]
fn test_apps_list_without_connection() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd(NOOP_BINARY)
        .args(["apps", "list"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("No active cluster connection"))
        .stderr(predicate::str::contains("connections add"));
}

#[cfg(unix)]
#[test]
fn test_connections_add_activates_first() {
    let sandbox = Sandbox::new();
    let first = sandbox.connection("first.yaml", "workspace");
    let second = sandbox.connection("second.yaml", "staging");

    sandbox.cmd(NOOP_BINARY).args(["connections", "add"]).arg(&first).assert().success();
    sandbox.cmd(NOOP_BINARY).args(["connections", "add"]).arg(&second).assert().success();

    sandbox
        .cmd(NOOP_BINARY)
        .args(["-o", "json", "connections", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains(first.display().to_string()))
        .stdout(predicate::str::contains(second.display().to_string()));

    let state: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(sandbox.state_file()).unwrap()).unwrap();
    let active: Vec<bool> = state
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["config"]["active"].as_bool().unwrap_or(false))
        .collect();
    assert_eq!(active, vec![true, false]);
}

#[cfg(unix)]
#[test]
fn test_connections_add_missing_binary_rolls_back() {
    let sandbox = Sandbox::new();
    let config = sandbox.connection("config.yaml", "workspace");

    sandbox
        .cmd(MISSING_BINARY)
        .args(["connections", "add"])
        .arg(&config)
        .assert()
        .code(127)
        .stderr(predicate::str::contains("Epinio CLI not found"));

    sandbox
        .cmd(NOOP_BINARY)
        .args(["connections", "list"])
        .assert()
        .success()
        .stderr(predicate::str::contains("No connections configured."));
}

#[test]
fn test_connections_add_nonexistent_file() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd(NOOP_BINARY)
        .args(["connections", "add", "does-not-exist.yaml"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("does not exist"));
}

#[cfg(unix)]
#[test]
fn test_apps_list_uses_connection_namespace() {
    let sandbox = Sandbox::new();
    let config = sandbox.connection("config.yaml", "workspace");
    sandbox.cmd(NOOP_BINARY).args(["connections", "add"]).arg(&config).assert().success();

    sandbox
        .cmd(NOOP_BINARY)
        .args(["apps", "list"])
        .assert()
        .success()
        .stderr(predicate::str::contains("No applications in namespace 'workspace'."));
}

#[cfg(unix)]
#[test]
fn test_namespace_prefix_overrides_connection() {
    let sandbox = Sandbox::new();
    let config = sandbox.connection("config.yaml", "workspace");
    sandbox.cmd(NOOP_BINARY).args(["connections", "add"]).arg(&config).assert().success();

    sandbox
        .cmd(NOOP_BINARY)
        .args(["@staging", "apps", "list"])
        .assert()
        .success()
        .stderr(predicate::str::contains("No applications in namespace 'staging'."));
}

#[cfg(unix)]
#[test]
fn test_scale_rejects_invalid_count() {
    let sandbox = Sandbox::new();
    let config = sandbox.connection("config.yaml", "workspace");

    sandbox
        .cmd(NOOP_BINARY)
        .arg("--config-file")
        .arg(&config)
        .args(["apps", "scale", "web", "two"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Not a number"));
}

#[cfg(unix)]
#[test]
fn test_scale_reports_progress() {
    let sandbox = Sandbox::new();
    let config = sandbox.connection("config.yaml", "workspace");

    let output = sandbox
        .cmd(NOOP_BINARY)
        .arg("--config-file")
        .arg(&config)
        .args(["apps", "scale", "web", "3"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let shown = format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(shown.contains("Scaling web to 3 instance(s)..."));
    assert!(shown.contains("Scaled web to 3 instance(s)"));
}

#[cfg(unix)]
#[test]
fn test_repush_without_recorded_source() {
    let sandbox = Sandbox::new();
    let config = sandbox.connection("config.yaml", "workspace");

    sandbox
        .cmd(NOOP_BINARY)
        .arg("--config-file")
        .arg(&config)
        .args(["apps", "repush", "web"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No source recorded"));
}

#[test]
fn test_namespace_prefix_parsing() {
    use epinio_panel::cli::parse_namespace_prefix;

    let args = vec!["epinio-panel".to_string(), "@prod".to_string(), "apps".to_string()];
    let (namespace, remaining) = parse_namespace_prefix(args);
    assert_eq!(namespace, Some("prod".to_string()));
    assert_eq!(remaining, vec!["epinio-panel".to_string(), "apps".to_string()]);
}
