//! End-to-end tests for the liftlog binary
//!
//! Each test gets its own store directory and config file, so nothing
//! touches the user's real configuration.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Isolated environment for running the CLI
struct TestEnv {
    _dir: TempDir,
    store: PathBuf,
    config: PathBuf,
}

impl TestEnv {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let store = dir.path().join("store");
        let config = dir.path().join("config.toml");
        Self {
            _dir: dir,
            store,
            config,
        }
    }

    /// Run `liftlog --store <store> <args>`
    fn run(&self, args: &[&str]) -> CommandResult {
        let output = Command::new(env!("CARGO_BIN_EXE_liftlog"))
            .arg("--store")
            .arg(&self.store)
            .args(args)
            .env("LIFTLOG_CONFIG", &self.config)
            .output()
            .expect("failed to run liftlog");
        CommandResult { output }
    }

    fn config_path(&self) -> &Path {
        &self.config
    }
}

struct CommandResult {
    output: Output,
}

impl CommandResult {
    fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    fn assert_success(&self) -> &Self {
        assert!(
            self.output.status.success(),
            "command failed\nstdout: {}\nstderr: {}",
            self.stdout(),
            self.stderr()
        );
        self
    }

    fn assert_failure(&self) -> &Self {
        assert!(!self.output.status.success(), "command unexpectedly succeeded");
        self
    }
}

#[test]
fn test_set_then_get() {
    let env = TestEnv::new();

    env.run(&["set", "workout", r#"{"name":"squat","sets":[[5,100.0]]}"#])
        .assert_success();

    let result = env.run(&["get", "workout"]);
    result.assert_success();
    assert!(result.stdout().contains("squat"));
}

#[test]
fn test_burst_is_coalesced() {
    let env = TestEnv::new();

    // Leading write for 1, then 3 flushed at exit; 2 is never written
    let result = env.run(&["set", "reps", "1", "2", "3"]);
    result.assert_success();
    assert!(result.stdout().contains("2 of 3 values written"));

    let result = env.run(&["get", "reps"]);
    assert_eq!(result.stdout().trim(), "3");
}

#[test]
fn test_list_and_rm() {
    let env = TestEnv::new();

    env.run(&["set", "units", "kg"]).assert_success();
    env.run(&["set", "rest_secs", "90"]).assert_success();

    let result = env.run(&["list"]);
    result.assert_success();
    assert!(result.stdout().contains("units"));
    assert!(result.stdout().contains("rest_secs"));

    env.run(&["rm", "units"]).assert_success();
    env.run(&["rm", "units"]).assert_failure();
    env.run(&["get", "units"]).assert_failure();
}

#[test]
fn test_unsynced_policy_refuses_new_keys() {
    let env = TestEnv::new();

    env.run(&["config", "--set", "sync.missing_key", "unsynced"])
        .assert_success();
    assert!(env.config_path().exists());

    let result = env.run(&["set", "fresh", "1"]);
    result.assert_failure();
    assert!(result.stderr().contains("not syncing"));

    env.run(&["get", "fresh"]).assert_failure();
}

#[test]
fn test_config_get_and_validation() {
    let env = TestEnv::new();

    let result = env.run(&["config", "--get", "sync.cooldown_ms"]);
    result.assert_success();
    assert_eq!(result.stdout().trim(), "1000");

    env.run(&["config", "--set", "sync.cooldown_ms", "250"])
        .assert_success();
    let result = env.run(&["config", "--get", "sync.cooldown_ms"]);
    assert_eq!(result.stdout().trim(), "250");

    env.run(&["config", "--set", "sync.cooldown_ms", "999999"])
        .assert_failure();
}
