//! CLI integration tests for the Palaver command-line interface.
//!
//! Every test points `PALAVER_CONFIG_DIR` at a temp directory and runs from
//! another one, so the user's own config and logs are never touched.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

struct Sandbox {
    config_dir: TempDir,
    work_dir: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        Self {
            config_dir: TempDir::new().unwrap(),
            work_dir: TempDir::new().unwrap(),
        }
    }

    fn palaver(&self) -> Command {
        let mut cmd = Command::cargo_bin("palaver").unwrap();
        cmd.env("PALAVER_CONFIG_DIR", self.config_dir.path())
            .env_remove("RUST_LOG")
            .current_dir(self.work_dir.path());
        cmd
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Help and Version Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_help_displays() {
    Sandbox::new()
        .palaver()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Palaver"))
        .stdout(predicate::str::contains("ask"))
        .stdout(predicate::str::contains("chat"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_version_displays() {
    Sandbox::new()
        .palaver()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("palaver"));
}

#[test]
fn test_unknown_subcommand_rejected() {
    Sandbox::new()
        .palaver()
        .arg("frobnicate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Ask
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_ask_prints_response() {
    Sandbox::new()
        .palaver()
        .args(["ask", "hello there"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[turn 1] hello there"));
}

#[test]
fn test_ask_json_output() {
    let output = Sandbox::new()
        .palaver()
        .args(["--json", "ask", "name this room please"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let reply: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(reply["new_session"], true);
    assert_eq!(reply["room_name"], "name this room please");
    assert_eq!(reply["response"], "[turn 1] name this room please");
    assert!(reply["session_id"].as_str().is_some_and(|s| !s.is_empty()));
}

#[test]
fn test_ask_with_session_keeps_id() {
    let output = Sandbox::new()
        .palaver()
        .args(["--json", "ask", "--session", "room-7", "hi"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let reply: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(reply["session_id"], "room-7");
    assert_eq!(reply["new_session"], false);
    assert!(reply.get("room_name").is_none());
}

#[test]
fn test_ask_session_starts_fresh_each_run() {
    let sandbox = Sandbox::new();
    for _ in 0..2 {
        sandbox
            .palaver()
            .args(["ask", "--session", "room-7", "again"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[turn 1] again"));
    }

    sandbox
        .palaver()
        .args(["ask", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("explicit session id"))
        .stdout(predicate::str::contains("Continue an existing session").not());
}

#[test]
fn test_ask_empty_prompt_fails() {
    Sandbox::new()
        .palaver()
        .args(["ask", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Prompt is empty"));
}

#[test]
fn test_ask_requires_prompt() {
    Sandbox::new().palaver().arg("ask").assert().failure();
}

#[test]
fn test_ask_uses_configured_room_name_words() {
    let sandbox = Sandbox::new();
    std::fs::write(
        sandbox.work_dir.path().join("palaver.toml"),
        "[chat]\nroom_name_words = 2\n",
    )
    .unwrap();

    let output = sandbox
        .palaver()
        .args(["--json", "ask", "one two three"])
        .output()
        .unwrap();
    let reply: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(reply["room_name"], "one two...");
}

#[test]
fn test_unknown_model_rejected() {
    let sandbox = Sandbox::new();
    std::fs::write(
        sandbox.work_dir.path().join("palaver.toml"),
        "[chat]\nmodel = \"gpt-9\"\n",
    )
    .unwrap();

    sandbox
        .palaver()
        .args(["ask", "hi"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown model"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Chat REPL
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_chat_reads_until_quit() {
    Sandbox::new()
        .palaver()
        .arg("chat")
        .write_stdin("first\nsecond\n/quit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("[turn 1] first"))
        .stdout(predicate::str::contains("[turn 2] second"))
        .stdout(predicate::str::contains("Goodbye!"));
}

#[test]
fn test_chat_new_resets_session() {
    Sandbox::new()
        .palaver()
        .arg("chat")
        .write_stdin("first\n/new\nagain\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("[turn 1] again"))
        .stdout(predicate::str::contains("Started new session"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Config
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_config_path_uses_override_dir() {
    let sandbox = Sandbox::new();
    let expected = sandbox.config_dir.path().join("config.toml");
    sandbox
        .palaver()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(expected.display().to_string()));
}

#[test]
fn test_config_init_then_which() {
    let sandbox = Sandbox::new();
    sandbox
        .palaver()
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created"));
    assert!(sandbox.config_dir.path().join("config.toml").is_file());

    sandbox
        .palaver()
        .args(["config", "which"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 config file(s) loaded"));
}

#[test]
fn test_config_init_local() {
    let sandbox = Sandbox::new();
    sandbox
        .palaver()
        .args(["config", "init", "--local"])
        .assert()
        .success();
    assert!(sandbox.work_dir.path().join("palaver.toml").is_file());
}

#[test]
fn test_config_show_json_reports_overrides() {
    let sandbox = Sandbox::new();
    std::fs::write(
        sandbox.work_dir.path().join("palaver.toml"),
        "[session]\nttl_secs = 120\nsweep_interval_secs = 10\n",
    )
    .unwrap();

    let output = sandbox
        .palaver()
        .args(["--json", "config", "show"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let config: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(config["session"]["ttl_secs"], 120);
    assert_eq!(config["chat"]["model"], "echo");
}
