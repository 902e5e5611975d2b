//! Integration tests for the `tf` CLI.
//!
//! Each test runs `tf` as a subprocess with its config and state directories
//! pointed at a temp dir. Nothing here reaches a real backend: the cases
//! cover local validation, configuration and output formatting.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

/// `tf` with an isolated environment rooted at `home`
fn tf(home: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_tf"));
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_STATE_HOME", home.join("state"))
        .env_remove("TASKFLOW_URL")
        .env_remove("TASKFLOW_ANON_KEY")
        .env_remove("RUST_LOG");
    cmd
}

/// `tf` configured for a backend that is never contacted
fn tf_with_backend(home: &Path) -> Command {
    let mut cmd = tf(home);
    cmd.env("TASKFLOW_URL", "http://127.0.0.1:9")
        .env("TASKFLOW_ANON_KEY", "test-anon-key");
    cmd
}

fn run(cmd: &mut Command) -> Output {
    cmd.output().unwrap()
}

fn run_with_stdin(cmd: &mut Command, input: &str) -> Output {
    let mut child = cmd
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

// ---------------------------------------------------------------------------
// strength
// ---------------------------------------------------------------------------

#[test]
fn strength_prints_band() {
    let home = TempDir::new().unwrap();
    let out = run(tf(home.path()).args(["strength", "abcdef"]));
    assert!(out.status.success());
    assert_eq!(stdout(&out), "Fair\n");

    let out = run(tf(home.path()).args(["strength", "abcdefghij"]));
    assert_eq!(stdout(&out), "Good\n");
}

#[test]
fn strength_json() {
    let home = TempDir::new().unwrap();
    let out = run(tf(home.path()).args(["--json", "strength", "abcdefghijklmn"]));
    assert!(out.status.success());
    let value: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(value["strength"], "Strong");
    assert_eq!(value["percent"], 100);
}

#[test]
fn strength_reads_stdin() {
    let home = TempDir::new().unwrap();
    let out = run_with_stdin(tf(home.path()).arg("strength"), "abc\n");
    assert!(out.status.success());
    assert_eq!(stdout(&out), "Weak\n");
}

// ---------------------------------------------------------------------------
// auth validation
// ---------------------------------------------------------------------------

#[test]
fn login_with_empty_password_is_rejected_locally() {
    let home = TempDir::new().unwrap();
    let out = run(tf_with_backend(home.path()).args([
        "login",
        "--email",
        "a@b.com",
        "--password",
        "",
    ]));
    assert_eq!(out.status.code(), Some(1));
    assert_eq!(stderr(&out).trim(), "error: Please enter valid credentials");
    assert!(!home.path().join("state/taskflow/session.json").exists());
}

#[test]
fn login_with_empty_stdin_password_is_rejected_locally() {
    let home = TempDir::new().unwrap();
    let out = run_with_stdin(
        tf_with_backend(home.path()).args(["login", "--email", "a@b.com"]),
        "\n",
    );
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("Please enter valid credentials"));
}

#[test]
fn signup_short_password_is_rejected_locally() {
    let home = TempDir::new().unwrap();
    let out = run(tf_with_backend(home.path()).args([
        "signup",
        "--name",
        "Ada",
        "--email",
        "ada@example.com",
        "--password",
        "12345",
    ]));
    assert_eq!(out.status.code(), Some(1));
    assert_eq!(
        stderr(&out).trim(),
        "error: Password must be at least 6 characters"
    );
}

#[test]
fn signup_blank_name_is_rejected_locally() {
    let home = TempDir::new().unwrap();
    let out = run(tf_with_backend(home.path()).args([
        "signup",
        "--name",
        " ",
        "--email",
        "ada@example.com",
        "--password",
        "secret1",
    ]));
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("Please fill in all fields"));
}

// ---------------------------------------------------------------------------
// session and backend requirements
// ---------------------------------------------------------------------------

#[test]
fn list_without_backend_config() {
    let home = TempDir::new().unwrap();
    let out = run(tf(home.path()).arg("list"));
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("no backend configured"));
}

#[test]
fn task_commands_require_login() {
    let home = TempDir::new().unwrap();
    for args in [
        vec!["list"],
        vec!["whoami"],
        vec!["add", "Buy milk"],
        vec!["delete", "1"],
    ] {
        let out = run(tf_with_backend(home.path()).args(&args));
        assert_eq!(out.status.code(), Some(1), "args: {args:?}");
        assert!(
            stderr(&out).contains("not logged in"),
            "args: {args:?}, stderr: {}",
            stderr(&out)
        );
    }
}

#[test]
fn add_checks_fields_before_any_request() {
    let home = TempDir::new().unwrap();
    let out = run(tf_with_backend(home.path()).args(["add", "  "]));
    assert!(stderr(&out).contains("title cannot be empty"));

    let out = run(tf_with_backend(home.path()).args(["add", "Buy milk", "--due", "tomorrow"]));
    assert!(stderr(&out).contains("invalid due date 'tomorrow'"));

    let out = run(tf_with_backend(home.path()).args(["edit", "1", "--status", "later"]));
    assert!(stderr(&out).contains("invalid status 'later'"));

    let out = run(tf_with_backend(home.path()).args(["list", "--status", "soon"]));
    assert_eq!(out.status.code(), Some(1));
}

// ---------------------------------------------------------------------------
// config
// ---------------------------------------------------------------------------

#[test]
fn config_path_defaults_to_xdg() {
    let home = TempDir::new().unwrap();
    let out = run(tf(home.path()).args(["config", "path"]));
    assert!(out.status.success());
    let expected = home.path().join("config/taskflow/config.toml");
    assert_eq!(stdout(&out).trim(), expected.display().to_string());
}

#[test]
fn config_path_honors_flag() {
    let home = TempDir::new().unwrap();
    let custom = home.path().join("elsewhere.toml");
    let out = run(tf(home.path())
        .args(["--config"])
        .arg(&custom)
        .args(["config", "path"]));
    assert_eq!(stdout(&out).trim(), custom.display().to_string());
}

#[test]
fn config_set_then_show() {
    let home = TempDir::new().unwrap();
    let path = home.path().join("config.toml");

    let out = run(tf(home.path()).arg("--config").arg(&path).args([
        "config",
        "set",
        "backend.url",
        "https://example.supabase.co",
    ]));
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert_eq!(stdout(&out), "backend.url = https://example.supabase.co\n");

    let out = run(tf(home.path()).arg("--config").arg(&path).args([
        "config",
        "set",
        "backend.anon_key",
        "public-anon-key",
    ]));
    assert!(out.status.success());

    let out = run(tf(home.path()).arg("--config").arg(&path).args(["config", "show"]));
    assert!(out.status.success());
    let shown = stdout(&out);
    assert!(shown.contains("https://example.supabase.co"));
    assert!(!shown.contains("public-anon-key"));

    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains("public-anon-key"));
}

#[test]
fn config_set_rejects_unknown_key_and_bad_number() {
    let home = TempDir::new().unwrap();
    let path = home.path().join("config.toml");

    let out = run(tf(home.path())
        .arg("--config")
        .arg(&path)
        .args(["config", "set", "backend.colour", "blue"]));
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("unknown config key 'backend.colour'"));

    let out = run(tf(home.path())
        .arg("--config")
        .arg(&path)
        .args(["config", "set", "backend.timeout_secs", "soon"]));
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("expects a whole number"));
}

#[test]
fn config_show_applies_env_override() {
    let home = TempDir::new().unwrap();
    let out = run(tf(home.path())
        .env("TASKFLOW_URL", "https://from-env.supabase.co")
        .args(["--json", "config", "show"]));
    assert!(out.status.success());
    let value: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(value["backend"]["url"], "https://from-env.supabase.co");
    assert_eq!(value["backend"]["table"], "tasks");
}
