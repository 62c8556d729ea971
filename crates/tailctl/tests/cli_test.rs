//! Integration tests for the `tailctl` CLI binary.
//!
//! Argument parsing, help output, completions and error handling run without
//! any network. The API-backed tests point `--base-url` at a wiremock server.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `tailctl` binary with env isolation.
///
/// Clears all `TSCTL_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn tailctl_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("tailctl");
    cmd.env("HOME", "/tmp/tailctl-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/tailctl-test-nonexistent")
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    for var in [
        "TSCTL_PROFILE",
        "TSCTL_BASE_URL",
        "TSCTL_TAILNET",
        "TSCTL_API_KEY",
        "TSCTL_OAUTH_CLIENT_ID",
        "TSCTL_OAUTH_CLIENT_SECRET",
        "TSCTL_OUTPUT",
        "TSCTL_INSECURE",
        "TSCTL_TIMEOUT",
        "TSCTL_DEFAULT_PROFILE",
        "TSCTL_DEFAULTS__OUTPUT",
        "TSCTL_DEFAULTS__TIMEOUT",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

/// Run the binary against a mock server with an API key, off the async runtime.
async fn run_against(server: &MockServer, args: &[&str]) -> std::process::Output {
    let base_url = format!("{}/api/v2", server.uri());
    let mut argv: Vec<String> = vec![
        "--base-url".into(),
        base_url,
        "--api-key".into(),
        "abc123".into(),
    ];
    argv.extend(args.iter().map(|a| (*a).to_owned()));

    tokio::task::spawn_blocking(move || tailctl_cmd().args(&argv).output().unwrap())
        .await
        .unwrap()
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = tailctl_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    tailctl_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("tailnet")
            .and(predicate::str::contains("devices"))
            .and(predicate::str::contains("keys"))
            .and(predicate::str::contains("acl"))
            .and(predicate::str::contains("dns"))
            .and(predicate::str::contains("logs")),
    );
}

#[test]
fn test_version_flag() {
    tailctl_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("tailctl"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    tailctl_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    tailctl_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = tailctl_cmd().arg("foobar").output().unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_devices_list_no_config() {
    tailctl_cmd()
        .args(["devices", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config init"));
}

#[test]
fn test_unknown_profile_is_reported() {
    tailctl_cmd()
        .args(["--profile", "ghost", "devices", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ghost"));
}

#[test]
fn test_config_show_no_config() {
    tailctl_cmd().args(["config", "show"]).assert().success();
}

/// Config file with one value that fails to deserialize.
const MALFORMED_CONFIG: &str = r#"default_profile = "work"

[profiles.work]
tailnet = "example.com"
api_key = "tskey-api-work"
timeout = "thirty"

[profiles.home]
api_key = "tskey-api-home"
"#;

/// Point the binary at a temp config dir holding `contents` as config.toml.
fn with_config_file(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tailctl").join("config.toml");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, contents).unwrap();
    (dir, path)
}

#[test]
fn test_config_set_leaves_malformed_file_untouched() {
    let (dir, path) = with_config_file(MALFORMED_CONFIG);

    let output = tailctl_cmd()
        .env("XDG_CONFIG_HOME", dir.path())
        .args(["config", "set", "tailnet", "x"])
        .output()
        .unwrap();

    assert!(!output.status.success(), "{}", combined_output(&output));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), MALFORMED_CONFIG);
}

#[test]
fn test_malformed_config_is_not_reported_missing() {
    let (dir, _path) = with_config_file(MALFORMED_CONFIG);

    let output = tailctl_cmd()
        .env("XDG_CONFIG_HOME", dir.path())
        .args(["devices", "list"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let text = combined_output(&output);
    assert!(!text.contains("not found"), "unexpected output:\n{text}");
    assert!(text.contains("timeout"), "expected the bad key in:\n{text}");
}

#[test]
fn test_invalid_output_format() {
    let output = tailctl_cmd()
        .args(["--output", "invalid", "devices", "list"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("invalid") || text.contains("possible values"),
        "Expected error about valid output formats:\n{text}"
    );
}

#[test]
fn test_logs_require_a_window() {
    let output = tailctl_cmd().args(["logs", "audit"]).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("--start"));
}

#[test]
fn test_config_subcommands_exist() {
    tailctl_cmd()
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("init")
                .and(predicate::str::contains("show"))
                .and(predicate::str::contains("profiles"))
                .and(predicate::str::contains("use")),
        );
}

#[test]
fn test_devices_subcommands_exist() {
    tailctl_cmd()
        .args(["devices", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("list")
                .and(predicate::str::contains("authorize"))
                .and(predicate::str::contains("tags"))
                .and(predicate::str::contains("set-routes"))
                .and(predicate::str::contains("delete")),
        );
}

// ── Against a mock API ──────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_devices_list_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/tailnet/-/devices"))
        .and(header("authorization", "Basic YWJjMTIzOg=="))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "devices": [{"id": "n123", "name": "web-1.example.ts.net", "authorized": true}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let output = run_against(&server, &["-o", "json", "devices", "list"]).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    let stdout: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(stdout["devices"][0]["id"], "n123");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_devices_table_output() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/tailnet/example.com/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "devices": [{"id": "n123", "name": "web-1", "os": "linux", "tags": ["tag:web"]}]
        })))
        .mount(&server)
        .await;

    let output = run_against(&server, &["--tailnet", "example.com", "devices", "list"]).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("n123"));
    assert!(stdout.contains("tag:web"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_not_found_exit_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/device/missing"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(serde_json::json!({"message": "not found"})),
        )
        .mount(&server)
        .await;

    let output = run_against(&server, &["devices", "get", "missing"]).await;
    assert_eq!(output.status.code(), Some(4));
    assert!(combined_output(&output).contains("not found"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unauthorized_exit_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/tailnet/-/keys"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(serde_json::json!({"message": "API token invalid"})),
        )
        .mount(&server)
        .await;

    let output = run_against(&server, &["keys", "list"]).await;
    assert_eq!(output.status.code(), Some(3));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_acl_apply_skips_update_when_validation_fails() {
    let server = MockServer::start().await;
    let policy = "// tailnet policy\n{ \"acls\": [ ], }\n";

    Mock::given(method("POST"))
        .and(path("/api/v2/tailnet/-/acl/validate"))
        .and(body_string(policy))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(serde_json::json!({"message": "bad policy"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v2/tailnet/-/acl"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("policy.hujson");
    std::fs::write(&file, policy).unwrap();

    let output = run_against(&server, &["acl", "apply", file.to_str().unwrap()]).await;
    assert!(!output.status.success());
    assert!(combined_output(&output).contains("bad policy"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_acl_apply_updates_after_validation() {
    let server = MockServer::start().await;
    let policy = "{\"acls\":[{\"action\":\"accept\",\"src\":[\"*\"],\"dst\":[\"*:*\"]}]}";

    Mock::given(method("POST"))
        .and(path("/api/v2/tailnet/-/acl/validate"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v2/tailnet/-/acl"))
        .and(header("content-type", "application/hujson"))
        .and(body_string(policy))
        .respond_with(ResponseTemplate::new(200).set_body_string(policy))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("policy.json");
    std::fs::write(&file, policy).unwrap();

    let output = run_against(&server, &["acl", "apply", file.to_str().unwrap()]).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    assert!(String::from_utf8_lossy(&output.stdout).contains("\"accept\""));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_logs_since_sends_window() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/tailnet/-/logs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"logs": []})))
        .expect(1)
        .mount(&server)
        .await;

    let output = run_against(&server, &["-o", "raw", "logs", "audit", "--since", "15m"]).await;
    assert!(output.status.success(), "{}", combined_output(&output));

    let requests = server.received_requests().await.unwrap();
    let query = requests[0].url.query().unwrap_or_default().to_owned();
    assert!(query.starts_with("start="), "query was {query}");
    assert!(query.contains("&end="), "query was {query}");
    assert!(query.ends_with('Z'), "query was {query}");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_oauth_flags_exchange_token_first() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v2/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "tskey-access-xyz",
            "token_type": "Bearer",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/tailnet/-/dns/nameservers"))
        .and(header("authorization", "Bearer tskey-access-xyz"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"dns": ["8.8.8.8"]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let base_url = format!("{}/api/v2", server.uri());
    let output = tokio::task::spawn_blocking(move || {
        tailctl_cmd()
            .args([
                "--base-url",
                &base_url,
                "--oauth-client-id",
                "k123",
                "--oauth-client-secret",
                "tskey-client-s",
                "-o",
                "json-compact",
                "dns",
                "nameservers",
                "get",
            ])
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        r#"{"dns":["8.8.8.8"]}"#
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rejected_oauth_exchange_is_auth_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v2/oauth/token"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(serde_json::json!({"message": "invalid client"})),
        )
        .mount(&server)
        .await;

    let base_url = format!("{}/api/v2", server.uri());
    let output = tokio::task::spawn_blocking(move || {
        tailctl_cmd()
            .args([
                "--base-url",
                &base_url,
                "--oauth-client-id",
                "k123",
                "--oauth-client-secret",
                "wrong",
                "devices",
                "list",
            ])
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert_eq!(output.status.code(), Some(3));
    assert!(combined_output(&output).contains("invalid client"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_insecure_flag_warns() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/tailnet/-/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"devices": []})))
        .mount(&server)
        .await;

    let output = run_against(&server, &["-k", "-o", "json", "devices", "list"]).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert!(
        String::from_utf8_lossy(&output.stderr)
            .contains("TLS certificate verification is disabled")
    );
}
