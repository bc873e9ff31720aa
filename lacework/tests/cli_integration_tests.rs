// lacework/tests/cli_integration_tests.rs
//! Command-line integration tests for the `lacework` binary.
//!
//! Every run points `--config` at a temporary file and clears the `LW_*`
//! environment so the developer's own profile never leaks into a test.
//! HTTP calls go to a local `mockito` server through `LW_API_SERVER_URL`.

use anyhow::Result;
use assert_cmd::Command;
use lacework_core::Config;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const LW_ENV: [&str; 7] = [
    "LW_PROFILE",
    "LW_ACCOUNT",
    "LW_API_KEY",
    "LW_API_SECRET",
    "LW_CONFIG",
    "LW_API_SERVER_URL",
    "LW_LOG",
];

fn lacework(config: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo_bin!("lacework"));
    for var in LW_ENV {
        cmd.env_remove(var);
    }
    cmd.env("RUST_LOG", "debug");
    cmd.arg("--config").arg(config).arg("--noninteractive").arg("--nocolor");
    cmd
}

fn strip(bytes: &[u8]) -> String {
    String::from_utf8(strip_ansi_escapes::strip(bytes)).unwrap()
}

#[test]
fn configure_noninteractive_writes_profile() -> Result<()> {
    let dir = tempdir()?;
    let config = dir.path().join(".lacework.toml");

    lacework(&config)
        .args(["configure", "-a", "acme", "-k", "ACME_KEY", "-s", "_acme_secret"])
        .assert()
        .success()
        .stderr(predicate::str::contains("You are all set!"));

    let stored = Config::load_from_file(&config)?;
    assert!(stored.updates);
    let default = stored.get("default")?;
    assert_eq!(default.account, "acme");
    assert_eq!(default.api_key, "ACME_KEY");
    assert_eq!(default.api_secret, "_acme_secret");
    Ok(())
}

#[test]
fn configure_reads_credentials_from_environment() -> Result<()> {
    let dir = tempdir()?;
    let config = dir.path().join(".lacework.toml");

    lacework(&config)
        .env("LW_ACCOUNT", "envacct")
        .env("LW_API_KEY", "ENV_KEY")
        .env("LW_API_SECRET", "_env_secret")
        .args(["configure", "--profile", "staging"])
        .assert()
        .success();

    let stored = Config::load_from_file(&config)?;
    assert_eq!(stored.get("staging")?.account, "envacct");
    Ok(())
}

#[test]
fn configure_named_profile_uses_name_as_account() -> Result<()> {
    let dir = tempdir()?;
    let config = dir.path().join(".lacework.toml");

    lacework(&config)
        .args(["configure", "-p", "prod", "-k", "PROD_KEY", "-s", "_prod_secret"])
        .assert()
        .success();

    assert_eq!(Config::load_from_file(&config)?.get("prod")?.account, "prod");
    Ok(())
}

#[test]
fn configure_with_json_file() -> Result<()> {
    let dir = tempdir()?;
    let config = dir.path().join(".lacework.toml");
    let keys = dir.path().join("ACME_KEYS.json");
    fs::write(&keys, r#"{"keyId": "JSON_KEY", "secret": "_json_secret"}"#)?;

    lacework(&config)
        .args(["configure", "-a", "acme", "--json_file"])
        .arg(&keys)
        .assert()
        .success();

    let stored = Config::load_from_file(&config)?;
    assert_eq!(stored.get("default")?.api_key, "JSON_KEY");
    Ok(())
}

#[test]
fn configure_missing_secret_fails() -> Result<()> {
    let dir = tempdir()?;
    let config = dir.path().join(".lacework.toml");

    let output = lacework(&config)
        .args(["configure", "-a", "acme", "-k", "ACME_KEY"])
        .output()?;
    assert!(!output.status.success());
    let stderr = strip(&output.stderr);
    assert!(stderr.contains("unable to configure the command-line: api_secret missing"), "{}", stderr);
    assert!(!config.exists());
    Ok(())
}

#[test]
fn malformed_config_is_reported() -> Result<()> {
    let dir = tempdir()?;
    let config = dir.path().join(".lacework.toml");
    fs::write(&config, "[profiles.default\naccount = ")?;

    lacework(&config)
        .args(["event", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unable to decode config"));
    Ok(())
}

#[test]
fn invalid_severity_is_rejected_before_any_request() -> Result<()> {
    let dir = tempdir()?;
    let config = dir.path().join(".lacework.toml");

    lacework(&config)
        .args(["event", "list", "--severity", "bogus"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "the severity bogus is not valid, use one of critical, high, medium, low, info",
        ));

    lacework(&config)
        .args(["vulnerability", "host", "list-cves", "--severity", "urgent"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("the severity urgent is not valid"));
    Ok(())
}

#[test]
fn unknown_profile_is_reported() -> Result<()> {
    let dir = tempdir()?;
    let config = dir.path().join(".lacework.toml");

    lacework(&config)
        .args(["event", "list", "--profile", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("profile 'ghost' not found"));
    Ok(())
}

#[test]
fn event_open_rejects_non_numeric_id() -> Result<()> {
    let dir = tempdir()?;
    let config = dir.path().join(".lacework.toml");

    lacework(&config)
        .args(["event", "open", "abc", "-a", "acme"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid event id abc. Event id should be a numeric value"));
    Ok(())
}

#[test]
fn event_list_against_mock_server() -> Result<()> {
    let dir = tempdir()?;
    let config = dir.path().join(".lacework.toml");
    let mut server = mockito::Server::new();

    let token = server
        .mock("POST", "/api/v1/access/tokens")
        .match_header("X-LW-UAKS", "_acme_secret")
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(r#"{"ok": true, "message": "SUCCESS", "data": [{"token": "_tok", "expiresAt": "2020-05-10T13:00:00Z"}]}"#)
        .expect(2)
        .create();

    let events = server
        .mock("GET", "/api/v1/external/events/GetEventsForDateRange")
        .match_query(mockito::Matcher::Any)
        .match_header("Authorization", "_tok")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"data": [
                {"EVENT_ID": "11", "EVENT_TYPE": "NewUser", "SEVERITY": "4",
                 "START_TIME": "2020-05-01T10:00:00Z", "END_TIME": "2020-05-01T11:00:00Z"},
                {"EVENT_ID": "12", "EVENT_TYPE": "NewExternalServerIp", "SEVERITY": "1",
                 "START_TIME": "2020-05-02T10:00:00Z", "END_TIME": "2020-05-02T11:00:00Z"},
                {"EVENT_ID": "13", "EVENT_TYPE": "NewVPC", "SEVERITY": "3",
                 "START_TIME": "2020-05-03T10:00:00Z", "END_TIME": "2020-05-03T11:00:00Z"}
            ]}"#,
        )
        .expect(2)
        .create();

    let output = lacework(&config)
        .env("LW_API_SERVER_URL", server.url())
        .args(["-a", "acme", "-k", "ACME_KEY", "-s", "_acme_secret"])
        .args(["event", "list", "--severity", "medium"])
        .output()?;
    assert!(output.status.success(), "{}", strip(&output.stderr));
    let stdout = strip(&output.stdout);
    let critical = stdout.find("NewExternalServerIp").expect("critical event listed");
    let medium = stdout.find("NewVPC").expect("medium event listed");
    assert!(critical < medium);
    assert!(!stdout.contains("NewUser"));

    let output = lacework(&config)
        .env("LW_API_SERVER_URL", server.url())
        .args(["-a", "acme", "-k", "ACME_KEY", "-s", "_acme_secret"])
        .args(["event", "list", "--severity", "critical", "--json"])
        .output()?;
    assert!(output.status.success());
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(parsed.as_array().map(|a| a.len()), Some(1));
    assert_eq!(parsed[0]["EVENT_ID"], "12");

    token.assert();
    events.assert();
    Ok(())
}

#[test]
fn event_list_prints_no_events_message() -> Result<()> {
    let dir = tempdir()?;
    let config = dir.path().join(".lacework.toml");
    let mut server = mockito::Server::new();

    server
        .mock("POST", "/api/v1/access/tokens")
        .with_status(201)
        .with_body(r#"{"data": [{"token": "_tok"}]}"#)
        .create();
    server
        .mock("GET", "/api/v1/external/events/GetEventsForDateRange")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_body(r#"{"data": []}"#)
        .create();

    lacework(&config)
        .env("LW_API_SERVER_URL", server.url())
        .args(["-a", "acme", "-k", "ACME_KEY", "-s", "_acme_secret", "event", "list", "--days", "1"])
        .assert()
        .success()
        .stdout("There are no events in your account in the specified time range.\n");
    Ok(())
}

#[test]
fn unknown_profile_with_flag_credentials_warns() -> Result<()> {
    let dir = tempdir()?;
    let config = dir.path().join(".lacework.toml");
    let mut server = mockito::Server::new();
    server
        .mock("POST", "/api/v1/access/tokens")
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(r#"{"ok": true, "data": [{"token": "_tok", "expiresAt": "2020-05-10T13:00:00Z"}]}"#)
        .create();
    server
        .mock("GET", "/api/v1/external/vulnerabilities/host")
        .with_status(200)
        .with_body(r#"{"ok": true, "data": []}"#)
        .create();

    let output = lacework(&config)
        .env("LW_API_SERVER_URL", server.url())
        .args(["--profile", "ghost", "-a", "acme", "-k", "ACME_KEY", "-s", "_acme_secret"])
        .args(["vulnerability", "host", "list-cves"])
        .output()?;
    assert!(output.status.success(), "{}", strip(&output.stderr));
    let stderr = strip(&output.stderr);
    assert!(
        stderr.contains("profile 'ghost' not found in") && stderr.contains("using credentials from flags and environment"),
        "{}",
        stderr
    );
    assert_eq!(strip(&output.stdout), "There are no CVEs in your account.\n");
    Ok(())
}
