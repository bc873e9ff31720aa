// lacework-core/tests/config_integration_tests.rs
use anyhow::Result;
use std::fs;
use std::io::Write;
use tempfile::{tempdir, NamedTempFile};
use test_log::test;

use lacework_core::config::{ApiKeyFile, Config, ProfileDetails};
use lacework_core::errors::LaceworkError;

fn write_config(contents: &str) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    file.write_all(contents.as_bytes())?;
    Ok(file)
}

#[test]
fn test_load_updates_flag_and_profile() -> Result<()> {
    let file = write_config(
        r#"
updates = false

[profiles.prod]
account = "prod"
api_key = "PROD_1234abcd"
api_secret = "_abcd1234"
"#,
    )?;

    let config = Config::load_from_file(file.path())?;
    assert!(!config.updates);
    let prod = config.get("prod")?;
    assert_eq!(prod, &ProfileDetails::new("prod", "PROD_1234abcd", "_abcd1234"));
    Ok(())
}

#[test]
fn test_load_missing_file() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("does-not-exist.toml");

    let err = Config::load_from_file(&path).unwrap_err();
    assert!(matches!(err, LaceworkError::ConfigNotFound(ref p) if p == &path));

    let config = Config::load_or_default(&path)?;
    assert!(config.updates);
    assert!(config.profiles.is_empty());
    Ok(())
}

#[test]
fn test_load_malformed_file_is_fatal() -> Result<()> {
    let file = write_config("[profiles.prod\naccount = ")?;
    let err = Config::load_from_file(file.path()).unwrap_err();
    assert!(matches!(err, LaceworkError::ConfigDecode { .. }));
    assert!(err.to_string().starts_with("unable to decode config"));

    // the default substitution only covers a missing file
    assert!(Config::load_or_default(file.path()).is_err());
    Ok(())
}

#[test]
fn test_unknown_keys_are_ignored() -> Result<()> {
    let file = write_config(
        r#"
updates = true
telemetry = "off"

[profiles.dev]
account = "dev"
api_key = "DEV_1234abcd"
api_secret = "_abcd1234"
region = "us"
"#,
    )?;
    let config = Config::load_from_file(file.path())?;
    assert_eq!(config.get("dev")?.account, "dev");
    Ok(())
}

#[test]
fn test_missing_profile_fields_decode_as_empty() -> Result<()> {
    let file = write_config("[profiles.partial]\naccount = \"acme\"\n")?;
    let config = Config::load_from_file(file.path())?;
    let partial = config.get("partial")?;
    assert!(config.updates);
    assert!(partial.api_key.is_empty());
    assert_eq!(partial.verify().unwrap_err().to_string(), "api_key missing");
    Ok(())
}

#[test]
fn test_persist_then_load_round_trip() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join(".lacework.toml");

    let mut config = Config::default();
    config.updates = false;
    config.put("default", ProfileDetails::new("test", "TEST_1234abcd", "_abcd1234"));
    config.put("prod", ProfileDetails::new("prod", "PROD_1234abcd", "_wxyz9876"));
    config.persist(&path)?;

    let loaded = Config::load_from_file(&path)?;
    assert_eq!(loaded, config);
    Ok(())
}

#[test]
fn test_persist_rewrites_full_config_keeping_flag() -> Result<()> {
    let file = write_config(
        r#"
updates = false

[profiles.dev]
account = "dev"
api_key = "DEV_1234abcd"
api_secret = "_abcd1234"
"#,
    )?;

    let mut config = Config::load_from_file(file.path())?;
    config.put("prod", ProfileDetails::new("prod", "PROD_1234abcd", "_abcd1234"));
    config.persist(file.path())?;

    let text = fs::read_to_string(file.path())?;
    assert!(text.contains("updates = false"));
    assert!(text.contains("[profiles.dev]"));
    assert!(text.contains("[profiles.prod]"));

    let reloaded = Config::load_from_file(file.path())?;
    assert!(!reloaded.updates);
    assert_eq!(reloaded.profiles.len(), 2);
    Ok(())
}

#[test]
fn test_persist_creates_parent_directory() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("nested").join("config.toml");
    Config::default().persist(&path)?;
    assert!(path.exists());
    assert!(!dir.path().join("nested").join("config.toml.tmp").exists());
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_persist_restricts_permissions_to_owner() -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir()?;
    let path = dir.path().join(".lacework.toml");
    fs::write(&path, "updates = true\n")?;
    fs::set_permissions(&path, fs::Permissions::from_mode(0o644))?;

    let mut config = Config::default();
    config.put("default", ProfileDetails::new("a", "b", "c"));
    config.persist(&path)?;

    let mode = fs::metadata(&path)?.permissions().mode() & 0o777;
    assert_eq!(mode, 0o600);
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_persist_replaces_stale_tmp_file() -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir()?;
    let path = dir.path().join(".lacework.toml");
    let stale = dir.path().join(".lacework.toml.tmp");
    fs::write(&stale, "leftover from an interrupted run")?;
    fs::set_permissions(&stale, fs::Permissions::from_mode(0o644))?;

    let mut config = Config::default();
    config.put("default", ProfileDetails::new("acme", "ACME_KEY", "_acme_secret"));
    config.persist(&path)?;

    let mode = fs::metadata(&path)?.permissions().mode() & 0o777;
    assert_eq!(mode, 0o600);
    assert!(!stale.exists());
    assert_eq!(Config::load_from_file(&path)?, config);
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_persist_does_not_follow_tmp_symlink() -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir()?;
    let path = dir.path().join(".lacework.toml");
    let target = dir.path().join("elsewhere.txt");
    fs::write(&target, "untouched")?;
    fs::set_permissions(&target, fs::Permissions::from_mode(0o644))?;
    std::os::unix::fs::symlink(&target, dir.path().join(".lacework.toml.tmp"))?;

    Config::default().persist(&path)?;

    assert_eq!(fs::read_to_string(&target)?, "untouched");
    assert_eq!(fs::metadata(&target)?.permissions().mode() & 0o777, 0o644);
    assert_eq!(fs::metadata(&path)?.permissions().mode() & 0o777, 0o600);
    Ok(())
}

#[test]
fn test_persist_failure_leaves_no_tmp_file() -> Result<()> {
    let dir = tempdir()?;
    // a directory at the target path makes the final rename fail
    let path = dir.path().join("occupied");
    fs::create_dir(&path)?;
    fs::write(path.join("keep"), "x")?;

    let err = Config::default().persist(&path).unwrap_err();
    assert!(matches!(err, LaceworkError::ConfigIo { .. }));
    assert!(!dir.path().join("occupied.tmp").exists());
    Ok(())
}

#[test]
fn test_load_api_key_file() -> Result<()> {
    let file = write_config(r#"{"keyId": "ACME_ABCDEF", "secret": "_123456", "keyType": "admin"}"#)?;
    let keys = ApiKeyFile::load(file.path())?;
    assert_eq!(keys.key_id, "ACME_ABCDEF");
    assert_eq!(keys.secret, "_123456");

    let broken = write_config("not json")?;
    assert!(matches!(ApiKeyFile::load(broken.path()), Err(LaceworkError::KeyFileDecode { .. })));
    Ok(())
}
