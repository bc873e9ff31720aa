//! Configuration management for `lacework-core`.
//!
//! This module defines the credential profile store persisted at
//! `$HOME/.lacework.toml`. It handles TOML serialization/deserialization and
//! provides utilities for loading, updating, verifying and persisting the
//! named profiles.
//!
//! ```toml
//! updates = true
//!
//! [profiles.prod]
//! account = "prod"
//! api_key = "PROD_1234abcd"
//! api_secret = "_abcd1234"
//! ```
//!
//! License: Apache-2.0

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::errors::{LaceworkError, ProfileField};

/// File name of the configuration file inside the home directory.
pub const CONFIG_FILE_NAME: &str = ".lacework.toml";

/// Name of the profile used when none is selected.
pub const DEFAULT_PROFILE: &str = "default";

const CONFIG_FILE_TMP_SUFFIX: &str = "tmp";

/// One named set of credentials for a Lacework account.
#[derive(Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ProfileDetails {
    /// Account subdomain, i.e. `<ACCOUNT>.lacework.net`.
    pub account: String,
    pub api_key: String,
    pub api_secret: String,
}

impl fmt::Debug for ProfileDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProfileDetails")
            .field("account", &self.account)
            .field("api_key", &format_secret(4, &self.api_key))
            .field("api_secret", &format_secret(4, &self.api_secret))
            .finish()
    }
}

impl ProfileDetails {
    pub fn new(account: impl Into<String>, api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    /// Fails on the first empty required field, checked as account, api_key, api_secret.
    pub fn verify(&self) -> Result<(), LaceworkError> {
        if self.account.is_empty() {
            return Err(LaceworkError::MissingField(ProfileField::Account));
        }
        if self.api_key.is_empty() {
            return Err(LaceworkError::MissingField(ProfileField::ApiKey));
        }
        if self.api_secret.is_empty() {
            return Err(LaceworkError::MissingField(ProfileField::ApiSecret));
        }
        Ok(())
    }
}

/// The full contents of the configuration file: the updates flag plus every profile.
///
/// This is always the unit of persistence, so rewriting the file after
/// updating one profile never drops the `updates` flag.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub updates: bool,
    pub profiles: BTreeMap<String, ProfileDetails>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            updates: true,
            profiles: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Decodes the configuration file at `path`.
    ///
    /// A missing file is reported as [`LaceworkError::ConfigNotFound`]; callers
    /// that want the empty store instead should use [`Config::load_or_default`].
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, LaceworkError> {
        let path = path.as_ref();
        debug!("decoding config from {}", path.display());

        let text = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => LaceworkError::ConfigNotFound(path.to_path_buf()),
            _ => LaceworkError::ConfigIo {
                path: path.to_path_buf(),
                source: e,
            },
        })?;

        let config: Config = toml::from_str(&text).map_err(|source| LaceworkError::ConfigDecode {
            path: path.to_path_buf(),
            source,
        })?;

        debug!("loaded {} profiles from {}", config.profiles.len(), path.display());
        Ok(config)
    }

    /// Like [`Config::load_from_file`], but an absent file yields the default store.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, LaceworkError> {
        match Self::load_from_file(path) {
            Err(LaceworkError::ConfigNotFound(missing)) => {
                debug!("config {} does not exist, using defaults", missing.display());
                Ok(Self::default())
            }
            other => other,
        }
    }

    pub fn get(&self, name: &str) -> Result<&ProfileDetails, LaceworkError> {
        self.profiles
            .get(name)
            .ok_or_else(|| LaceworkError::ProfileNotFound(name.to_string()))
    }

    /// Inserts or overwrites a profile. Validation is the caller's job.
    pub fn put(&mut self, name: impl Into<String>, profile: ProfileDetails) {
        let name = name.into();
        debug!("storing profile '{}' for account '{}'", name, profile.account);
        self.profiles.insert(name, profile);
    }

    /// Serializes the whole configuration to TOML.
    pub fn to_toml_string(&self) -> Result<String, LaceworkError> {
        Ok(toml::to_string(self)?)
    }

    /// Rewrites the file at `path` with the full configuration, readable and
    /// writable by the owner only.
    ///
    /// The body goes to a fresh `<name>.tmp` sibling that is renamed over the
    /// target. A leftover tmp file from an earlier run is removed first and
    /// the tmp file is deleted again if any step fails.
    ///
    /// Owner-only permissions are enforced on Unix. Other platforms keep
    /// whatever access the parent directory grants.
    pub fn persist<P: AsRef<Path>>(&self, path: P) -> Result<(), LaceworkError> {
        let path = path.as_ref();
        let io_err = |source: std::io::Error| LaceworkError::ConfigIo {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let body = self.to_toml_string()?;
        let tmp_path = tmp_sibling(path);
        match fs::remove_file(&tmp_path) {
            Ok(()) => debug!("removed stale {}", tmp_path.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(io_err(e)),
        }

        if let Err(e) = write_owner_only(&tmp_path, body.as_bytes()).and_then(|_| fs::rename(&tmp_path, path)) {
            let _ = fs::remove_file(&tmp_path);
            return Err(io_err(e));
        }

        info!("stored {} profiles in {}", self.profiles.len(), path.display());
        Ok(())
    }
}

/// API key JSON file as downloaded from the Lacework web UI.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApiKeyFile {
    #[serde(rename = "keyId")]
    pub key_id: String,
    pub secret: String,
}

impl ApiKeyFile {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LaceworkError> {
        let path = path.as_ref();
        debug!("loading API key JSON file {}", path.display());
        let raw = fs::read_to_string(path).map_err(|source| LaceworkError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| LaceworkError::KeyFileDecode {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Returns `$HOME/.lacework.toml`.
pub fn default_config_path() -> Result<PathBuf, LaceworkError> {
    dirs::home_dir()
        .map(|home| home.join(CONFIG_FILE_NAME))
        .ok_or(LaceworkError::HomeDirNotFound)
}

/// Masks all but the last `visible` characters of a secret, e.g. `*******cdef`.
pub fn format_secret(visible: usize, secret: &str) -> String {
    let total = secret.chars().count();
    if total <= visible {
        return "*".repeat(total);
    }
    let shown: String = secret.chars().skip(total - visible).collect();
    format!("{}{}", "*".repeat(total - visible), shown)
}

fn tmp_sibling(path: &Path) -> PathBuf {
    let ext = path
        .extension()
        .map(|e| format!("{}.{}", e.to_string_lossy(), CONFIG_FILE_TMP_SUFFIX))
        .unwrap_or_else(|| CONFIG_FILE_TMP_SUFFIX.to_string());
    path.with_extension(ext)
}

/// Creates `path` (failing if anything exists there) and writes `body`.
fn write_owner_only(path: &Path, body: &[u8]) -> std::io::Result<()> {
    let mut file = new_file_options().open(path)?;
    file.write_all(body)?;
    file.flush()?;
    restrict_to_owner(path)
}

#[cfg(unix)]
fn new_file_options() -> OpenOptions {
    use std::os::unix::fs::OpenOptionsExt;
    let mut opts = OpenOptions::new();
    opts.write(true).create_new(true).mode(0o600);
    opts
}

#[cfg(not(unix))]
fn new_file_options() -> OpenOptions {
    let mut opts = OpenOptions::new();
    opts.write(true).create_new(true);
    opts
}

// Reapplied after writing so the result never depends on the umask.
#[cfg(unix)]
fn restrict_to_owner(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_to_owner(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
