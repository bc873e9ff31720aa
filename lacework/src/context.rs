//! Per-invocation CLI context.
//!
//! Resolves the configuration path, the active profile and the effective
//! credentials once, then hands them to commands together with the output
//! settings.
//!
//! Credential precedence, highest first: command-line flags, `LW_*`
//! environment variables (both resolved by clap), the selected profile in
//! the configuration file.
//!
//! License: Apache-2.0

use anyhow::{anyhow, Context, Result};
use is_terminal::IsTerminal;
use lacework_core::{default_config_path, Config, LaceworkError, ProfileDetails, DEFAULT_PROFILE};
use log::debug;
use std::io;
use std::path::PathBuf;

use crate::api::HttpClient;
use crate::cli::Cli;
use crate::ui::output_format;
use crate::ui::theme::{default_theme_map, ThemeMap};

pub struct CliContext {
    pub profile: String,
    pub config_path: PathBuf,
    /// Effective credentials after applying flags and environment.
    pub credentials: ProfileDetails,
    /// Whether `profile` exists in the configuration file.
    pub profile_found: bool,
    pub api_server_url: Option<String>,
    pub json: bool,
    pub interactive: bool,
    pub enable_colors: bool,
    pub theme: ThemeMap,
}

impl CliContext {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let config_path = match &cli.config {
            Some(path) => path.clone(),
            None => default_config_path()?,
        };
        let config = Config::load_or_default(&config_path)?;

        let stored = config.get(&cli.profile).ok().cloned();
        let profile_found = stored.is_some();
        debug!("profile '{}' found in {}: {}", cli.profile, config_path.display(), profile_found);

        let credentials = overlay_credentials(
            stored.unwrap_or_default(),
            cli.account.as_deref(),
            cli.api_key.as_deref(),
            cli.api_secret.as_deref(),
        );

        let interactive = !cli.noninteractive && io::stdin().is_terminal() && io::stdout().is_terminal();
        let enable_colors = !cli.nocolor && io::stderr().is_terminal();

        Ok(Self {
            profile: cli.profile.clone(),
            config_path,
            credentials,
            profile_found,
            api_server_url: cli.api_server_url.clone(),
            json: cli.json,
            interactive,
            enable_colors,
            theme: default_theme_map(),
        })
    }

    /// Verifies the effective credentials and opens an authenticated API client.
    pub fn api_client(&self) -> Result<HttpClient> {
        self.verify_credentials()?;
        if let Some(msg) = self.fallback_warning() {
            self.warn(msg);
        }
        HttpClient::authenticate(&self.credentials, self.api_server_url.as_deref())
            .context("unable to generate api client")
    }

    fn verify_credentials(&self) -> Result<()> {
        if !self.profile_found && self.profile != DEFAULT_PROFILE && self.credentials.verify().is_err() {
            return Err(anyhow!(LaceworkError::ProfileNotFound(self.profile.clone()))
                .context("unable to load credentials"));
        }
        self.credentials.verify().map_err(|err| {
            anyhow!(err).context("please configure the command-line: 'lacework configure'")
        })
    }

    /// Set when a named profile is missing from the file but flags or the
    /// environment supplied complete credentials anyway.
    fn fallback_warning(&self) -> Option<String> {
        if self.profile_found || self.profile == DEFAULT_PROFILE {
            return None;
        }
        Some(format!(
            "profile '{}' not found in {}, using credentials from flags and environment",
            self.profile,
            self.config_path.display()
        ))
    }

    pub fn success(&self, msg: impl AsRef<str>) {
        let _ = output_format::print_success_message(&mut io::stderr(), msg.as_ref(), &self.theme, self.enable_colors);
    }

    pub fn warn(&self, msg: impl AsRef<str>) {
        let _ = output_format::print_warn_message(&mut io::stderr(), msg.as_ref(), &self.theme, self.enable_colors);
    }
}

/// Replaces stored fields with any non-empty override.
pub fn overlay_credentials(
    mut base: ProfileDetails,
    account: Option<&str>,
    api_key: Option<&str>,
    api_secret: Option<&str>,
) -> ProfileDetails {
    if let Some(v) = account.filter(|v| !v.is_empty()) {
        base.account = v.to_string();
    }
    if let Some(v) = api_key.filter(|v| !v.is_empty()) {
        base.api_key = v.to_string();
    }
    if let Some(v) = api_secret.filter(|v| !v.is_empty()) {
        base.api_secret = v.to_string();
    }
    base
}
