//! `lacework configure`: creates or updates a profile in the config file.
//!
//! License: Apache-2.0

use anyhow::{Context, Result};
use lacework_core::{ApiKeyFile, Config, ProfileDetails, DEFAULT_PROFILE};
use log::{debug, info};
use std::path::Path;

use crate::cli::ConfigureArgs;
use crate::prompt::CredentialPrompt;

/// Builds the profile from the current values, the optional API key file and
/// the prompt, then stores it under `profile` in the file at `config_path`.
///
/// The rest of the file (other profiles and the `updates` flag) is kept.
pub fn configure_profile(
    config_path: &Path,
    profile: &str,
    current: ProfileDetails,
    args: &ConfigureArgs,
    prompt: Option<&mut dyn CredentialPrompt>,
) -> Result<ProfileDetails> {
    let mut details = current;

    if details.account.is_empty() && profile != DEFAULT_PROFILE {
        debug!("using profile name '{}' as account", profile);
        details.account = profile.to_string();
    }

    if let Some(json_file) = &args.json_file {
        let keys = ApiKeyFile::load(json_file)
            .with_context(|| format!("unable to load keys from the provided json file {}", json_file.display()))?;
        details.api_key = keys.key_id;
        details.api_secret = keys.secret;
    }

    if let Some(prompt) = prompt {
        details = prompt.ask(&details)?;
    }

    details.verify().context("unable to configure the command-line")?;

    let mut config = Config::load_or_default(config_path).context("unable to configure the command-line")?;
    config.put(profile, details.clone());
    config.persist(config_path).context("unable to configure the command-line")?;

    info!("profile '{}' stored in {}", profile, config_path.display());
    Ok(details)
}
