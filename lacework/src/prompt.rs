//! Interactive credential prompts for `lacework configure`.
//!
//! Every question shows the current value as its default; pressing enter
//! keeps it. The secret is read without echo and displayed masked.
//!
//! License: Apache-2.0

use anyhow::{Context, Result};
use lacework_core::{format_secret, ProfileDetails};
use std::io::{self, BufRead, Write};

use crate::ui::output_format::style_prompt;
use crate::ui::theme::ThemeMap;

/// Minimum length of an access key id accepted at the prompt.
pub const MIN_API_KEY_LEN: usize = 55;
/// Minimum length of a secret access key accepted at the prompt.
pub const MIN_API_SECRET_LEN: usize = 30;

/// Source of credentials during interactive configuration.
pub trait CredentialPrompt {
    fn ask(&mut self, current: &ProfileDetails) -> Result<ProfileDetails>;
}

pub fn validate_account(input: &str) -> Result<(), String> {
    if input.is_empty() {
        return Err("The account subdomain cannot be empty".to_string());
    }
    Ok(())
}

pub fn validate_api_key(input: &str) -> Result<(), String> {
    if input.chars().count() < MIN_API_KEY_LEN {
        return Err("The API access key id must have more than 55 characters".to_string());
    }
    Ok(())
}

/// An empty input is accepted when a secret is already stored.
pub fn validate_api_secret(input: &str, current: &str) -> Result<(), String> {
    if input.is_empty() && !current.is_empty() {
        return Ok(());
    }
    if input.chars().count() < MIN_API_SECRET_LEN {
        return Err("The API secret access key must have more than 30 characters".to_string());
    }
    Ok(())
}

/// Prompts on stderr and reads answers from stdin.
pub struct TerminalPrompt {
    theme: ThemeMap,
    enable_colors: bool,
}

/// The question shown for `label`, with the current value as its default.
pub fn prompt_label(label: &str, current: &str) -> String {
    if current.is_empty() {
        format!("{}: ", label)
    } else {
        format!("{} ({}): ", label, current)
    }
}

impl TerminalPrompt {
    pub fn new(theme: ThemeMap, enable_colors: bool) -> Self {
        Self { theme, enable_colors }
    }

    fn styled(&self, text: &str) -> String {
        style_prompt(text, &self.theme, self.enable_colors)
    }

    fn question(
        &self,
        label: &str,
        current: &str,
        validate: impl Fn(&str) -> Result<(), String>,
    ) -> Result<String> {
        let stdin = io::stdin();
        loop {
            let mut stderr = io::stderr();
            write!(stderr, "{}", self.styled(&prompt_label(label, current)))?;
            stderr.flush()?;

            let mut line = String::new();
            if stdin.lock().read_line(&mut line).context("unable to read answer")? == 0 {
                anyhow::bail!("input closed while configuring the command-line");
            }
            let answer = match line.trim() {
                "" => current.to_string(),
                given => given.to_string(),
            };
            match validate(&answer) {
                Ok(()) => return Ok(answer),
                Err(msg) => writeln!(stderr, "X Sorry, your reply was invalid: {}", msg)?,
            }
        }
    }

    fn secret(&self, current: &str) -> Result<String> {
        let masked = if current.is_empty() { String::new() } else { format_secret(4, current) };
        loop {
            let label = self.styled(&prompt_label("Secret Access Key", &masked));
            let answer = rpassword::prompt_password(label).context("unable to read secret access key")?;
            let answer = answer.trim().to_string();
            match validate_api_secret(&answer, current) {
                Ok(()) if answer.is_empty() => return Ok(current.to_string()),
                Ok(()) => return Ok(answer),
                Err(msg) => eprintln!("X Sorry, your reply was invalid: {}", msg),
            }
        }
    }
}

impl CredentialPrompt for TerminalPrompt {
    fn ask(&mut self, current: &ProfileDetails) -> Result<ProfileDetails> {
        let account = self.question("Account", &current.account, validate_account)?;
        let api_key = self.question("Access Key ID", &current.api_key, validate_api_key)?;
        let api_secret = self.secret(&current.api_secret)?;
        Ok(ProfileDetails::new(account, api_key, api_secret))
    }
}
