//! errors.rs - Custom error types for the lacework-core library.
//!
//! This module defines a structured error enum for the library, providing
//! specific, actionable error types that callers can match on. The CLI wraps
//! these with `anyhow` context at the invocation boundary.
//!
//! License: Apache-2.0

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// The three required fields of a credential profile, in the order they are verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    Account,
    ApiKey,
    ApiSecret,
}

impl fmt::Display for ProfileField {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            ProfileField::Account => "account",
            ProfileField::ApiKey => "api_key",
            ProfileField::ApiSecret => "api_secret",
        };
        f.write_str(name)
    }
}

/// All error types produced by the `lacework-core` library.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum LaceworkError {
    #[error("unable to decode config {}: {source}", path.display())]
    ConfigDecode {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("config file {} not found", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("unable to access {}: {source}", path.display())]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to encode config: {0}")]
    ConfigEncode(#[from] toml::ser::Error),

    #[error("unable to decode API key file {}: {source}", path.display())]
    KeyFileDecode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0} missing")]
    MissingField(ProfileField),

    #[error("profile '{0}' not found")]
    ProfileNotFound(String),

    #[error("the severity {given} is not valid, use one of {valid}")]
    UnsupportedSeverity { given: String, valid: String },

    #[error("unable to locate the home directory")]
    HomeDirNotFound,
}
