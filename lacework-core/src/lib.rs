//! # Lacework Core Library
//!
//! `lacework-core` provides the platform-independent logic behind the
//! Lacework command-line client: the credential profile store and the
//! projection of API records into human-readable tables.
//!
//! The library performs no network access. The only I/O it does is reading
//! and rewriting the configuration file.
//!
//! ## Modules
//!
//! * `config`: The `~/.lacework.toml` profile store (`Config`, `ProfileDetails`).
//! * `severity`: Severity ranking, threshold filtering and stable severity sort.
//! * `models`: Typed records returned by the events and vulnerability endpoints.
//! * `report`: Per-record-kind table builders on top of one generic projector.
//! * `errors`: The `LaceworkError` type.
//!
//! ## Usage Example
//!
//! ```rust
//! use lacework_core::{Config, ProfileDetails, Severity};
//! use lacework_core::report::host_cves_table;
//!
//! let mut config = Config::default();
//! config.put("prod", ProfileDetails::new("acme", "ACME_KEY", "_secret"));
//! assert!(config.get("prod")?.verify().is_ok());
//!
//! let threshold = Severity::threshold("high")?;
//! assert!(host_cves_table(&[], Some(threshold)).is_none());
//! # Ok::<(), lacework_core::LaceworkError>(())
//! ```
//!
//! License: Apache-2.0

pub mod config;
pub mod errors;
pub mod models;
pub mod report;
pub mod severity;

/// Re-exports the profile store and its helpers.
pub use config::{
    default_config_path,
    format_secret,
    ApiKeyFile,
    Config,
    ProfileDetails,
    CONFIG_FILE_NAME,
    DEFAULT_PROFILE,
};

/// Re-exports the custom error type for clear error reporting.
pub use errors::{LaceworkError, ProfileField};

pub use report::{Border, DisplayTable};

pub use severity::{filter_by_threshold, sort_by_severity, Severity, VALID_SEVERITIES};
