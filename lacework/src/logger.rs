//! Logger initialization for the `lacework` binary.
//!
//! Log records always go to stderr so they never mix with tables or JSON on
//! stdout. Without an explicit level the filter is read from `LW_LOG`, then
//! `RUST_LOG`, and defaults to `warn`.
//!
//! License: Apache-2.0

use env_logger::{Builder, Env, Target};
use log::LevelFilter;

/// Environment variable holding an `env_logger` filter string for this CLI.
pub const LOG_ENV_VAR: &str = "LW_LOG";

/// Installs the global logger. Calling it more than once is harmless.
pub fn init_logger(level: Option<LevelFilter>) {
    let mut builder = build_logger(level, std::env::var(LOG_ENV_VAR).ok());
    let _ = builder.try_init();
}

fn build_logger(level: Option<LevelFilter>, lw_log: Option<String>) -> Builder {
    let mut builder = match (level, lw_log) {
        (Some(level), _) => {
            let mut b = Builder::new();
            b.filter_level(level);
            b
        }
        (None, Some(filters)) => {
            let mut b = Builder::new();
            b.parse_filters(&filters);
            b
        }
        (None, None) => Builder::from_env(Env::default().default_filter_or("warn")),
    };
    builder.target(Target::Stderr).format_timestamp_secs();
    builder
}
