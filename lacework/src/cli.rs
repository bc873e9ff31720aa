//! This file defines the command-line interface (CLI) for the lacework
//! application, including all available commands and their arguments.
//!
//! Parsed values are plain structs handed to each command; there is no
//! global command state.
//!
//! License: Apache-2.0

use clap::{Args, Parser, Subcommand};
use lacework_core::DEFAULT_PROFILE;
use log::LevelFilter;
use std::path::PathBuf;

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "lacework",
    version = env!("CARGO_PKG_VERSION"),
    about = "A tool to manage the Lacework cloud security platform.",
    long_about = "The Lacework Command Line Interface is a tool that helps you manage the Lacework cloud security platform. Use it to inspect events, review host vulnerability assessments and manage the credential profiles stored in ~/.lacework.toml.",
    arg_required_else_help = true
)]
pub struct Cli {
    /// Switch between profiles configured at ~/.lacework.toml
    #[arg(long, short = 'p', env = "LW_PROFILE", default_value = DEFAULT_PROFILE, global = true)]
    pub profile: String,

    /// Account subdomain of URL (i.e. <ACCOUNT>.lacework.net)
    #[arg(long, short = 'a', env = "LW_ACCOUNT", global = true)]
    pub account: Option<String>,

    /// Access key id
    #[arg(long = "api_key", short = 'k', env = "LW_API_KEY", global = true)]
    pub api_key: Option<String>,

    /// Secret access key
    #[arg(long = "api_secret", short = 's', env = "LW_API_SECRET", hide_env_values = true, global = true)]
    pub api_secret: Option<String>,

    /// Path to the configuration file (default: ~/.lacework.toml)
    #[arg(long = "config", value_name = "FILE", env = "LW_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Override the API server URL (default: https://<ACCOUNT>.lacework.net)
    #[arg(long = "api_server_url", env = "LW_API_SERVER_URL", hide = true, global = true)]
    pub api_server_url: Option<String>,

    /// Switch commands output from human-readable to json format
    #[arg(long, global = true)]
    pub json: bool,

    /// Turn off colors
    #[arg(long, global = true)]
    pub nocolor: bool,

    /// Turn off interactive mode (disable spinners, prompts, etc.)
    #[arg(long, global = true)]
    pub noninteractive: bool,

    /// Turn on debug logging
    #[arg(long, short = 'd', global = true)]
    pub debug: bool,

    /// Suppress all log output
    #[arg(long, short = 'q', global = true, conflicts_with = "debug")]
    pub quiet: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Explicit log level requested by flags; `None` defers to the environment.
    pub fn log_level(&self) -> Option<LevelFilter> {
        if self.quiet {
            Some(LevelFilter::Off)
        } else if self.debug {
            Some(LevelFilter::Debug)
        } else {
            None
        }
    }
}

/// All available commands for the `lacework` CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Configure the Lacework CLI
    #[command(long_about = "Configure settings that the Lacework CLI uses to interact with the Lacework platform. These include your Lacework account, API access key and secret.\n\nIf this command is run with no arguments, the Lacework CLI will store all settings under the default profile. You can configure multiple profiles by using the --profile argument. If a config file does not exist (the default location is ~/.lacework.toml), the Lacework CLI will create it for you.")]
    Configure(ConfigureArgs),

    /// Inspect Lacework events
    #[command(subcommand, visible_alias = "events")]
    Event(EventCommand),

    /// View vulnerability reports
    #[command(subcommand, visible_alias = "vul")]
    Vulnerability(VulnerabilityCommand),
}

/// Arguments for the `configure` command.
#[derive(Args, Debug, Default)]
pub struct ConfigureArgs {
    /// Loads the generated API key JSON file from the WebUI
    #[arg(long = "json_file", short = 'j', value_name = "FILE")]
    pub json_file: Option<PathBuf>,
}

/// Subcommands for the `event` command.
#[derive(Subcommand, Debug)]
pub enum EventCommand {
    /// List all events (default last 7 days)
    #[command(long_about = "List all events for the last 7 days by default, or pass --start and --end to specify a custom time period. You can also pass --severity to filter by a severity threshold.\n\nFor example, to list all events from the last day with severity medium and above (Critical, High and Medium) run:\n\n    $ lacework events list --severity medium --days 1")]
    List(EventListArgs),

    /// Show details about a specific event
    Show {
        /// The numeric event id
        event_id: String,
    },

    /// Open a specified event in a web browser
    Open {
        /// The numeric event id
        event_id: String,
    },
}

/// Arguments for `event list`.
#[derive(Args, Debug, Default, Clone)]
pub struct EventListArgs {
    /// Start of the time range in UTC (format: yyyy-MM-ddTHH:mm:ssZ)
    #[arg(long)]
    pub start: Option<String>,

    /// End of the time range in UTC (format: yyyy-MM-ddTHH:mm:ssZ)
    #[arg(long)]
    pub end: Option<String>,

    /// List events for specified number of days (max: 7 days)
    #[arg(long, conflicts_with_all = ["start", "end"])]
    pub days: Option<u32>,

    /// Filter events by severity threshold (critical, high, medium, low, info)
    #[arg(long)]
    pub severity: Option<String>,
}

/// Subcommands for the `vulnerability` command.
#[derive(Subcommand, Debug)]
pub enum VulnerabilityCommand {
    /// Host vulnerability assessments
    #[command(subcommand)]
    Host(HostCommand),
}

/// Subcommands for `vulnerability host`.
#[derive(Subcommand, Debug)]
pub enum HostCommand {
    /// List the CVEs found in the hosts of your environment
    ListCves {
        /// Only show packages at or above this severity
        #[arg(long)]
        severity: Option<String>,
    },

    /// List the hosts with a common CVE id in your environment
    ListHosts {
        /// The CVE id, i.e. CVE-2020-1234
        cve_id: String,
    },

    /// Show results of a host vulnerability assessment
    #[command(visible_alias = "show")]
    ShowAssessment {
        /// The machine id of the host
        machine_id: String,

        /// Only show packages at or above this severity
        #[arg(long)]
        severity: Option<String>,
    },

    /// Request an on-demand host vulnerability assessment from a package-manifest
    #[command(visible_alias = "manifest")]
    ScanPkgManifest {
        /// The package manifest as a JSON string
        manifest: String,
    },
}
