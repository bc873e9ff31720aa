//! Command implementations and the dispatcher that wires them to the CLI.
//!
//! License: Apache-2.0

pub mod configure;
pub mod event;
pub mod vulnerability;

use anyhow::Result;
use chrono::Utc;
use lacework_core::Severity;
use std::io::{self, Write};

use crate::cli::{Cli, Commands, EventCommand, HostCommand, VulnerabilityCommand};
use crate::context::CliContext;
use crate::prompt::{CredentialPrompt, TerminalPrompt};

/// Rejects a bad `--severity` before any credentials or network are touched.
fn check_severity(severity: Option<&str>) -> Result<()> {
    if let Some(given) = severity {
        Severity::threshold(given)?;
    }
    Ok(())
}

/// Runs the parsed command. Results go to stdout, status messages to stderr.
pub fn dispatch(cli: &Cli) -> Result<()> {
    let ctx = CliContext::from_cli(cli)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match &cli.command {
        Commands::Configure(args) => {
            let mut terminal = TerminalPrompt::new(ctx.theme.clone(), ctx.enable_colors);
            let prompt: Option<&mut dyn CredentialPrompt> = if ctx.interactive { Some(&mut terminal) } else { None };
            configure::configure_profile(&ctx.config_path, &ctx.profile, ctx.credentials.clone(), args, prompt)?;
            ctx.success("You are all set!");
        }
        Commands::Event(EventCommand::List(args)) => {
            check_severity(args.severity.as_deref())?;
            let api = ctx.api_client()?;
            event::run_list(&api, args, ctx.json, Utc::now(), &mut out)?;
        }
        Commands::Event(EventCommand::Show { event_id }) => {
            let api = ctx.api_client()?;
            event::run_show(&api, &ctx.credentials.account, event_id, ctx.json, &mut out)?;
        }
        Commands::Event(EventCommand::Open { event_id }) => {
            event::run_open(&ctx.credentials.account, event_id)?;
        }
        Commands::Vulnerability(VulnerabilityCommand::Host(host)) => {
            if let HostCommand::ListCves { severity } | HostCommand::ShowAssessment { severity, .. } = host {
                check_severity(severity.as_deref())?;
            }
            let api = ctx.api_client()?;
            match host {
                HostCommand::ListCves { severity } => {
                    vulnerability::run_list_cves(&api, severity.as_deref(), ctx.json, &mut out)?
                }
                HostCommand::ListHosts { cve_id } => vulnerability::run_list_hosts(&api, cve_id, ctx.json, &mut out)?,
                HostCommand::ShowAssessment { machine_id, severity } => {
                    vulnerability::run_show_assessment(&api, machine_id, severity.as_deref(), ctx.json, &mut out)?
                }
                HostCommand::ScanPkgManifest { manifest } => {
                    vulnerability::run_scan_pkg_manifest(&api, manifest, &mut out)?
                }
            }
        }
    }

    out.flush()?;
    Ok(())
}
