//! `lacework vulnerability host` subcommands.
//!
//! License: Apache-2.0

use anyhow::{Context, Result};
use lacework_core::report::{host_assessment_cves_table, host_cves_table, host_details_table, hosts_table};
use lacework_core::Severity;
use log::{debug, info};
use std::io::Write;

use crate::api::LaceworkApi;
use crate::ui::output_format::{write_json, write_tables};

pub const NO_CVES: &str = "There are no CVEs in your account.";
pub const NO_CVES_WITH_SEVERITY: &str = "There are no CVEs with the specified severity.";
pub const NO_ASSESSMENT_CVES: &str = "There are no vulnerabilities in this host assessment.";
pub const NO_ASSESSMENT_CVES_WITH_SEVERITY: &str = "There are no vulnerabilities with the specified severity.";

fn parse_threshold(severity: Option<&str>) -> Result<Option<Severity>> {
    Ok(severity.map(Severity::threshold).transpose()?)
}

pub fn run_list_cves<A, W>(api: &A, severity: Option<&str>, json: bool, out: &mut W) -> Result<()>
where
    A: LaceworkApi + ?Sized,
    W: Write,
{
    let threshold = parse_threshold(severity)?;

    info!("requesting the CVEs found in the hosts of the account");
    let cves = api.list_host_cves().context("unable to get CVEs from hosts")?;
    debug!("received {} CVEs", cves.len());

    if json {
        return write_json(out, &cves);
    }

    match host_cves_table(&cves, threshold) {
        Some(table) => write!(out, "{}", table.render())?,
        None if cves.is_empty() => writeln!(out, "{}", NO_CVES)?,
        None => writeln!(out, "{}", NO_CVES_WITH_SEVERITY)?,
    }
    Ok(())
}

pub fn run_list_hosts<A, W>(api: &A, cve_id: &str, json: bool, out: &mut W) -> Result<()>
where
    A: LaceworkApi + ?Sized,
    W: Write,
{
    info!("requesting the hosts affected by {}", cve_id);
    let hosts = api
        .list_hosts_with_cve(cve_id)
        .with_context(|| format!("unable to get hosts with CVE {}", cve_id))?;

    if json {
        return write_json(out, &hosts);
    }

    match hosts_table(&hosts) {
        Some(table) => write!(out, "{}", table.render())?,
        None => writeln!(out, "There are no hosts in your account with CVE id '{}'", cve_id)?,
    }
    Ok(())
}

pub fn run_show_assessment<A, W>(api: &A, machine_id: &str, severity: Option<&str>, json: bool, out: &mut W) -> Result<()>
where
    A: LaceworkApi + ?Sized,
    W: Write,
{
    let threshold = parse_threshold(severity)?;

    info!("requesting host assessment for machine {}", machine_id);
    let assessment = api
        .host_assessment(machine_id)
        .with_context(|| format!("unable to get host assessment with id {}", machine_id))?;

    if json {
        return write_json(out, &assessment);
    }

    let mut tables = vec![host_details_table(&assessment.host)];
    let cves = host_assessment_cves_table(&assessment, threshold);
    let found = cves.is_some();
    tables.extend(cves);
    write_tables(out, &tables)?;

    if !found {
        let msg = if threshold.is_some() { NO_ASSESSMENT_CVES_WITH_SEVERITY } else { NO_ASSESSMENT_CVES };
        writeln!(out, "\n{}", msg)?;
    }
    Ok(())
}

/// The scan response is always emitted as JSON.
pub fn run_scan_pkg_manifest<A, W>(api: &A, manifest: &str, out: &mut W) -> Result<()>
where
    A: LaceworkApi + ?Sized,
    W: Write,
{
    serde_json::from_str::<serde_json::Value>(manifest).context("the package manifest is not valid JSON")?;

    info!("requesting an on-demand host vulnerability scan");
    let response = api
        .scan_pkg_manifest(manifest)
        .context("unable to request an on-demand host vulnerability scan")?;
    write_json(out, &response)
}
