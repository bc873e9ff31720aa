//! `lacework event` subcommands: list, show and open.
//!
//! License: Apache-2.0

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Duration, Utc};
use lacework_core::report::{entity_map_tables, event_details_table, events_table, rank_events};
use lacework_core::Severity;
use log::{debug, info};
use std::io::Write;
use std::process::Command;

use crate::api::LaceworkApi;
use crate::cli::EventListArgs;
use crate::ui::output_format::{write_json, write_tables};

/// Span covered by `event list` when no range is given.
pub const DEFAULT_RANGE_DAYS: i64 = 7;

pub const NO_EVENTS_WITH_SEVERITY: &str = "There are no events with the specified severity.";
pub const NO_EVENTS_IN_RANGE: &str = "There are no events in your account in the specified time range.";

/// Web UI page of one event.
pub fn event_link(account: &str, event_id: &str) -> String {
    format!(
        "https://{}.lacework.net/ui/investigation/recents/EventDossier-{}",
        account, event_id
    )
}

fn parse_time(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .with_context(|| format!("invalid time '{}', expected format yyyy-MM-ddTHH:mm:ssZ", value))
}

/// Computes the `[start, end]` window requested by `args`.
///
/// An explicit `--start`/`--end` wins; a missing end is `now` and a missing
/// start is seven days before the end. `--days N` covers the last N days.
pub fn resolve_time_range(args: &EventListArgs, now: DateTime<Utc>) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    if args.start.is_some() || args.end.is_some() {
        let end = match &args.end {
            Some(end) => parse_time(end)?,
            None => now,
        };
        let start = match &args.start {
            Some(start) => parse_time(start)?,
            None => end - Duration::days(DEFAULT_RANGE_DAYS),
        };
        if start >= end {
            bail!("the start time must be before the end time");
        }
        info!("requesting list of events from custom time range {} - {}", start, end);
        return Ok((start, end));
    }

    match args.days {
        Some(days) if days > 0 => {
            info!("requesting list of events from the last {} days", days);
            Ok((now - Duration::days(i64::from(days)), now))
        }
        _ => {
            info!("requesting list of events from the last {} days", DEFAULT_RANGE_DAYS);
            Ok((now - Duration::days(DEFAULT_RANGE_DAYS), now))
        }
    }
}

pub fn run_list<A, W>(api: &A, args: &EventListArgs, json: bool, now: DateTime<Utc>, out: &mut W) -> Result<()>
where
    A: LaceworkApi + ?Sized,
    W: Write,
{
    let threshold = args.severity.as_deref().map(Severity::threshold).transpose()?;
    let (start, end) = resolve_time_range(args, now).context("unable to parse time range")?;

    let events = api.list_events(start, end).context("unable to get events")?;
    debug!("received {} events", events.len());

    let events = rank_events(events, threshold);

    if json {
        return write_json(out, &events);
    }

    match events_table(&events) {
        Some(table) => write!(out, "{}", table.render())?,
        None if threshold.is_some() => writeln!(out, "{}", NO_EVENTS_WITH_SEVERITY)?,
        None => writeln!(out, "{}", NO_EVENTS_IN_RANGE)?,
    }
    Ok(())
}

pub fn run_show<A, W>(api: &A, account: &str, event_id: &str, json: bool, out: &mut W) -> Result<()>
where
    A: LaceworkApi + ?Sized,
    W: Write,
{
    info!("requesting event details for event {}", event_id);
    let details = api.event_details(event_id).context("unable to get event details")?;

    // Only the first record is reported when the API returns several.
    let Some(event) = details.first() else {
        bail!("there are no details about the event '{}'", event_id);
    };

    if json {
        return write_json(out, event);
    }

    let mut tables = vec![event_details_table(event)];
    tables.extend(entity_map_tables(&event.entity_map));
    write_tables(out, &tables)?;
    writeln!(
        out,
        "\nFor further investigation of this event navigate to {}",
        event_link(account, event_id)
    )?;
    Ok(())
}

/// Event ids are numeric.
pub fn validate_event_id(event_id: &str) -> Result<()> {
    if event_id.is_empty() || !event_id.chars().all(|c| c.is_ascii_digit()) {
        bail!("invalid event id {}. Event id should be a numeric value", event_id);
    }
    Ok(())
}

pub fn run_open(account: &str, event_id: &str) -> Result<()> {
    validate_event_id(event_id)?;
    if account.is_empty() {
        bail!("account missing, please configure the command-line: 'lacework configure'");
    }
    let url = event_link(account, event_id);
    open_browser(&url).context("unable to open web browser")
}

fn open_browser(url: &str) -> Result<()> {
    debug!("opening {}", url);
    let spawned = if cfg!(target_os = "linux") {
        Command::new("xdg-open").arg(url).spawn()
    } else if cfg!(target_os = "windows") {
        Command::new("rundll32").args(["url.dll,FileProtocolHandler", url]).spawn()
    } else if cfg!(target_os = "macos") {
        Command::new("open").arg(url).spawn()
    } else {
        bail!("unsupported platform\n\nNavigate to {}", url);
    };
    spawned?;
    Ok(())
}
