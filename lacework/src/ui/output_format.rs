//! Formatting of human-readable and JSON output.
//!
//! Status lines go to stderr with an optional color taken from the theme.
//! Command results (tables or JSON documents) go to the writer handed in by
//! the caller, which is stdout in the binary.
//!
//! License: Apache-2.0

use anyhow::{Context, Result};
use lacework_core::DisplayTable;
use owo_colors::OwoColorize;
use serde::Serialize;
use std::io::{self, Write};

use super::theme::{ThemeEntry, ThemeMap};

fn styled(text: &str, entry: ThemeEntry, theme: &ThemeMap, enable_colors: bool) -> String {
    match theme.get(&entry).and_then(|style| style.fg.as_ref()) {
        Some(color) if enable_colors => text.color(color.to_ansi_color()).to_string(),
        _ => text.to_string(),
    }
}

/// Writes one status line styled as `entry`.
pub fn print_message<W: Write>(
    writer: &mut W,
    entry: ThemeEntry,
    msg: &str,
    theme: &ThemeMap,
    enable_colors: bool,
) -> io::Result<()> {
    writeln!(writer, "{}", styled(msg, entry, theme, enable_colors))
}

pub fn print_success_message<W: Write>(writer: &mut W, msg: &str, theme: &ThemeMap, enable_colors: bool) -> io::Result<()> {
    print_message(writer, ThemeEntry::Success, msg, theme, enable_colors)
}

pub fn print_warn_message<W: Write>(writer: &mut W, msg: &str, theme: &ThemeMap, enable_colors: bool) -> io::Result<()> {
    print_message(writer, ThemeEntry::Warn, msg, theme, enable_colors)
}

pub fn print_error_message<W: Write>(writer: &mut W, msg: &str, theme: &ThemeMap, enable_colors: bool) -> io::Result<()> {
    let line = format!("ERROR {}", msg);
    print_message(writer, ThemeEntry::Error, &line, theme, enable_colors)
}

/// Styles an interactive question label; the caller writes it.
pub fn style_prompt(label: &str, theme: &ThemeMap, enable_colors: bool) -> String {
    styled(label, ThemeEntry::Prompt, theme, enable_colors)
}

/// Pretty-prints `value` as JSON followed by a newline.
pub fn write_json<W: Write, T: Serialize + ?Sized>(writer: &mut W, value: &T) -> Result<()> {
    let body = serde_json::to_string_pretty(value).context("unable to format json")?;
    writeln!(writer, "{}", body)?;
    Ok(())
}

/// Writes tables one after another, separated by a blank line.
pub fn write_tables<W: Write>(writer: &mut W, tables: &[DisplayTable]) -> io::Result<()> {
    for (idx, table) in tables.iter().enumerate() {
        if idx > 0 {
            writeln!(writer)?;
        }
        write!(writer, "{}", table.render())?;
    }
    Ok(())
}
