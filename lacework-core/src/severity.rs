//! Severity ranking shared by every event and vulnerability report.
//!
//! Severities are ranked 1 (critical) through 5 (info); anything else is
//! ranked 6 (unknown). A smaller rank is more severe, so a threshold keeps
//! records whose rank is less than or equal to the threshold's rank.

use log::debug;
use std::fmt;
use std::str::FromStr;

use crate::errors::LaceworkError;

/// Severity names accepted as a threshold, most severe first.
pub const VALID_SEVERITIES: [&str; 5] = ["critical", "high", "medium", "low", "info"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Info,
    Unknown,
}

impl Severity {
    /// Case-insensitive lookup that also accepts the numerals `"1"` to `"5"`.
    /// Unrecognized input maps to [`Severity::Unknown`].
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "1" | "critical" => Severity::Critical,
            "2" | "high" => Severity::High,
            "3" | "medium" => Severity::Medium,
            "4" | "low" => Severity::Low,
            "5" | "info" => Severity::Info,
            _ => Severity::Unknown,
        }
    }

    /// Parses a user supplied threshold, rejecting anything outside the recognized set.
    pub fn threshold(input: &str) -> Result<Self, LaceworkError> {
        match Self::from_label(input) {
            Severity::Unknown => Err(LaceworkError::UnsupportedSeverity {
                given: input.to_string(),
                valid: VALID_SEVERITIES.join(", "),
            }),
            severity => Ok(severity),
        }
    }

    pub fn rank(self) -> u8 {
        match self {
            Severity::Critical => 1,
            Severity::High => 2,
            Severity::Medium => 3,
            Severity::Low => 4,
            Severity::Info => 5,
            Severity::Unknown => 6,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
            Severity::Info => "Info",
            Severity::Unknown => "Unknown",
        }
    }

    /// True when `self` is at least as severe as `threshold`.
    pub fn meets(self, threshold: Severity) -> bool {
        self.rank() <= threshold.rank()
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Severity {
    type Err = LaceworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Severity::threshold(s)
    }
}

/// Keeps the records at least as severe as `threshold`; no threshold keeps everything.
pub fn filter_by_threshold<T, F>(records: Vec<T>, threshold: Option<Severity>, severity_of: F) -> Vec<T>
where
    F: Fn(&T) -> Severity,
{
    let Some(threshold) = threshold else {
        return records;
    };

    let total = records.len();
    let kept: Vec<T> = records
        .into_iter()
        .filter(|r| severity_of(r).meets(threshold))
        .collect();
    debug!("severity filter '{}' kept {} of {} records", threshold, kept.len(), total);
    kept
}

/// Stable ascending sort by severity rank; ties keep their input order.
pub fn sort_by_severity<T, F>(records: &mut [T], severity_of: F)
where
    F: Fn(&T) -> Severity,
{
    records.sort_by_key(|r| severity_of(r).rank());
}
