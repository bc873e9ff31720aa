//! Access to the Lacework REST API.
//!
//! Commands talk to the platform through the [`LaceworkApi`] trait so they
//! can be exercised against an in-memory double; [`client::HttpClient`] is
//! the blocking `reqwest` implementation used by the binary.
//!
//! License: Apache-2.0

pub mod client;

use chrono::{DateTime, Utc};
use lacework_core::models::{Event, EventDetails, HostVulnCve, HostVulnDetail, HostVulnHostAssessment};
use thiserror::Error;

pub use client::HttpClient;

/// Errors raised while talking to the Lacework API.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("unable to reach {url}: {source}")]
    Connection {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("[{status}] {url}: {message}")]
    Status { status: u16, url: String, message: String },

    #[error("unable to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unable to generate access token: {0}")]
    Token(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

/// The subset of the Lacework API used by the CLI.
pub trait LaceworkApi {
    /// Events whose time window falls within `[start, end]`.
    fn list_events(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> ApiResult<Vec<Event>>;

    fn event_details(&self, event_id: &str) -> ApiResult<Vec<EventDetails>>;

    /// Every CVE found across the hosts of the account.
    fn list_host_cves(&self) -> ApiResult<Vec<HostVulnCve>>;

    fn list_hosts_with_cve(&self, cve_id: &str) -> ApiResult<Vec<HostVulnDetail>>;

    fn host_assessment(&self, machine_id: &str) -> ApiResult<HostVulnHostAssessment>;

    /// Submits a package manifest for an on-demand assessment and returns the raw response.
    fn scan_pkg_manifest(&self, manifest: &str) -> ApiResult<serde_json::Value>;
}
