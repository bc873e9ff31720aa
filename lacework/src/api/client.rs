//! Blocking HTTP client for the Lacework v1 external API.
//!
//! An access token is exchanged for the profile's key pair once, when the
//! client is built, and sent in the `Authorization` header of every request.

use chrono::{DateTime, SecondsFormat, Utc};
use lacework_core::models::{ApiResponse, Event, EventDetails, HostVulnCve, HostVulnDetail, HostVulnHostAssessment};
use lacework_core::ProfileDetails;
use log::{debug, info};
use reqwest::blocking::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{ApiError, ApiResult, LaceworkApi};

/// Lifetime requested for generated access tokens, in seconds.
pub const TOKEN_EXPIRY_SECS: u64 = 3600;

const REQUEST_TIMEOUT_SECS: u64 = 60;
const TOKEN_PATH: &str = "/api/v1/access/tokens";
const EVENTS_DATE_RANGE_PATH: &str = "/api/v1/external/events/GetEventsForDateRange";
const EVENT_DETAILS_PATH: &str = "/api/v1/external/events/GetEventDetails";
const HOST_VULN_PATH: &str = "/api/v1/external/vulnerabilities/host";
const VULN_SCAN_PATH: &str = "/api/v1/external/vulnerabilities/scan";

/// Default API server for an account.
pub fn account_url(account: &str) -> String {
    format!("https://{}.lacework.net", account)
}

#[derive(Serialize)]
struct TokenRequest<'a> {
    #[serde(rename = "keyId")]
    key_id: &'a str,
    #[serde(rename = "expiryTime")]
    expiry_time: u64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TokenData {
    token: String,
    #[serde(rename = "expiresAt")]
    expires_at: String,
}

#[derive(Debug)]
pub struct HttpClient {
    http: Client,
    base_url: String,
    token: String,
}

impl HttpClient {
    /// Builds a client for `profile` and generates an access token.
    ///
    /// `base_url` overrides the default `https://<account>.lacework.net`.
    pub fn authenticate(profile: &ProfileDetails, base_url: Option<&str>) -> ApiResult<Self> {
        let base_url = base_url
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or_else(|| account_url(&profile.account));

        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(concat!("lacework-cli/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| ApiError::Connection {
                url: base_url.clone(),
                source,
            })?;

        let mut client = Self {
            http,
            base_url,
            token: String::new(),
        };
        client.token = client.generate_token(&profile.api_key, &profile.api_secret)?;
        Ok(client)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn generate_token(&self, api_key: &str, api_secret: &str) -> ApiResult<String> {
        info!("generating a new access token");
        let body = TokenRequest {
            key_id: api_key,
            expiry_time: TOKEN_EXPIRY_SECS,
        };
        let request = self
            .http
            .post(self.url(TOKEN_PATH))
            .header("X-LW-UAKS", api_secret)
            .json(&body);

        let response: ApiResponse<Vec<TokenData>> = self.execute(request, TOKEN_PATH)?;
        let data = response
            .data
            .into_iter()
            .next()
            .filter(|d| !d.token.is_empty())
            .ok_or_else(|| ApiError::Token(format!("no token in response: {}", response.message)))?;
        debug!("access token expires at {}", data.expires_at);
        Ok(data.token)
    }

    fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> ApiResult<T> {
        let request = self
            .http
            .get(self.url(path))
            .header("Authorization", &self.token)
            .query(query);
        self.execute(request, path)
    }

    fn execute<T: DeserializeOwned>(&self, request: RequestBuilder, path: &str) -> ApiResult<T> {
        let url = self.url(path);
        debug!("request: {}", url);
        let response = request.send().map_err(|source| ApiError::Connection {
            url: url.clone(),
            source,
        })?;

        let status = response.status();
        debug!("response: {} {}", status.as_u16(), url);
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                url,
                message: error_message(&body),
            });
        }

        response.json::<T>().map_err(|source| ApiError::Decode { url, source })
    }
}

/// Extracts `message` from an error body, falling back to the raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ApiResponse<serde_json::Value>>(body)
        .ok()
        .map(|r| r.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| body.trim().to_string())
}

fn api_time(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Secs, true)
}

impl LaceworkApi for HttpClient {
    fn list_events(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> ApiResult<Vec<Event>> {
        let query = [("START_TIME", api_time(&start)), ("END_TIME", api_time(&end))];
        let response: ApiResponse<Vec<Event>> = self.get(EVENTS_DATE_RANGE_PATH, &query)?;
        Ok(response.data)
    }

    fn event_details(&self, event_id: &str) -> ApiResult<Vec<EventDetails>> {
        let query = [("EVENT_ID", event_id.to_string())];
        let response: ApiResponse<Vec<EventDetails>> = self.get(EVENT_DETAILS_PATH, &query)?;
        Ok(response.data)
    }

    fn list_host_cves(&self) -> ApiResult<Vec<HostVulnCve>> {
        let response: ApiResponse<Vec<HostVulnCve>> = self.get(HOST_VULN_PATH, &[])?;
        Ok(response.data)
    }

    fn list_hosts_with_cve(&self, cve_id: &str) -> ApiResult<Vec<HostVulnDetail>> {
        let path = format!("{}/cveId/{}", HOST_VULN_PATH, cve_id);
        let response: ApiResponse<Vec<HostVulnDetail>> = self.get(&path, &[])?;
        Ok(response.data)
    }

    fn host_assessment(&self, machine_id: &str) -> ApiResult<HostVulnHostAssessment> {
        let path = format!("{}/machineId/{}", HOST_VULN_PATH, machine_id);
        let response: ApiResponse<HostVulnHostAssessment> = self.get(&path, &[])?;
        Ok(response.data)
    }

    fn scan_pkg_manifest(&self, manifest: &str) -> ApiResult<serde_json::Value> {
        let request = self
            .http
            .post(self.url(VULN_SCAN_PATH))
            .header("Authorization", &self.token)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(manifest.to_string());
        self.execute(request, VULN_SCAN_PATH)
    }
}
