//! Typed records returned by the Lacework API.
//!
//! These mirror the JSON bodies of the events and host vulnerability
//! endpoints closely enough for reporting. Every struct defaults missing
//! fields so a sparse response never fails to decode, and unknown fields
//! are ignored.
//!
//! License: Apache-2.0

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::severity::Severity;

/// Generic `{"data": ...}` envelope used by the v1 external API.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, bound(deserialize = "T: Deserialize<'de> + Default"))]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub message: String,
    pub data: T,
}

// --- Events ---

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", default)]
pub struct Event {
    pub event_id: String,
    pub event_type: String,
    pub severity: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl Event {
    pub fn severity(&self) -> Severity {
        Severity::from_label(&self.severity)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", default)]
pub struct EventDetails {
    pub event_id: String,
    pub event_type: String,
    pub event_actor: String,
    pub event_model: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub entity_map: EventEntityMap,
}

/// Heterogeneous sub-records attached to one event, grouped by entity kind.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct EventEntityMap {
    #[serde(rename = "Machine")]
    pub machine: Vec<MachineEntity>,
    #[serde(rename = "Container")]
    pub container: Vec<ContainerEntity>,
    #[serde(rename = "Application")]
    pub application: Vec<ApplicationEntity>,
    #[serde(rename = "User")]
    pub user: Vec<UserEntity>,
    #[serde(rename = "IpAddress")]
    pub ip_address: Vec<IpAddressEntity>,
    #[serde(rename = "SourceIpAddress")]
    pub source_ip_address: Vec<SourceIpAddressEntity>,
    #[serde(rename = "DnsName")]
    pub dns_name: Vec<DnsNameEntity>,
    #[serde(rename = "API")]
    pub api: Vec<ApiEntity>,
    #[serde(rename = "CT_User")]
    pub ct_user: Vec<CtUserEntity>,
    #[serde(rename = "Region")]
    pub region: Vec<RegionEntity>,
    #[serde(rename = "Process")]
    pub process: Vec<ProcessEntity>,
    #[serde(rename = "FileExePath")]
    pub file_exe_path: Vec<FileExePathEntity>,
    #[serde(rename = "FileDataHash")]
    pub file_data_hash: Vec<FileDataHashEntity>,
    #[serde(rename = "CustomRule")]
    pub custom_rule: Vec<CustomRuleEntity>,
    #[serde(rename = "NewViolation")]
    pub new_violation: Vec<NewViolationEntity>,
    #[serde(rename = "RecId")]
    pub rec_id: Vec<RecIdEntity>,
    #[serde(rename = "ViolationReason")]
    pub violation_reason: Vec<ViolationReasonEntity>,
    #[serde(rename = "Resource")]
    pub resource: Vec<ResourceEntity>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", default)]
pub struct MachineEntity {
    pub hostname: String,
    pub external_ip: String,
    pub instance_id: String,
    pub instance_name: String,
    pub cpu_percentage: f64,
    #[serde(rename = "INTERNAL_IP_ADDR")]
    pub internal_ip_address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", default)]
pub struct ContainerEntity {
    pub image_repo: String,
    pub image_tag: String,
    pub has_external_conns: i32,
    pub is_client: i32,
    pub is_server: i32,
    pub first_seen_time: DateTime<Utc>,
    pub pod_namespace: String,
    #[serde(rename = "POD_IP_ADDR")]
    pub pod_ip_addr: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", default)]
pub struct ApplicationEntity {
    pub application: String,
    pub has_external_conns: i32,
    pub is_client: i32,
    pub is_server: i32,
    pub earliest_known_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", default)]
pub struct UserEntity {
    pub username: String,
    pub machine_hostname: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", default)]
pub struct IpAddressEntity {
    pub ip_address: String,
    pub total_in_bytes: f64,
    pub total_out_bytes: f64,
    pub threat_tags: String,
    pub threat_source: Value,
    pub country: String,
    pub region: String,
    pub port_list: Vec<i32>,
    pub first_seen_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", default)]
pub struct SourceIpAddressEntity {
    pub ip_address: String,
    pub region: String,
    pub country: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", default)]
pub struct DnsNameEntity {
    pub hostname: String,
    pub port_list: Vec<i32>,
    pub total_in_bytes: f64,
    pub total_out_bytes: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", default)]
pub struct ApiEntity {
    pub service: String,
    pub api: String,
}

/// CloudTrail user.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", default)]
pub struct CtUserEntity {
    pub username: String,
    pub account_id: String,
    pub mfa: i32,
    pub api_list: Vec<String>,
    pub region_list: Vec<String>,
    pub principal_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", default)]
pub struct RegionEntity {
    pub region: String,
    pub account_list: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", default)]
pub struct ProcessEntity {
    pub hostname: String,
    pub cmdline: String,
    pub process_id: i64,
    pub process_start_time: DateTime<Utc>,
    pub cpu_percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", default)]
pub struct FileExePathEntity {
    pub exe_path: String,
    pub first_seen_time: DateTime<Utc>,
    #[serde(rename = "LAST_FILEDATA_HASH")]
    pub last_filedata_hash: String,
    pub last_package_name: String,
    pub last_version: String,
    pub last_file_owner: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", default)]
pub struct FileDataHashEntity {
    #[serde(rename = "FILEDATA_HASH")]
    pub filedata_hash: String,
    pub machine_count: i64,
    pub exe_path_list: Vec<String>,
    pub first_seen_time: DateTime<Utc>,
    pub is_known_bad: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", default)]
pub struct CustomRuleEntity {
    pub last_updated_time: DateTime<Utc>,
    pub last_updated_user: String,
    pub display_filter: String,
    pub rule_guid: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", default)]
pub struct NewViolationEntity {
    #[serde(rename = "RECID")]
    pub rec_id: String,
    pub reason: String,
    pub resource: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", default)]
pub struct RecIdEntity {
    #[serde(rename = "RECID")]
    pub rec_id: String,
    pub account_id: String,
    pub account_alias: String,
    pub title: String,
    pub status: String,
    pub eval_type: String,
    pub eval_guid: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", default)]
pub struct ViolationReasonEntity {
    #[serde(rename = "RECID")]
    pub rec_id: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", default)]
pub struct ResourceEntity {
    pub name: String,
    pub value: Value,
}

// --- Host vulnerabilities ---

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct HostVulnCve {
    #[serde(rename = "cve_id")]
    pub id: String,
    pub packages: Vec<HostVulnPackage>,
}

/// One affected package of a CVE. Scores and counts arrive as strings and
/// are displayed verbatim.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct HostVulnPackage {
    pub name: String,
    pub namespace: String,
    pub severity: String,
    pub status: String,
    pub vulnerability_status: String,
    pub version: String,
    pub host_count: String,
    pub cvss_score: String,
    pub fixed_version: String,
}

impl HostVulnPackage {
    pub fn severity(&self) -> Severity {
        Severity::from_label(&self.severity)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct HostVulnDetail {
    pub details: HostVulnHostDetail,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct HostVulnHostDetail {
    pub machine_id: String,
    pub hostname: String,
    pub machine_status: String,
    pub tags: HostVulnMachineTags,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct HostVulnMachineTags {
    #[serde(rename = "ExternalIp")]
    pub external_ip: String,
    #[serde(rename = "os")]
    pub os: String,
    #[serde(rename = "arch")]
    pub arch: String,
    pub vm_provider: String,
    #[serde(rename = "InstanceId")]
    pub instance_id: String,
    #[serde(rename = "AmiId")]
    pub ami_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct HostVulnHostAssessment {
    pub host: HostVulnHostDetail,
    #[serde(rename = "vulnerabilities")]
    pub cves: Vec<HostVulnCve>,
}
