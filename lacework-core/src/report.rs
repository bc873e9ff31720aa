//! Tabular projection of API records for human-readable output.
//!
//! Every record kind (events, event entities, CVEs, hosts, assessments) is
//! flattened into a [`DisplayTable`] through the single generic [`project`]
//! utility, parameterized by a per-kind row extraction closure. Builders for
//! record sequences return `None` when there is nothing to show, so callers
//! never print a header-only table.
//!
//! Rows that carry a severity are ordered by rank with a stable sort, which
//! keeps the packages of one CVE grouped in their original order when they
//! share a rank.
//!
//! License: Apache-2.0

use chrono::{DateTime, Utc};
use comfy_table::{presets, CellAlignment, ContentArrangement, Table};
use std::fmt;

use crate::models::{
    ApiEntity, ApplicationEntity, ContainerEntity, CtUserEntity, CustomRuleEntity, DnsNameEntity, Event,
    EventDetails, EventEntityMap, FileDataHashEntity, FileExePathEntity, HostVulnCve, HostVulnDetail,
    HostVulnHostAssessment, HostVulnHostDetail, HostVulnPackage, IpAddressEntity, MachineEntity,
    NewViolationEntity, ProcessEntity, RecIdEntity, RegionEntity, ResourceEntity, SourceIpAddressEntity,
    UserEntity, ViolationReasonEntity,
};
use crate::severity::{filter_by_threshold, sort_by_severity, Severity};

/// Timestamp layout used in every table: ISO-8601, UTC, whole seconds.
pub const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

const HOST_HEADER: [&str; 9] = [
    "Machine ID",
    "Hostname",
    "External IP",
    "Os",
    "Arch",
    "Provider",
    "Instance ID",
    "AMI",
    "Status",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Border {
    /// Boxed table, used for event details and entity sub-tables.
    Full,
    /// Column-aligned listing without frame, used for top-level lists.
    Plain,
}

/// A header plus ordered rows of string cells, ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub border: Border,
    /// Left-align cells and never wrap; used for long free-form content.
    pub verbatim: bool,
}

impl DisplayTable {
    pub fn new(header: &[&str], border: Border) -> Self {
        Self {
            header: header.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
            border,
            verbatim: false,
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    /// Values of one column, top to bottom.
    pub fn column(&self, index: usize) -> Vec<&str> {
        self.rows
            .iter()
            .map(|r| r.get(index).map(String::as_str).unwrap_or(""))
            .collect()
    }

    pub fn render(&self) -> String {
        let mut table = Table::new();
        match self.border {
            Border::Full => table.load_preset(presets::ASCII_FULL),
            Border::Plain => table.load_preset(presets::NOTHING),
        };
        table.set_content_arrangement(ContentArrangement::Disabled);
        table.set_header(self.header.clone());
        for row in &self.rows {
            table.add_row(row.clone());
        }
        if self.verbatim {
            for column in table.column_iter_mut() {
                column.set_cell_alignment(CellAlignment::Left);
            }
        }
        let mut out = table.to_string();
        out.push('\n');
        out
    }
}

impl fmt::Display for DisplayTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Builds one table from `records` with `extract` producing each row.
/// Returns `None` for an empty input.
pub fn project<T, F>(header: &[&str], records: &[T], border: Border, extract: F) -> Option<DisplayTable>
where
    F: Fn(&T) -> Vec<String>,
{
    if records.is_empty() {
        return None;
    }
    let mut table = DisplayTable::new(header, border);
    table.rows = records.iter().map(extract).collect();
    Some(table)
}

// --- cell formatting ---

pub fn format_time(time: &DateTime<Utc>) -> String {
    time.format(TIME_FORMAT).to_string()
}

/// Byte counters and CPU percentages.
pub fn format_decimal(value: f64) -> String {
    format!("{:.3}", value)
}

pub fn join_list<T: ToString>(values: &[T]) -> String {
    values.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

pub fn yes_no(flag: i32) -> String {
    let label = if flag != 0 { "Yes" } else { "No" };
    label.to_string()
}

pub fn enabled_disabled(flag: i32) -> String {
    let label = if flag != 0 { "Enabled" } else { "Disabled" };
    label.to_string()
}

/// Labels the connection role of an application or container.
pub fn client_server(is_client: i32, is_server: i32) -> String {
    let label = match (is_client != 0, is_server != 0) {
        (true, true) => "Server/Client",
        (true, false) => "Client",
        (false, true) => "Server",
        (false, false) => "",
    };
    label.to_string()
}

fn display_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

// --- events ---

/// Applies the optional threshold and orders events from most to least severe.
pub fn rank_events(events: Vec<Event>, threshold: Option<Severity>) -> Vec<Event> {
    let mut events = filter_by_threshold(events, threshold, Event::severity);
    sort_by_severity(&mut events, Event::severity);
    events
}

pub fn events_table(events: &[Event]) -> Option<DisplayTable> {
    project(
        &["Event ID", "Type", "Severity", "Start Time", "End Time"],
        events,
        Border::Plain,
        |e| {
            vec![
                e.event_id.clone(),
                e.event_type.clone(),
                e.severity().label().to_string(),
                format_time(&e.start_time),
                format_time(&e.end_time),
            ]
        },
    )
}

pub fn event_details_table(details: &EventDetails) -> DisplayTable {
    let mut table = DisplayTable::new(&["Event ID", "Type", "Actor", "Model", "Start Time", "End Time"], Border::Full);
    table.push_row(vec![
        details.event_id.clone(),
        details.event_type.clone(),
        details.event_actor.clone(),
        details.event_model.clone(),
        format_time(&details.start_time),
        format_time(&details.end_time),
    ]);
    table
}

/// One table per non-empty entity kind, in a fixed order.
pub fn entity_map_tables(entities: &EventEntityMap) -> Vec<DisplayTable> {
    let mut tables: Vec<DisplayTable> = [
        machine_table(&entities.machine),
        container_table(&entities.container),
        application_table(&entities.application),
        user_table(&entities.user),
        ip_address_table(&entities.ip_address),
        source_ip_address_table(&entities.source_ip_address),
        dns_name_table(&entities.dns_name),
        api_table(&entities.api),
        ct_user_table(&entities.ct_user),
        region_table(&entities.region),
        process_table(&entities.process),
        file_exe_path_table(&entities.file_exe_path),
        file_data_hash_table(&entities.file_data_hash),
    ]
    .into_iter()
    .flatten()
    .collect();

    tables.extend(custom_rule_tables(&entities.custom_rule));

    tables.extend(
        [
            new_violation_table(&entities.new_violation),
            rec_id_table(&entities.rec_id),
            violation_reason_table(&entities.violation_reason),
            resource_table(&entities.resource),
        ]
        .into_iter()
        .flatten(),
    );
    tables
}

pub fn machine_table(machines: &[MachineEntity]) -> Option<DisplayTable> {
    project(
        &["Hostname", "External IP", "Instance ID", "Instance Name", "CPU Percentage", "Internal Ipaddress"],
        machines,
        Border::Full,
        |m| {
            vec![
                m.hostname.clone(),
                m.external_ip.clone(),
                m.instance_id.clone(),
                m.instance_name.clone(),
                format_decimal(m.cpu_percentage),
                m.internal_ip_address.clone(),
            ]
        },
    )
}

pub fn container_table(containers: &[ContainerEntity]) -> Option<DisplayTable> {
    project(
        &[
            "Image Repo",
            "Image Tag",
            "External Connections",
            "Type",
            "First Time Seen",
            "Pod Namespace",
            "Pod Ipaddress",
        ],
        containers,
        Border::Full,
        |c| {
            vec![
                c.image_repo.clone(),
                c.image_tag.clone(),
                c.has_external_conns.to_string(),
                client_server(c.is_client, c.is_server),
                format_time(&c.first_seen_time),
                c.pod_namespace.clone(),
                c.pod_ip_addr.clone(),
            ]
        },
    )
}

pub fn application_table(applications: &[ApplicationEntity]) -> Option<DisplayTable> {
    project(
        &["Application", "External Connections", "Type", "Earliest Known Time"],
        applications,
        Border::Full,
        |a| {
            vec![
                a.application.clone(),
                a.has_external_conns.to_string(),
                client_server(a.is_client, a.is_server),
                format_time(&a.earliest_known_time),
            ]
        },
    )
}

pub fn user_table(users: &[UserEntity]) -> Option<DisplayTable> {
    project(&["Username", "Hostname"], users, Border::Full, |u| {
        vec![u.username.clone(), u.machine_hostname.clone()]
    })
}

pub fn ip_address_table(ips: &[IpAddressEntity]) -> Option<DisplayTable> {
    project(
        &[
            "IP Address",
            "Inbound Bytes",
            "Outbound Bytes",
            "List of Ports",
            "First Time Seen",
            "Threat Tags",
            "Threat Source",
            "Country",
            "Region",
        ],
        ips,
        Border::Full,
        |ip| {
            vec![
                ip.ip_address.clone(),
                format_decimal(ip.total_in_bytes),
                format_decimal(ip.total_out_bytes),
                join_list(&ip.port_list),
                format_time(&ip.first_seen_time),
                ip.threat_tags.clone(),
                display_value(&ip.threat_source),
                ip.country.clone(),
                ip.region.clone(),
            ]
        },
    )
}

pub fn source_ip_address_table(ips: &[SourceIpAddressEntity]) -> Option<DisplayTable> {
    project(&["Source IP Address", "Country", "Region"], ips, Border::Full, |ip| {
        vec![ip.ip_address.clone(), ip.country.clone(), ip.region.clone()]
    })
}

pub fn dns_name_table(names: &[DnsNameEntity]) -> Option<DisplayTable> {
    project(
        &["DNS Hostname", "List of Ports", "Inbound Bytes", "Outbound Bytes"],
        names,
        Border::Full,
        |d| {
            vec![
                d.hostname.clone(),
                join_list(&d.port_list),
                format_decimal(d.total_in_bytes),
                format_decimal(d.total_out_bytes),
            ]
        },
    )
}

pub fn api_table(apis: &[ApiEntity]) -> Option<DisplayTable> {
    project(&["Service", "API"], apis, Border::Full, |a| vec![a.service.clone(), a.api.clone()])
}

pub fn ct_user_table(users: &[CtUserEntity]) -> Option<DisplayTable> {
    project(
        &["Username", "Account ID", "Principal ID", "MFA", "List of APIs", "Regions"],
        users,
        Border::Full,
        |u| {
            vec![
                u.username.clone(),
                u.account_id.clone(),
                u.principal_id.clone(),
                enabled_disabled(u.mfa),
                join_list(&u.api_list),
                join_list(&u.region_list),
            ]
        },
    )
}

pub fn region_table(regions: &[RegionEntity]) -> Option<DisplayTable> {
    project(&["Region", "Accounts"], regions, Border::Full, |r| {
        vec![r.region.clone(), join_list(&r.account_list)]
    })
}

pub fn process_table(processes: &[ProcessEntity]) -> Option<DisplayTable> {
    project(
        &["Process ID", "Hostname", "Start Time", "CPU Percentage", "Command"],
        processes,
        Border::Full,
        |p| {
            vec![
                p.process_id.to_string(),
                p.hostname.clone(),
                format_time(&p.process_start_time),
                format_decimal(p.cpu_percentage),
                p.cmdline.clone(),
            ]
        },
    )
}

pub fn file_exe_path_table(paths: &[FileExePathEntity]) -> Option<DisplayTable> {
    project(
        &[
            "Executable Path",
            "First Time Seen",
            "Last File Hash",
            "Last Package Name",
            "Last Version",
            "Last File Owner",
        ],
        paths,
        Border::Full,
        |e| {
            vec![
                e.exe_path.clone(),
                format_time(&e.first_seen_time),
                e.last_filedata_hash.clone(),
                e.last_package_name.clone(),
                e.last_version.clone(),
                e.last_file_owner.clone(),
            ]
        },
    )
}

pub fn file_data_hash_table(hashes: &[FileDataHashEntity]) -> Option<DisplayTable> {
    project(
        &["Executable Paths", "File Hash", "Number of Machines", "First Time Seen", "Known Bad"],
        hashes,
        Border::Full,
        |h| {
            vec![
                join_list(&h.exe_path_list),
                h.filedata_hash.clone(),
                h.machine_count.to_string(),
                format_time(&h.first_seen_time),
                yes_no(h.is_known_bad),
            ]
        },
    )
}

/// Each rule yields a summary table followed by its display filter, which is
/// pretty-printed when it holds valid JSON.
pub fn custom_rule_tables(rules: &[CustomRuleEntity]) -> Vec<DisplayTable> {
    let mut tables = Vec::with_capacity(rules.len() * 2);
    for rule in rules {
        let mut summary = DisplayTable::new(&["Rule GUID", "Last Updated User", "Last Updated Time"], Border::Full);
        summary.push_row(vec![
            rule.rule_guid.clone(),
            rule.last_updated_user.clone(),
            format_time(&rule.last_updated_time),
        ]);
        tables.push(summary);
        tables.push(one_line_table("Display Filter", &pretty_json_or_raw(&rule.display_filter)));
    }
    tables
}

pub fn one_line_table(title: &str, content: &str) -> DisplayTable {
    let mut table = DisplayTable::new(&[title], Border::Full);
    table.verbatim = true;
    table.push_row(vec![content.to_string()]);
    table
}

fn pretty_json_or_raw(raw: &str) -> String {
    serde_json::from_str::<serde_json::Value>(raw)
        .ok()
        .and_then(|v| serde_json::to_string_pretty(&v).ok())
        .unwrap_or_else(|| raw.to_string())
}

pub fn new_violation_table(violations: &[NewViolationEntity]) -> Option<DisplayTable> {
    project(&["Violation ID", "Reason", "Resource"], violations, Border::Full, |v| {
        vec![v.rec_id.clone(), v.reason.clone(), v.resource.clone()]
    })
}

pub fn rec_id_table(records: &[RecIdEntity]) -> Option<DisplayTable> {
    project(
        &[
            "Record ID",
            "Account ID",
            "Account Alias",
            "Description",
            "Status",
            "Evaluation Type",
            "Evaluation GUID",
        ],
        records,
        Border::Full,
        |r| {
            vec![
                r.rec_id.clone(),
                r.account_id.clone(),
                r.account_alias.clone(),
                r.title.clone(),
                r.status.clone(),
                r.eval_type.clone(),
                r.eval_guid.clone(),
            ]
        },
    )
}

pub fn violation_reason_table(reasons: &[ViolationReasonEntity]) -> Option<DisplayTable> {
    project(&["Violation ID", "Reason"], reasons, Border::Full, |r| {
        vec![r.rec_id.clone(), r.reason.clone()]
    })
}

pub fn resource_table(resources: &[ResourceEntity]) -> Option<DisplayTable> {
    project(&["Name", "Value"], resources, Border::Full, |r| {
        vec![r.name.clone(), display_value(&r.value)]
    })
}

// --- host vulnerabilities ---

/// One entry per affected package, filtered by `threshold` and ordered by
/// package severity rank. Packages of equal rank keep their input order.
pub fn cve_package_rows(
    cves: &[HostVulnCve],
    threshold: Option<Severity>,
) -> Vec<(&HostVulnCve, &HostVulnPackage)> {
    let flat: Vec<(&HostVulnCve, &HostVulnPackage)> = cves
        .iter()
        .flat_map(|cve| cve.packages.iter().map(move |pkg| (cve, pkg)))
        .collect();
    let mut rows = filter_by_threshold(flat, threshold, |(_, pkg)| pkg.severity());
    sort_by_severity(&mut rows, |(_, pkg)| pkg.severity());
    rows
}

pub fn host_cves_table(cves: &[HostVulnCve], threshold: Option<Severity>) -> Option<DisplayTable> {
    let rows = cve_package_rows(cves, threshold);
    project(
        &["CVE", "Severity", "Package", "Pkg Version", "Score", "OS Version", "Hosts", "Status"],
        &rows,
        Border::Plain,
        |(cve, pkg)| {
            vec![
                cve.id.clone(),
                pkg.severity.clone(),
                pkg.name.clone(),
                pkg.version.clone(),
                pkg.cvss_score.clone(),
                pkg.namespace.clone(),
                pkg.host_count.clone(),
                pkg.status.clone(),
            ]
        },
    )
}

fn host_row(host: &HostVulnHostDetail) -> Vec<String> {
    vec![
        host.machine_id.clone(),
        host.hostname.clone(),
        host.tags.external_ip.clone(),
        host.tags.os.clone(),
        host.tags.arch.clone(),
        host.tags.vm_provider.clone(),
        host.tags.instance_id.clone(),
        host.tags.ami_id.clone(),
        host.machine_status.clone(),
    ]
}

pub fn hosts_table(hosts: &[HostVulnDetail]) -> Option<DisplayTable> {
    project(&HOST_HEADER, hosts, Border::Plain, |h| host_row(&h.details))
}

pub fn host_details_table(host: &HostVulnHostDetail) -> DisplayTable {
    let mut table = DisplayTable::new(&HOST_HEADER, Border::Plain);
    table.push_row(host_row(host));
    table
}

pub fn host_assessment_cves_table(
    assessment: &HostVulnHostAssessment,
    threshold: Option<Severity>,
) -> Option<DisplayTable> {
    let rows = cve_package_rows(&assessment.cves, threshold);
    project(
        &["CVE", "Severity", "Score", "Package", "Pkg Version", "Fix Version", "Status"],
        &rows,
        Border::Plain,
        |(cve, pkg)| {
            vec![
                cve.id.clone(),
                pkg.severity.clone(),
                pkg.cvss_score.clone(),
                pkg.name.clone(),
                pkg.version.clone(),
                pkg.fixed_version.clone(),
                pkg.status.clone(),
            ]
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn pkg(name: &str, severity: &str) -> HostVulnPackage {
        HostVulnPackage {
            name: name.to_string(),
            severity: severity.to_string(),
            ..Default::default()
        }
    }

    fn cve(id: &str, packages: Vec<HostVulnPackage>) -> HostVulnCve {
        HostVulnCve {
            id: id.to_string(),
            packages,
        }
    }

    #[test]
    fn client_server_labels() {
        assert_eq!(client_server(1, 1), "Server/Client");
        assert_eq!(client_server(0, 0), "");
        assert_eq!(client_server(1, 0), "Client");
        assert_eq!(client_server(0, 1), "Server");
    }

    #[test]
    fn cells_use_fixed_formats() {
        let t = Utc.with_ymd_and_hms(2020, 4, 20, 10, 5, 9).unwrap();
        assert_eq!(format_time(&t), "2020-04-20T10:05:09Z");
        assert_eq!(format_decimal(1.0), "1.000");
        assert_eq!(format_decimal(12.34567), "12.346");
        assert_eq!(join_list(&[80, 443]), "80, 443");
        assert_eq!(join_list::<String>(&[]), "");
        assert_eq!(yes_no(1), "Yes");
        assert_eq!(enabled_disabled(0), "Disabled");
    }

    #[test]
    fn empty_inputs_produce_no_table() {
        assert!(events_table(&[]).is_none());
        assert!(host_cves_table(&[], None).is_none());
        assert!(hosts_table(&[]).is_none());
        assert!(machine_table(&[]).is_none());
        assert!(entity_map_tables(&EventEntityMap::default()).is_empty());
    }

    #[test]
    fn cve_rows_sort_by_rank_across_cves() {
        let cves = vec![
            cve("CVE-A", vec![pkg("pkg1", "High"), pkg("pkg2", "Critical")]),
            cve("CVE-B", vec![pkg("pkg1", "Medium")]),
        ];
        let table = host_cves_table(&cves, None).unwrap();
        assert_eq!(table.column(0), vec!["CVE-A", "CVE-A", "CVE-B"]);
        assert_eq!(table.column(2), vec!["pkg2", "pkg1", "pkg1"]);
        assert_eq!(table.column(1), vec!["Critical", "High", "Medium"]);
    }

    #[test]
    fn cve_rows_keep_package_order_on_ties() {
        let cves = vec![
            cve("CVE-A", vec![pkg("a1", "Low"), pkg("a2", "Low")]),
            cve("CVE-B", vec![pkg("b1", "Low"), pkg("b2", "bogus")]),
        ];
        let rows = cve_package_rows(&cves, None);
        let names: Vec<&str> = rows.iter().map(|(_, p)| p.name.as_str()).collect();
        assert_eq!(names, vec!["a1", "a2", "b1", "b2"]);
    }

    #[test]
    fn cve_rows_respect_threshold() {
        let cves = vec![cve("CVE-A", vec![pkg("a", "Low"), pkg("b", "high"), pkg("c", "Info")])];
        let rows = cve_package_rows(&cves, Some(Severity::Medium));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].1.name, "b");
        assert!(host_cves_table(&cves, Some(Severity::Critical)).is_none());
    }

    #[test]
    fn events_rank_and_filter() {
        let mk = |id: &str, sev: &str| Event {
            event_id: id.to_string(),
            severity: sev.to_string(),
            ..Default::default()
        };
        let events = vec![mk("1", "4"), mk("2", "2"), mk("3", "5"), mk("4", "1"), mk("5", "2")];
        let ranked = rank_events(events.clone(), None);
        let ids: Vec<&str> = ranked.iter().map(|e| e.event_id.as_str()).collect();
        assert_eq!(ids, vec!["4", "2", "5", "1", "3"]);

        let high = rank_events(events, Some(Severity::High));
        let table = events_table(&high).unwrap();
        assert_eq!(table.column(2), vec!["Critical", "High", "High"]);
    }

    #[test]
    fn entity_tables_follow_fixed_order() {
        let map = EventEntityMap {
            user: vec![UserEntity {
                username: "root".into(),
                machine_hostname: "web-1".into(),
            }],
            machine: vec![MachineEntity {
                hostname: "web-1".into(),
                cpu_percentage: 2.5,
                ..Default::default()
            }],
            region: vec![RegionEntity {
                region: "us-west-2".into(),
                account_list: vec![],
            }],
            ..Default::default()
        };
        let tables = entity_map_tables(&map);
        assert_eq!(tables.len(), 3);
        assert_eq!(tables[0].header[0], "Hostname");
        assert_eq!(tables[0].rows[0][4], "2.500");
        assert_eq!(tables[1].header, vec!["Username", "Hostname"]);
        assert_eq!(tables[2].rows[0], vec!["us-west-2".to_string(), String::new()]);
    }

    #[test]
    fn custom_rule_filter_is_pretty_printed() {
        let rules = vec![
            CustomRuleEntity {
                rule_guid: "G1".into(),
                display_filter: r#"{"a":1}"#.into(),
                ..Default::default()
            },
            CustomRuleEntity {
                rule_guid: "G2".into(),
                display_filter: "not json".into(),
                ..Default::default()
            },
        ];
        let tables = custom_rule_tables(&rules);
        assert_eq!(tables.len(), 4);
        assert_eq!(tables[1].rows[0][0], "{\n  \"a\": 1\n}");
        assert_eq!(tables[3].rows[0][0], "not json");
    }

    #[test]
    fn render_contains_header_and_cells() {
        let table = project(&["Service", "API"], &[("s3", "GetObject")], Border::Full, |(s, a)| {
            vec![s.to_string(), a.to_string()]
        })
        .unwrap();
        let out = table.render();
        assert!(out.contains("Service"));
        assert!(out.contains("GetObject"));
        assert!(out.ends_with('\n'));
    }
}
