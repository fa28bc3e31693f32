use serde::{Deserialize, Serialize};

/// The declarative topology document: node declarations plus explicit
/// connectivity. Exploit pre/post-condition edges are derived at build time
/// and never declared here.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct TopologyConfig {
    pub name: Option<String>,
    #[serde(default)]
    pub hosts: Vec<HostEntry>,
    #[serde(default)]
    pub vulnerabilities: Vec<VulnerabilityEntry>,
    #[serde(default)]
    pub privileges: Vec<PrivilegeEntry>,
    #[serde(default)]
    pub services: Vec<ServiceEntry>,
    #[serde(default)]
    pub exploits: Vec<ExploitEntry>,
    #[serde(default)]
    pub network_edges: Vec<EdgeEntry>,
    #[serde(default)]
    pub edges: Vec<EdgeEntry>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HostEntry {
    pub id: String,
    pub label: Option<String>,
    /// Network zone, e.g. "external", "dmz", "internal". Hosts without a
    /// zone are treated as internal.
    pub zone: Option<String>,
    pub ip: Option<String>,
    pub os: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VulnerabilityEntry {
    pub id: String,
    pub label: Option<String>,
    /// Numeric CVSS base score. Takes precedence over `cvss_vector` when
    /// both are given; when both are absent the score is 0.0.
    pub cvss: Option<f64>,
    /// CVSS v3.x vector string, e.g. "CVSS:3.1/AV:N/AC:L/PR:N/UI:N/S:U/C:H/I:H/A:H".
    pub cvss_vector: Option<String>,
    pub affected_host: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PrivilegeEntry {
    pub id: String,
    pub label: Option<String>,
    pub host: String,
    /// Free-form privilege level, e.g. "user", "admin".
    pub level: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceEntry {
    pub id: String,
    pub label: Option<String>,
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExploitEntry {
    pub id: String,
    pub label: Option<String>,
    pub vulnerability: String,
    /// Node required before the exploit can fire (any kind).
    pub precondition: String,
    /// Node gained once the exploit fires (any kind).
    pub postcondition: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EdgeEntry {
    pub from: String,
    pub to: String,
    pub label: Option<String>,
}
