use std::collections::BTreeSet;

use serde::Serialize;
use tracing::debug;

use crate::errors::VantageError;
use crate::graph::{AttackGraph, NodeKind};

#[derive(Debug, Clone, Serialize)]
pub struct ImpactReport {
    pub vulnerability_id: String,
    pub cvss: f64,
    pub affected_host: String,
    pub reachable_count: usize,
    pub impact_score: f64,
    /// Distinct owning hosts among the reachable set, id-sorted.
    pub affected_hosts: Vec<String>,
}

/// Scores a vulnerability as CVSS weighted by how much of the graph lies
/// downstream of its affected host.
///
/// The weight is `1 + ln(1 + r) / ln(1 + n)` for `r` reachable nodes out
/// of `n` total: exactly 1 when nothing is reachable, strictly increasing
/// in `r`, and saturating below 2 since `r < n`. A CVSS of 0 therefore
/// always scores 0, and growing reachability never lowers the score.
pub fn score_impact(
    graph: &AttackGraph,
    vulnerability_id: &str,
) -> Result<ImpactReport, VantageError> {
    let vuln_idx = graph.resolve(vulnerability_id)?;
    let NodeKind::Vulnerability {
        cvss,
        affected_host,
    } = &graph.node(vuln_idx).kind
    else {
        return Err(VantageError::NodeNotFound(format!(
            "\"{vulnerability_id}\" is not a vulnerability node"
        )));
    };
    let cvss = *cvss;
    let affected_host = affected_host.clone();

    let host_idx = graph.resolve(&affected_host)?;
    let reachable = graph.reachable_from(host_idx);

    let mut affected: BTreeSet<String> = BTreeSet::new();
    for &idx in &reachable {
        let node = graph.node(idx);
        match &node.kind {
            NodeKind::Host { .. } => {
                affected.insert(node.id.clone());
            }
            NodeKind::Vulnerability { affected_host, .. } => {
                affected.insert(affected_host.clone());
            }
            NodeKind::Privilege { host, .. } | NodeKind::Service { host, .. } => {
                affected.insert(host.clone());
            }
            NodeKind::Exploit { vulnerability, .. } => {
                // An exploit's owning host is the one its vulnerability sits on.
                let vuln = graph.resolve(vulnerability)?;
                if let NodeKind::Vulnerability { affected_host, .. } = &graph.node(vuln).kind {
                    affected.insert(affected_host.clone());
                }
            }
        }
    }

    let factor = reachability_factor(reachable.len(), graph.node_count());
    let impact_score = cvss * factor;
    debug!(
        vulnerability = vulnerability_id,
        cvss,
        reachable = reachable.len(),
        impact = impact_score,
        "Impact scored"
    );

    Ok(ImpactReport {
        vulnerability_id: vulnerability_id.to_string(),
        cvss,
        affected_host,
        reachable_count: reachable.len(),
        impact_score,
        affected_hosts: affected.into_iter().collect(),
    })
}

/// Log-scaled, saturating reachability weight in [1, 2). See
/// [`score_impact`] for the required properties.
fn reachability_factor(reachable: usize, total_nodes: usize) -> f64 {
    if total_nodes == 0 {
        return 1.0;
    }
    1.0 + ((1 + reachable) as f64).ln() / ((1 + total_nodes) as f64).ln()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::*;
    use crate::graph::build;

    fn host(id: &str) -> HostEntry {
        HostEntry {
            id: id.into(),
            label: None,
            zone: None,
            ip: None,
            os: None,
        }
    }

    fn vuln(id: &str, cvss: f64, affected_host: &str) -> VulnerabilityEntry {
        VulnerabilityEntry {
            id: id.into(),
            label: None,
            cvss: Some(cvss),
            cvss_vector: None,
            affected_host: affected_host.into(),
        }
    }

    fn edge(from: &str, to: &str) -> EdgeEntry {
        EdgeEntry {
            from: from.into(),
            to: to.into(),
            label: None,
        }
    }

    #[test]
    fn test_sink_host_scores_minimum_factor() {
        let config = TopologyConfig {
            hosts: vec![host("A"), host("B"), host("C")],
            vulnerabilities: vec![vuln("v1", 9.8, "C")],
            network_edges: vec![edge("A", "B"), edge("B", "C")],
            ..Default::default()
        };
        let report = score_impact(&build(&config).unwrap(), "v1").unwrap();
        assert_eq!(report.affected_host, "C");
        assert_eq!(report.reachable_count, 0);
        assert!((report.impact_score - 9.8).abs() < 1e-9);
        assert!(report.affected_hosts.is_empty());
    }

    #[test]
    fn test_zero_cvss_scores_zero_regardless_of_reach() {
        let config = TopologyConfig {
            hosts: vec![host("A"), host("B"), host("C")],
            vulnerabilities: vec![vuln("v1", 0.0, "A")],
            network_edges: vec![edge("A", "B"), edge("B", "C")],
            ..Default::default()
        };
        let report = score_impact(&build(&config).unwrap(), "v1").unwrap();
        assert!(report.reachable_count > 0);
        assert_eq!(report.impact_score, 0.0);
    }

    #[test]
    fn test_score_monotone_in_reachability() {
        // Same CVSS on the chain head and on the chain tail.
        let config = TopologyConfig {
            hosts: vec![host("A"), host("B"), host("C")],
            vulnerabilities: vec![vuln("v-head", 5.0, "A"), vuln("v-tail", 5.0, "C")],
            network_edges: vec![edge("A", "B"), edge("B", "C")],
            ..Default::default()
        };
        let graph = build(&config).unwrap();
        let head = score_impact(&graph, "v-head").unwrap();
        let tail = score_impact(&graph, "v-tail").unwrap();
        assert!(head.reachable_count > tail.reachable_count);
        assert!(head.impact_score > tail.impact_score);
    }

    #[test]
    fn test_affected_hosts_deduplicated_via_owners() {
        let config = TopologyConfig {
            hosts: vec![host("A"), host("B")],
            vulnerabilities: vec![vuln("v1", 7.0, "A")],
            privileges: vec![PrivilegeEntry {
                id: "admin-B".into(),
                label: None,
                host: "B".into(),
                level: "admin".into(),
            }],
            services: vec![ServiceEntry {
                id: "www-B".into(),
                label: None,
                host: "B".into(),
                port: 443,
            }],
            network_edges: vec![edge("A", "B")],
            edges: vec![edge("B", "admin-B"), edge("B", "www-B")],
            ..Default::default()
        };
        let report = score_impact(&build(&config).unwrap(), "v1").unwrap();
        assert_eq!(report.reachable_count, 3);
        // B, admin-B, and www-B all collapse to host B.
        assert_eq!(report.affected_hosts, vec!["B".to_string()]);
    }

    #[test]
    fn test_unknown_id_fails() {
        let config = TopologyConfig {
            hosts: vec![host("A")],
            ..Default::default()
        };
        let err = score_impact(&build(&config).unwrap(), "ghost").unwrap_err();
        assert!(matches!(err, VantageError::NodeNotFound(_)));
    }

    #[test]
    fn test_non_vulnerability_id_fails() {
        let config = TopologyConfig {
            hosts: vec![host("A")],
            ..Default::default()
        };
        let err = score_impact(&build(&config).unwrap(), "A").unwrap_err();
        assert!(matches!(err, VantageError::NodeNotFound(_)));
    }

    #[test]
    fn test_factor_bounds() {
        assert_eq!(reachability_factor(0, 100), 1.0);
        assert!(reachability_factor(99, 100) < 2.0);
        assert!(reachability_factor(50, 100) > reachability_factor(10, 100));
    }
}
