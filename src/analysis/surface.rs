use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::graph::{AttackGraph, NodeKind};

/// Zone marker that makes a host an entry point regardless of in-degree.
const EXTERNAL_ZONE: &str = "external";

#[derive(Debug, Clone, Serialize)]
pub struct EntryPointReport {
    pub node_id: String,
    pub kind: &'static str,
    pub out_degree: usize,
    pub reachable_count: usize,
    /// Reachable node ids grouped by kind, each group id-sorted.
    pub reachable_by_kind: BTreeMap<&'static str, Vec<String>>,
}

/// Identifies entry points — nodes with no incoming edges, plus hosts in
/// the external zone — and sizes what each can reach. The two rules are
/// checked per node in one pass, so their union contains no duplicates.
pub fn analyze_surface(graph: &AttackGraph) -> Vec<EntryPointReport> {
    let mut reports: Vec<EntryPointReport> = graph
        .indices()
        .filter(|&idx| {
            let node = graph.node(idx);
            let external_host = matches!(
                &node.kind,
                NodeKind::Host { zone, .. } if zone.eq_ignore_ascii_case(EXTERNAL_ZONE)
            );
            external_host || graph.in_degree(idx) == 0
        })
        .map(|idx| {
            let node = graph.node(idx);
            let reachable = graph.reachable_from(idx);
            let mut by_kind: BTreeMap<&'static str, Vec<String>> = BTreeMap::new();
            for &other in &reachable {
                let other_node = graph.node(other);
                by_kind
                    .entry(other_node.kind.name())
                    .or_default()
                    .push(other_node.id.clone());
            }
            for group in by_kind.values_mut() {
                group.sort();
            }
            EntryPointReport {
                node_id: node.id.clone(),
                kind: node.kind.name(),
                out_degree: graph.out_degree(idx),
                reachable_count: reachable.len(),
                reachable_by_kind: by_kind,
            }
        })
        .collect();

    reports.sort_by(|a, b| {
        b.reachable_count
            .cmp(&a.reachable_count)
            .then_with(|| a.node_id.cmp(&b.node_id))
    });

    debug!(entry_points = reports.len(), "Attack surface analyzed");
    reports
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::{EdgeEntry, HostEntry, TopologyConfig};
    use crate::graph::build;

    fn host(id: &str, zone: Option<&str>) -> HostEntry {
        HostEntry {
            id: id.into(),
            label: None,
            zone: zone.map(Into::into),
            ip: None,
            os: None,
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
    fn test_in_degree_zero_is_entry_point() {
        let config = TopologyConfig {
            hosts: vec![host("A", None), host("B", None), host("C", None)],
            network_edges: vec![edge("A", "B"), edge("B", "C")],
            ..Default::default()
        };
        let reports = analyze_surface(&build(&config).unwrap());
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].node_id, "A");
        assert_eq!(reports[0].reachable_count, 2);
        assert_eq!(reports[0].out_degree, 1);
    }

    #[test]
    fn test_external_zone_is_entry_point_despite_in_edges() {
        let config = TopologyConfig {
            hosts: vec![host("gw", Some("External")), host("lan", None)],
            network_edges: vec![edge("lan", "gw"), edge("gw", "lan")],
            ..Default::default()
        };
        let reports = analyze_surface(&build(&config).unwrap());
        // gw qualifies by zone (case-insensitive) even with in-degree 1;
        // lan has in-degree 1 and an internal zone, so it does not.
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].node_id, "gw");
    }

    #[test]
    fn test_rules_union_without_duplicates() {
        let config = TopologyConfig {
            hosts: vec![host("edge", Some("external")), host("app", None)],
            network_edges: vec![edge("edge", "app")],
            ..Default::default()
        };
        let reports = analyze_surface(&build(&config).unwrap());
        // "edge" matches both rules but appears once.
        assert_eq!(
            reports.iter().filter(|r| r.node_id == "edge").count(),
            1
        );
    }

    #[test]
    fn test_isolated_entry_point_reaches_nothing() {
        let config = TopologyConfig {
            hosts: vec![host("lone", None)],
            ..Default::default()
        };
        let reports = analyze_surface(&build(&config).unwrap());
        assert_eq!(reports[0].reachable_count, 0);
        assert_eq!(reports[0].out_degree, 0);
        assert!(reports[0].reachable_by_kind.is_empty());
    }

    #[test]
    fn test_reachable_grouped_by_kind() {
        let config = TopologyConfig {
            hosts: vec![host("A", Some("external")), host("B", None)],
            services: vec![crate::config::types::ServiceEntry {
                id: "ssh-B".into(),
                label: None,
                host: "B".into(),
                port: 22,
            }],
            network_edges: vec![edge("A", "B")],
            edges: vec![edge("B", "ssh-B")],
            ..Default::default()
        };
        let reports = analyze_surface(&build(&config).unwrap());
        let a = reports.iter().find(|r| r.node_id == "A").unwrap();
        assert_eq!(a.reachable_count, 2);
        assert_eq!(a.reachable_by_kind["host"], vec!["B".to_string()]);
        assert_eq!(a.reachable_by_kind["service"], vec!["ssh-B".to_string()]);
    }

    #[test]
    fn test_ordering_by_reachable_count_then_id() {
        let config = TopologyConfig {
            hosts: vec![
                host("x", None),
                host("a", None),
                host("big", None),
                host("t1", None),
                host("t2", None),
            ],
            network_edges: vec![edge("big", "t1"), edge("big", "t2")],
            ..Default::default()
        };
        let reports = analyze_surface(&build(&config).unwrap());
        // big reaches 2; a and x reach 0 and tie, id-ascending.
        assert_eq!(reports[0].node_id, "big");
        assert_eq!(reports[1].node_id, "a");
        assert_eq!(reports[2].node_id, "x");
    }

    #[test]
    fn test_empty_graph_empty_report() {
        let reports = analyze_surface(&build(&TopologyConfig::default()).unwrap());
        assert!(reports.is_empty());
    }
}
