use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};
use tracing::debug;

use super::model::AttackGraph;
use super::node::{EdgeInfo, Node, NodeKind};
use crate::config::cvss;
use crate::config::types::TopologyConfig;
use crate::errors::VantageError;

/// Builds an immutable graph snapshot from a decoded topology document.
///
/// Validation is exhaustive: every duplicate id, dangling reference, and
/// out-of-range score found anywhere in the document is collected, and the
/// whole list is returned in a single `Config` error. Edges are derived in
/// a fixed order (exploit pre/post-conditions in declaration order, then
/// network edges, then explicit edges) so traversal order is reproducible
/// for identical input.
pub fn build(config: &TopologyConfig) -> Result<AttackGraph, VantageError> {
    let mut graph: DiGraph<Node, EdgeInfo> = DiGraph::new();
    let mut index: HashMap<String, NodeIndex> = HashMap::new();
    let mut declared_at: HashMap<String, String> = HashMap::new();
    let mut problems: Vec<String> = Vec::new();

    let mut register = |graph: &mut DiGraph<Node, EdgeInfo>,
                        problems: &mut Vec<String>,
                        entry_ref: String,
                        node: Node| {
        if node.id.is_empty() {
            problems.push(format!("empty node id in {entry_ref}"));
            return;
        }
        match declared_at.get(&node.id) {
            Some(first) => {
                problems.push(format!(
                    "duplicate node id \"{}\" ({} and {})",
                    node.id, first, entry_ref
                ));
            }
            None => {
                declared_at.insert(node.id.clone(), entry_ref);
                let id = node.id.clone();
                let idx = graph.add_node(node);
                index.insert(id, idx);
            }
        }
    };

    for (i, entry) in config.hosts.iter().enumerate() {
        register(
            &mut graph,
            &mut problems,
            format!("hosts[{i}]"),
            Node {
                id: entry.id.clone(),
                label: entry.label.clone().unwrap_or_else(|| entry.id.clone()),
                kind: NodeKind::Host {
                    zone: entry.zone.clone().unwrap_or_else(|| "internal".into()),
                    ip: entry.ip.clone(),
                    os: entry.os.clone(),
                },
            },
        );
    }

    for (i, entry) in config.vulnerabilities.iter().enumerate() {
        let score = match (entry.cvss, entry.cvss_vector.as_deref()) {
            // An explicit numeric score wins, but a malformed vector is
            // still a reportable problem.
            (Some(score), vector) => {
                if let Some(v) = vector {
                    if let Err(e) = cvss::base_score(v) {
                        problems.push(format!("vulnerability \"{}\": {e}", entry.id));
                    }
                }
                if !(0.0..=10.0).contains(&score) {
                    problems.push(format!(
                        "vulnerability \"{}\" cvss {} outside the 0.0..=10.0 range",
                        entry.id, score
                    ));
                }
                score.clamp(0.0, 10.0)
            }
            (None, Some(vector)) => match cvss::base_score(vector) {
                Ok(score) => score,
                Err(e) => {
                    problems.push(format!("vulnerability \"{}\": {e}", entry.id));
                    0.0
                }
            },
            (None, None) => 0.0,
        };
        register(
            &mut graph,
            &mut problems,
            format!("vulnerabilities[{i}]"),
            Node {
                id: entry.id.clone(),
                label: entry.label.clone().unwrap_or_else(|| entry.id.clone()),
                kind: NodeKind::Vulnerability {
                    cvss: score,
                    affected_host: entry.affected_host.clone(),
                },
            },
        );
    }

    for (i, entry) in config.privileges.iter().enumerate() {
        register(
            &mut graph,
            &mut problems,
            format!("privileges[{i}]"),
            Node {
                id: entry.id.clone(),
                label: entry.label.clone().unwrap_or_else(|| entry.id.clone()),
                kind: NodeKind::Privilege {
                    host: entry.host.clone(),
                    level: entry.level.clone(),
                },
            },
        );
    }

    for (i, entry) in config.services.iter().enumerate() {
        register(
            &mut graph,
            &mut problems,
            format!("services[{i}]"),
            Node {
                id: entry.id.clone(),
                label: entry.label.clone().unwrap_or_else(|| entry.id.clone()),
                kind: NodeKind::Service {
                    host: entry.host.clone(),
                    port: entry.port,
                },
            },
        );
    }

    for (i, entry) in config.exploits.iter().enumerate() {
        register(
            &mut graph,
            &mut problems,
            format!("exploits[{i}]"),
            Node {
                id: entry.id.clone(),
                label: entry.label.clone().unwrap_or_else(|| entry.id.clone()),
                kind: NodeKind::Exploit {
                    vulnerability: entry.vulnerability.clone(),
                    precondition: entry.precondition.clone(),
                    postcondition: entry.postcondition.clone(),
                },
            },
        );
    }

    // Reference integrity over the registered nodes.
    for entry in &config.vulnerabilities {
        check_host_ref(
            &index,
            &graph,
            &mut problems,
            &entry.affected_host,
            &format!("vulnerability \"{}\"", entry.id),
            "affected_host",
        );
    }
    for entry in &config.privileges {
        check_host_ref(
            &index,
            &graph,
            &mut problems,
            &entry.host,
            &format!("privilege \"{}\"", entry.id),
            "host",
        );
    }
    for entry in &config.services {
        check_host_ref(
            &index,
            &graph,
            &mut problems,
            &entry.host,
            &format!("service \"{}\"", entry.id),
            "host",
        );
    }
    for entry in &config.exploits {
        let who = format!("exploit \"{}\"", entry.id);
        match kind_of(&index, &graph, &entry.vulnerability) {
            None => problems.push(format!(
                "{who} references unknown vulnerability \"{}\"",
                entry.vulnerability
            )),
            Some("vulnerability") => {}
            Some(_) => problems.push(format!(
                "{who} field vulnerability \"{}\" is not a vulnerability node",
                entry.vulnerability
            )),
        }
        for (field, id) in [
            ("precondition", &entry.precondition),
            ("postcondition", &entry.postcondition),
        ] {
            if !index.contains_key(id) {
                problems.push(format!("{who} references unknown node \"{id}\" in {field}"));
            }
        }
    }
    for (i, entry) in config.network_edges.iter().enumerate() {
        for id in [&entry.from, &entry.to] {
            match kind_of(&index, &graph, id) {
                None => problems
                    .push(format!("network_edges[{i}] references unknown node \"{id}\"")),
                Some("host") => {}
                Some(_) => {
                    problems.push(format!("network_edges[{i}] endpoint \"{id}\" is not a host"))
                }
            }
        }
    }
    for (i, entry) in config.edges.iter().enumerate() {
        for id in [&entry.from, &entry.to] {
            if !index.contains_key(id) {
                problems.push(format!("edges[{i}] references unknown node \"{id}\""));
            }
        }
    }

    if !problems.is_empty() {
        return Err(VantageError::Config(problems));
    }

    // Derivation pass. All references resolved above, so plain indexing is
    // safe from here on.
    for entry in &config.exploits {
        let exploit = index[&entry.id];
        graph.add_edge(index[&entry.precondition], exploit, EdgeInfo::default());
        graph.add_edge(exploit, index[&entry.postcondition], EdgeInfo::default());
    }
    for entry in &config.network_edges {
        graph.add_edge(
            index[&entry.from],
            index[&entry.to],
            EdgeInfo {
                label: entry.label.clone(),
            },
        );
    }
    for entry in &config.edges {
        graph.add_edge(
            index[&entry.from],
            index[&entry.to],
            EdgeInfo {
                label: entry.label.clone(),
            },
        );
    }

    debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "Attack graph built"
    );
    Ok(AttackGraph::new(graph, index))
}

fn kind_of<'a>(
    index: &HashMap<String, NodeIndex>,
    graph: &'a DiGraph<Node, EdgeInfo>,
    id: &str,
) -> Option<&'a str> {
    index.get(id).map(|&idx| graph[idx].kind.name())
}

fn check_host_ref(
    index: &HashMap<String, NodeIndex>,
    graph: &DiGraph<Node, EdgeInfo>,
    problems: &mut Vec<String>,
    id: &str,
    who: &str,
    field: &str,
) {
    match index.get(id) {
        None => problems.push(format!("{who} references unknown host \"{id}\" in {field}")),
        Some(&idx) => {
            if !graph[idx].kind.is_host() {
                problems.push(format!("{who} field {field} \"{id}\" is not a host node"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::*;

    fn host(id: &str) -> HostEntry {
        HostEntry {
            id: id.into(),
            label: None,
            zone: None,
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
    fn test_build_empty_config() {
        let graph = build(&TopologyConfig::default()).unwrap();
        assert!(graph.is_empty());
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_duplicate_id_names_both_entries() {
        let config = TopologyConfig {
            hosts: vec![host("A"), host("B"), host("A")],
            ..Default::default()
        };
        let err = build(&config).unwrap_err();
        let VantageError::Config(problems) = err else {
            panic!("expected Config error")
        };
        assert_eq!(problems.len(), 1);
        assert!(problems[0].contains("\"A\""));
        assert!(problems[0].contains("hosts[0]"));
        assert!(problems[0].contains("hosts[2]"));
    }

    #[test]
    fn test_duplicate_id_across_kinds() {
        let config = TopologyConfig {
            hosts: vec![host("web")],
            services: vec![ServiceEntry {
                id: "web".into(),
                label: None,
                host: "web".into(),
                port: 80,
            }],
            ..Default::default()
        };
        let err = build(&config).unwrap_err();
        assert!(err.to_string().contains("duplicate node id \"web\""));
    }

    #[test]
    fn test_all_problems_reported_in_one_pass() {
        let config = TopologyConfig {
            hosts: vec![host("A"), host("A")],
            vulnerabilities: vec![VulnerabilityEntry {
                id: "v1".into(),
                label: None,
                cvss: Some(11.0),
                cvss_vector: None,
                affected_host: "missing".into(),
            }],
            network_edges: vec![edge("A", "nowhere")],
            ..Default::default()
        };
        let err = build(&config).unwrap_err();
        let VantageError::Config(problems) = err else {
            panic!("expected Config error")
        };
        // duplicate id, out-of-range cvss, dangling affected_host, dangling edge
        assert_eq!(problems.len(), 4);
    }

    #[test]
    fn test_dangling_exploit_references() {
        let config = TopologyConfig {
            hosts: vec![host("A")],
            vulnerabilities: vec![VulnerabilityEntry {
                id: "v1".into(),
                label: None,
                cvss: Some(5.0),
                cvss_vector: None,
                affected_host: "A".into(),
            }],
            exploits: vec![ExploitEntry {
                id: "e1".into(),
                label: None,
                vulnerability: "v1".into(),
                precondition: "ghost".into(),
                postcondition: "A".into(),
            }],
            ..Default::default()
        };
        let err = build(&config).unwrap_err();
        assert!(err.to_string().contains("ghost"));
        assert!(err.to_string().contains("precondition"));
    }

    #[test]
    fn test_exploit_derives_two_edges() {
        let config = TopologyConfig {
            hosts: vec![host("A"), host("B")],
            vulnerabilities: vec![VulnerabilityEntry {
                id: "v1".into(),
                label: None,
                cvss: Some(7.0),
                cvss_vector: None,
                affected_host: "B".into(),
            }],
            exploits: vec![ExploitEntry {
                id: "e1".into(),
                label: None,
                vulnerability: "v1".into(),
                precondition: "A".into(),
                postcondition: "B".into(),
            }],
            ..Default::default()
        };
        let graph = build(&config).unwrap();
        // A -> e1 and e1 -> B
        assert_eq!(graph.edge_count(), 2);
        let e1 = graph.resolve("e1").unwrap();
        assert_eq!(graph.in_degree(e1), 1);
        assert_eq!(graph.out_degree(e1), 1);
    }

    #[test]
    fn test_cvss_vector_resolves_score() {
        let config = TopologyConfig {
            hosts: vec![host("A")],
            vulnerabilities: vec![VulnerabilityEntry {
                id: "v1".into(),
                label: None,
                cvss: None,
                cvss_vector: Some("CVSS:3.1/AV:N/AC:L/PR:N/UI:N/S:U/C:H/I:H/A:H".into()),
                affected_host: "A".into(),
            }],
            ..Default::default()
        };
        let graph = build(&config).unwrap();
        let idx = graph.resolve("v1").unwrap();
        let NodeKind::Vulnerability { cvss, .. } = &graph.node(idx).kind else {
            panic!("expected vulnerability node")
        };
        assert_eq!(*cvss, 9.8);
    }

    #[test]
    fn test_missing_score_defaults_to_zero() {
        let config = TopologyConfig {
            hosts: vec![host("A")],
            vulnerabilities: vec![VulnerabilityEntry {
                id: "v1".into(),
                label: None,
                cvss: None,
                cvss_vector: None,
                affected_host: "A".into(),
            }],
            ..Default::default()
        };
        let graph = build(&config).unwrap();
        let idx = graph.resolve("v1").unwrap();
        let NodeKind::Vulnerability { cvss, .. } = &graph.node(idx).kind else {
            panic!("expected vulnerability node")
        };
        assert_eq!(*cvss, 0.0);
    }

    #[test]
    fn test_network_edge_endpoints_must_be_hosts() {
        let config = TopologyConfig {
            hosts: vec![host("A")],
            vulnerabilities: vec![VulnerabilityEntry {
                id: "v1".into(),
                label: None,
                cvss: Some(1.0),
                cvss_vector: None,
                affected_host: "A".into(),
            }],
            network_edges: vec![edge("A", "v1")],
            ..Default::default()
        };
        let err = build(&config).unwrap_err();
        assert!(err.to_string().contains("is not a host"));
    }

    #[test]
    fn test_explicit_edge_any_kind() {
        let config = TopologyConfig {
            hosts: vec![host("A")],
            privileges: vec![PrivilegeEntry {
                id: "root-A".into(),
                label: None,
                host: "A".into(),
                level: "admin".into(),
            }],
            edges: vec![EdgeEntry {
                from: "A".into(),
                to: "root-A".into(),
                label: Some("escalation".into()),
            }],
            ..Default::default()
        };
        let graph = build(&config).unwrap();
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_referential_closure() {
        let config = TopologyConfig {
            hosts: vec![host("A"), host("B"), host("C")],
            network_edges: vec![edge("A", "B"), edge("B", "C")],
            ..Default::default()
        };
        let graph = build(&config).unwrap();
        for idx in graph.indices() {
            for next in graph.successors(idx) {
                assert!(graph.contains(&graph.node(next).id));
            }
        }
    }

    #[test]
    fn test_label_defaults_to_id() {
        let config = TopologyConfig {
            hosts: vec![host("web-01")],
            ..Default::default()
        };
        let graph = build(&config).unwrap();
        let idx = graph.resolve("web-01").unwrap();
        assert_eq!(graph.node(idx).label, "web-01");
    }
}
