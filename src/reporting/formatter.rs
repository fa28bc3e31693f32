use console::style;

use crate::analysis::{
    CentralityReport, ChokepointReport, EntryPointReport, ImpactReport, PathReport,
};
use crate::graph::GraphSummary;

pub fn format_summary(summary: &GraphSummary) -> String {
    let kinds = summary
        .kinds
        .iter()
        .map(|(kind, count)| format!("{kind}: {count}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "Graph: {} nodes, {} edges ({})\n",
        summary.nodes, summary.edges, kinds
    )
}

pub fn format_paths(report: &PathReport) -> String {
    let mut out = format!(
        "## Paths {} -> {}\n\n",
        report.source, report.target
    );
    if report.paths.is_empty() {
        out.push_str("No path exists.\n");
        return out;
    }
    if let Some(shortest) = report.shortest_length {
        out.push_str(&format!("Shortest length: {shortest}\n"));
    }
    if report.truncated {
        out.push_str("(enumeration stopped at the requested path bound)\n");
    }
    out.push('\n');
    for (i, path) in report.paths.iter().enumerate() {
        out.push_str(&format!(
            "{:>3}. [{}] {}\n",
            i + 1,
            path.length,
            path.nodes.join(" -> ")
        ));
    }
    out
}

pub fn format_centrality(report: &CentralityReport) -> String {
    match report {
        CentralityReport::Ranked(ranked) => {
            let mut out = String::from("## Centrality ranking\n\n| # | Node | Score |\n|---|---|---|\n");
            for (i, entry) in ranked.iter().enumerate() {
                out.push_str(&format!(
                    "| {} | {} | {:.6} |\n",
                    i + 1,
                    entry.node_id,
                    entry.score
                ));
            }
            out
        }
        CentralityReport::Combined(combined) => {
            let mut out = String::from(
                "## Centrality (all measures)\n\n| Node | Degree | Betweenness | Closeness | PageRank |\n|---|---|---|---|---|\n",
            );
            for entry in combined {
                out.push_str(&format!(
                    "| {} | {} | {:.6} | {:.6} | {:.6} |\n",
                    entry.node_id,
                    entry.degree,
                    entry.betweenness,
                    entry.closeness,
                    entry.pagerank
                ));
            }
            out
        }
    }
}

pub fn format_chokepoints(reports: &[ChokepointReport]) -> String {
    if reports.is_empty() {
        return "No chokepoints: every node has zero betweenness.\n".into();
    }
    let mut out = String::from(
        "## Chokepoints\n\n| # | Node | In | Out | Betweenness | Critical |\n|---|---|---|---|---|---|\n",
    );
    for (i, report) in reports.iter().enumerate() {
        let critical = if report.critical {
            style("yes").red().bold().to_string()
        } else {
            "no".to_string()
        };
        out.push_str(&format!(
            "| {} | {} | {} | {} | {:.6} | {} |\n",
            i + 1,
            report.node_id,
            report.in_degree,
            report.out_degree,
            report.betweenness,
            critical
        ));
    }
    out
}

pub fn format_surface(reports: &[EntryPointReport]) -> String {
    if reports.is_empty() {
        return "No entry points found.\n".into();
    }
    let mut out = String::from("## Attack surface\n");
    for report in reports {
        out.push_str(&format!(
            "\n### {} ({})\n\nOut-degree: {}\nReachable nodes: {}\n",
            report.node_id, report.kind, report.out_degree, report.reachable_count
        ));
        for (kind, ids) in &report.reachable_by_kind {
            out.push_str(&format!("- {kind}: {}\n", ids.join(", ")));
        }
    }
    out
}

pub fn format_impact(report: &ImpactReport) -> String {
    let severity = if report.impact_score >= 9.0 {
        style("critical").red().bold().to_string()
    } else if report.impact_score >= 7.0 {
        style("high").red().to_string()
    } else if report.impact_score >= 4.0 {
        style("medium").yellow().to_string()
    } else {
        style("low").green().to_string()
    };
    let mut out = format!(
        "## Impact: {}\n\n**CVSS:** {:.1}\n**Affected host:** {}\n**Reachable nodes:** {}\n**Impact score:** {:.2} ({severity})\n",
        report.vulnerability_id,
        report.cvss,
        report.affected_host,
        report.reachable_count,
        report.impact_score,
    );
    if !report.affected_hosts.is_empty() {
        out.push_str(&format!(
            "**Hosts at risk:** {}\n",
            report.affected_hosts.join(", ")
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::paths::Path;

    #[test]
    fn test_format_paths_lists_routes() {
        let report = PathReport {
            source: "A".into(),
            target: "C".into(),
            paths: vec![Path {
                nodes: vec!["A".into(), "B".into(), "C".into()],
                length: 2,
            }],
            shortest_length: Some(2),
            truncated: false,
        };
        let text = format_paths(&report);
        assert!(text.contains("A -> B -> C"));
        assert!(text.contains("Shortest length: 2"));
    }

    #[test]
    fn test_format_paths_empty() {
        let report = PathReport {
            source: "A".into(),
            target: "Z".into(),
            paths: vec![],
            shortest_length: None,
            truncated: false,
        };
        assert!(format_paths(&report).contains("No path exists"));
    }

    #[test]
    fn test_format_impact_mentions_hosts() {
        let report = ImpactReport {
            vulnerability_id: "v1".into(),
            cvss: 9.8,
            affected_host: "db".into(),
            reachable_count: 3,
            impact_score: 12.4,
            affected_hosts: vec!["app".into(), "db2".into()],
        };
        let text = format_impact(&report);
        assert!(text.contains("app, db2"));
        assert!(text.contains("9.8"));
    }
}
