use std::collections::HashSet;

use petgraph::graph::NodeIndex;
use serde::Serialize;
use tracing::debug;

use crate::errors::VantageError;
use crate::graph::AttackGraph;

/// A simple directed path: node ids from source to target, no repeats.
#[derive(Debug, Clone, Serialize)]
pub struct Path {
    pub nodes: Vec<String>,
    /// Number of edges, i.e. `nodes.len() - 1`.
    pub length: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct PathReport {
    pub source: String,
    pub target: String,
    pub paths: Vec<Path>,
    /// Minimum length over the returned paths; absent when disconnected.
    pub shortest_length: Option<usize>,
    /// True when enumeration stopped at the `max_paths` bound.
    pub truncated: bool,
}

/// Enumerates up to `max_paths` simple directed paths from `source_id` to
/// `target_id`, ordered by non-decreasing length.
///
/// Depth-first with a per-branch visited set: a node may appear on many
/// candidate paths but never twice within one, which also bounds the
/// traversal on cyclic graphs. Within equal lengths the discovery order is
/// kept, which is fixed by declaration order and therefore reproducible.
pub fn find_paths(
    graph: &AttackGraph,
    source_id: &str,
    target_id: &str,
    max_paths: usize,
) -> Result<PathReport, VantageError> {
    if max_paths == 0 {
        return Err(VantageError::InvalidParameter(
            "max_paths must be at least 1".into(),
        ));
    }
    let source = graph.resolve(source_id)?;
    let target = graph.resolve(target_id)?;

    let mut found: Vec<Vec<NodeIndex>> = Vec::new();
    let mut trail = vec![source];
    let mut on_trail: HashSet<NodeIndex> = HashSet::from([source]);
    let truncated = dfs(
        graph,
        target,
        max_paths,
        &mut trail,
        &mut on_trail,
        &mut found,
    );

    let mut paths: Vec<Path> = found
        .into_iter()
        .map(|indices| Path {
            length: indices.len() - 1,
            nodes: indices
                .into_iter()
                .map(|idx| graph.node(idx).id.clone())
                .collect(),
        })
        .collect();
    paths.sort_by_key(|p| p.length);

    debug!(
        source = source_id,
        target = target_id,
        paths = paths.len(),
        truncated,
        "Path enumeration finished"
    );
    Ok(PathReport {
        source: source_id.to_string(),
        target: target_id.to_string(),
        shortest_length: paths.first().map(|p| p.length),
        paths,
        truncated,
    })
}

/// Returns true when the `max_paths` bound cut enumeration short.
fn dfs(
    graph: &AttackGraph,
    target: NodeIndex,
    max_paths: usize,
    trail: &mut Vec<NodeIndex>,
    on_trail: &mut HashSet<NodeIndex>,
    found: &mut Vec<Vec<NodeIndex>>,
) -> bool {
    let current = *trail.last().expect("trail is never empty");
    if current == target {
        found.push(trail.clone());
        return found.len() >= max_paths;
    }
    for next in graph.successors(current) {
        if !on_trail.insert(next) {
            continue;
        }
        trail.push(next);
        let full = dfs(graph, target, max_paths, trail, on_trail, found);
        trail.pop();
        on_trail.remove(&next);
        if full {
            return true;
        }
    }
    false
}
