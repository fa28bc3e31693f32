use serde::Serialize;

use super::centrality::betweenness_scores;
use crate::errors::VantageError;
use crate::graph::AttackGraph;

/// Minimum number of positive-betweenness nodes before the top-decile
/// threshold is meaningful; below this, every candidate is reported
/// non-critical and the caller applies judgment.
const QUANTILE_MIN_NODES: usize = 10;

#[derive(Debug, Clone, Serialize)]
pub struct ChokepointReport {
    pub node_id: String,
    pub in_degree: usize,
    pub out_degree: usize,
    pub betweenness: f64,
    pub critical: bool,
}

/// Ranks bottleneck candidates by betweenness. Nodes with zero betweenness
/// carry no bottleneck information and are excluded outright; `critical`
/// marks scores at or above the 90th percentile (nearest-rank) of the
/// candidates.
pub fn find_chokepoints(
    graph: &AttackGraph,
    limit: usize,
) -> Result<Vec<ChokepointReport>, VantageError> {
    if limit == 0 {
        return Err(VantageError::InvalidParameter(
            "limit must be at least 1".into(),
        ));
    }

    let scores = betweenness_scores(graph);
    let mut candidates: Vec<ChokepointReport> = graph
        .indices()
        .filter(|idx| scores[idx.index()] > 0.0)
        .map(|idx| ChokepointReport {
            node_id: graph.node(idx).id.clone(),
            in_degree: graph.in_degree(idx),
            out_degree: graph.out_degree(idx),
            betweenness: scores[idx.index()],
            critical: false,
        })
        .collect();

    candidates.sort_by(|a, b| {
        b.betweenness
            .partial_cmp(&a.betweenness)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.node_id.cmp(&b.node_id))
    });

    if candidates.len() >= QUANTILE_MIN_NODES {
        let threshold = percentile_90(&candidates);
        for candidate in candidates.iter_mut() {
            candidate.critical = candidate.betweenness >= threshold;
        }
    }

    candidates.truncate(limit);
    Ok(candidates)
}

/// Nearest-rank 90th percentile of the betweenness scores; `candidates`
/// must be sorted descending.
fn percentile_90(candidates: &[ChokepointReport]) -> f64 {
    let n = candidates.len();
    let rank = (n as f64 * 0.9).ceil() as usize; // 1-based from the bottom
    candidates[n - rank].betweenness
}
