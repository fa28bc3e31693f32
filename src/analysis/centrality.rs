use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use petgraph::graph::NodeIndex;
use serde::Serialize;

use crate::errors::VantageError;
use crate::graph::AttackGraph;

pub const DEFAULT_DAMPING: f64 = 0.85;
const PAGERANK_TOLERANCE: f64 = 1e-6;
const PAGERANK_MAX_ITERATIONS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    Degree,
    Betweenness,
    Closeness,
    Pagerank,
    All,
}

impl FromStr for Algorithm {
    type Err = VantageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "degree" => Ok(Self::Degree),
            "betweenness" => Ok(Self::Betweenness),
            "closeness" => Ok(Self::Closeness),
            "pagerank" => Ok(Self::Pagerank),
            "all" => Ok(Self::All),
            _ => Err(VantageError::InvalidParameter(format!(
                "unknown algorithm \"{s}\" (expected degree, betweenness, closeness, pagerank, or all)"
            ))),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Degree => "degree",
            Self::Betweenness => "betweenness",
            Self::Closeness => "closeness",
            Self::Pagerank => "pagerank",
            Self::All => "all",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RankedScore {
    pub node_id: String,
    pub score: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct NodeCentrality {
    pub node_id: String,
    pub degree: f64,
    pub betweenness: f64,
    pub closeness: f64,
    pub pagerank: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum CentralityReport {
    Ranked(Vec<RankedScore>),
    /// The `all` mode: every measure per node, ranked by degree.
    Combined(Vec<NodeCentrality>),
}

/// Ranks nodes by the requested measure, descending, ties broken by node
/// id ascending, truncated to `limit`. An empty graph yields an empty
/// ranking.
pub fn compute_centrality(
    graph: &AttackGraph,
    algorithm: Algorithm,
    limit: usize,
) -> Result<CentralityReport, VantageError> {
    if limit == 0 {
        return Err(VantageError::InvalidParameter(
            "limit must be at least 1".into(),
        ));
    }

    let report = match algorithm {
        Algorithm::Degree => CentralityReport::Ranked(rank(graph, degree_scores(graph), limit)),
        Algorithm::Betweenness => {
            CentralityReport::Ranked(rank(graph, betweenness_scores(graph), limit))
        }
        Algorithm::Closeness => {
            CentralityReport::Ranked(rank(graph, closeness_scores(graph), limit))
        }
        Algorithm::Pagerank => CentralityReport::Ranked(rank(
            graph,
            pagerank_scores(graph, DEFAULT_DAMPING),
            limit,
        )),
        Algorithm::All => {
            let degree = degree_scores(graph);
            let betweenness = betweenness_scores(graph);
            let closeness = closeness_scores(graph);
            let pagerank = pagerank_scores(graph, DEFAULT_DAMPING);
            let mut combined: Vec<NodeCentrality> = graph
                .indices()
                .map(|idx| NodeCentrality {
                    node_id: graph.node(idx).id.clone(),
                    degree: degree[idx.index()],
                    betweenness: betweenness[idx.index()],
                    closeness: closeness[idx.index()],
                    pagerank: pagerank[idx.index()],
                })
                .collect();
            combined.sort_by(|a, b| {
                b.degree
                    .partial_cmp(&a.degree)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| a.node_id.cmp(&b.node_id))
            });
            combined.truncate(limit);
            CentralityReport::Combined(combined)
        }
    };
    Ok(report)
}

fn rank(graph: &AttackGraph, scores: Vec<f64>, limit: usize) -> Vec<RankedScore> {
    let mut ranked: Vec<RankedScore> = graph
        .indices()
        .map(|idx| RankedScore {
            node_id: graph.node(idx).id.clone(),
            score: scores[idx.index()],
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.node_id.cmp(&b.node_id))
    });
    ranked.truncate(limit);
    ranked
}

/// Raw in-degree + out-degree per node, unnormalized.
pub fn degree_scores(graph: &AttackGraph) -> Vec<f64> {
    graph
        .indices()
        .map(|idx| (graph.in_degree(idx) + graph.out_degree(idx)) as f64)
        .collect()
}

/// Brandes' betweenness over the directed, unweighted graph, normalized by
/// the `(n-1)(n-2)` ordered pairs that exclude the node itself.
pub fn betweenness_scores(graph: &AttackGraph) -> Vec<f64> {
    let n = graph.node_count();
    let mut centrality = vec![0.0; n];
    if n < 3 {
        return centrality;
    }

    for s in graph.indices() {
        let mut stack: Vec<NodeIndex> = Vec::new();
        let mut preds: Vec<Vec<NodeIndex>> = vec![Vec::new(); n];
        let mut sigma = vec![0.0f64; n];
        let mut dist: Vec<i64> = vec![-1; n];
        sigma[s.index()] = 1.0;
        dist[s.index()] = 0;

        let mut queue = VecDeque::new();
        queue.push_back(s);
        while let Some(v) = queue.pop_front() {
            stack.push(v);
            for w in graph.successors(v) {
                if dist[w.index()] < 0 {
                    dist[w.index()] = dist[v.index()] + 1;
                    queue.push_back(w);
                }
                if dist[w.index()] == dist[v.index()] + 1 {
                    sigma[w.index()] += sigma[v.index()];
                    preds[w.index()].push(v);
                }
            }
        }

        // Back-propagate pair dependencies in reverse BFS order.
        let mut delta = vec![0.0f64; n];
        while let Some(w) = stack.pop() {
            for &v in &preds[w.index()] {
                let contribution =
                    sigma[v.index()] / sigma[w.index()] * (1.0 + delta[w.index()]);
                delta[v.index()] += contribution;
            }
            if w != s {
                centrality[w.index()] += delta[w.index()];
            }
        }
    }

    let pairs = ((n - 1) * (n - 2)) as f64;
    for score in centrality.iter_mut() {
        *score /= pairs;
    }
    centrality
}

/// Inverse of the mean shortest-path distance to the reachable set; a node
/// that reaches nothing scores 0.
pub fn closeness_scores(graph: &AttackGraph) -> Vec<f64> {
    graph
        .indices()
        .map(|idx| {
            let dist = graph.distances_from(idx);
            let total: usize = dist.values().sum();
            if total == 0 {
                0.0
            } else {
                dist.len() as f64 / total as f64
            }
        })
        .collect()
}

/// Damped random-walk importance, converged by power iteration with a
/// fixed tolerance and iteration cap. Rank mass leaving sink nodes is
/// redistributed uniformly so scores keep summing to 1.
pub fn pagerank_scores(graph: &AttackGraph, damping: f64) -> Vec<f64> {
    let n = graph.node_count();
    if n == 0 {
        return Vec::new();
    }
    let nf = n as f64;
    let out_degree: Vec<usize> = graph.indices().map(|idx| graph.out_degree(idx)).collect();
    let mut rank = vec![1.0 / nf; n];

    for _ in 0..PAGERANK_MAX_ITERATIONS {
        let dangling: f64 = graph
            .indices()
            .filter(|idx| out_degree[idx.index()] == 0)
            .map(|idx| rank[idx.index()])
            .sum();

        let base = (1.0 - damping) / nf + damping * dangling / nf;
        let mut next = vec![base; n];
        for v in graph.indices() {
            let deg = out_degree[v.index()];
            if deg > 0 {
                let share = damping * rank[v.index()] / deg as f64;
                for w in graph.successors(v) {
                    next[w.index()] += share;
                }
            }
        }

        let diff: f64 = rank
            .iter()
            .zip(next.iter())
            .map(|(old, new)| (old - new).abs())
            .sum();
        rank = next;
        if diff < PAGERANK_TOLERANCE {
            break;
        }
    }
    rank
}
