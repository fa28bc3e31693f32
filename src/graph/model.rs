use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use serde::Serialize;

use super::node::{EdgeInfo, Node};
use crate::errors::VantageError;

/// Immutable snapshot of one topology: a directed graph over typed nodes
/// with an id index. Built once per analysis request and never mutated;
/// every analysis borrows it read-only.
#[derive(Debug)]
pub struct AttackGraph {
    graph: DiGraph<Node, EdgeInfo>,
    index: HashMap<String, NodeIndex>,
}

/// Derived counts returned alongside every report. Never echoes nodes or
/// edges themselves.
#[derive(Debug, Clone, Serialize)]
pub struct GraphSummary {
    pub nodes: usize,
    pub edges: usize,
    pub kinds: BTreeMap<&'static str, usize>,
}

impl AttackGraph {
    pub(crate) fn new(graph: DiGraph<Node, EdgeInfo>, index: HashMap<String, NodeIndex>) -> Self {
        Self { graph, index }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Node indices in declaration order.
    pub fn indices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    pub fn node(&self, idx: NodeIndex) -> &Node {
        &self.graph[idx]
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Resolves an id to its index, failing fast on the first missing node
    /// as analysis parameters must.
    pub fn resolve(&self, id: &str) -> Result<NodeIndex, VantageError> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| VantageError::NodeNotFound(format!("\"{id}\"")))
    }

    pub fn in_degree(&self, idx: NodeIndex) -> usize {
        self.graph.edges_directed(idx, Direction::Incoming).count()
    }

    pub fn out_degree(&self, idx: NodeIndex) -> usize {
        self.graph.edges_directed(idx, Direction::Outgoing).count()
    }

    /// Successors in edge insertion order. petgraph walks adjacency lists
    /// newest-first, so the walk order is reversed to keep traversal order
    /// tied to declaration order.
    pub fn successors(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut out: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(idx, Direction::Outgoing)
            .collect();
        out.reverse();
        out
    }

    pub fn predecessors(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut out: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(idx, Direction::Incoming)
            .collect();
        out.reverse();
        out
    }

    /// Forward-reachable set from `start`, excluding `start` itself.
    /// Breadth-first; each node is visited at most once, so the traversal
    /// terminates on cyclic graphs.
    pub fn reachable_from(&self, start: NodeIndex) -> HashSet<NodeIndex> {
        let mut reachable = HashSet::new();
        let mut queue = VecDeque::new();
        queue.push_back(start);
        let mut seen = HashSet::new();
        seen.insert(start);

        while let Some(current) = queue.pop_front() {
            for next in self.successors(current) {
                if seen.insert(next) {
                    reachable.insert(next);
                    queue.push_back(next);
                }
            }
        }
        reachable
    }

    /// Unweighted shortest-path distances from `start` to every reachable
    /// node, excluding `start`.
    pub fn distances_from(&self, start: NodeIndex) -> HashMap<NodeIndex, usize> {
        let mut dist = HashMap::new();
        let mut queue = VecDeque::new();
        dist.insert(start, 0usize);
        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            let d = dist[&current];
            for next in self.successors(current) {
                if !dist.contains_key(&next) {
                    dist.insert(next, d + 1);
                    queue.push_back(next);
                }
            }
        }
        dist.remove(&start);
        dist
    }

    pub fn summary(&self) -> GraphSummary {
        let mut kinds: BTreeMap<&'static str, usize> = BTreeMap::new();
        for idx in self.indices() {
            *kinds.entry(self.node(idx).kind.name()).or_default() += 1;
        }
        GraphSummary {
            nodes: self.node_count(),
            edges: self.edge_count(),
            kinds,
        }
    }
}
