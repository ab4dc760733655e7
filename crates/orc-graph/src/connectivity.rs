use std::collections::{BTreeSet, VecDeque};

use orc_core::NodeId;
use serde::{Deserialize, Serialize};

use crate::hypergraph::Hypergraph;

/// Whether every node can reach every other node through shared hyperedges.
///
/// The empty hypergraph is trivially connected.
pub fn is_weakly_connected(graph: &Hypergraph) -> bool {
    let Some(start) = graph.nodes().next() else {
        return true;
    };
    reachable_from(graph, start).len() == graph.node_count()
}

/// Partition of the node set into connected components, in node order of
/// each component's smallest member.
pub fn connected_components(graph: &Hypergraph) -> Vec<BTreeSet<NodeId>> {
    let mut visited: BTreeSet<NodeId> = BTreeSet::new();
    let mut components = Vec::new();
    for node in graph.nodes() {
        if visited.contains(node) {
            continue;
        }
        let component = reachable_from(graph, node);
        visited.extend(component.iter().cloned());
        components.push(component);
    }
    components
}

fn reachable_from(graph: &Hypergraph, start: &NodeId) -> BTreeSet<NodeId> {
    let mut seen = BTreeSet::from([start.clone()]);
    let mut queue = VecDeque::from([start.clone()]);
    while let Some(current) = queue.pop_front() {
        for neighbour in graph.neighbours(&current) {
            if seen.insert(neighbour.clone()) {
                queue.push_back(neighbour);
            }
        }
    }
    seen
}

/// Maximum, minimum and mean node degree.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct DegreeSummary {
    /// Largest number of hyperedges containing a single node.
    pub max: usize,
    /// Smallest number of hyperedges containing a single node.
    pub min: usize,
    /// Mean degree over all nodes.
    pub mean: f64,
}

/// Degree summary over every node; all zeros for an empty hypergraph.
pub fn degree_summary(graph: &Hypergraph) -> DegreeSummary {
    let degrees: Vec<usize> = graph
        .nodes()
        .filter_map(|node| graph.degree(node).ok())
        .collect();
    if degrees.is_empty() {
        return DegreeSummary::default();
    }
    DegreeSummary {
        max: degrees.iter().copied().max().unwrap_or(0),
        min: degrees.iter().copied().min().unwrap_or(0),
        mean: degrees.iter().sum::<usize>() as f64 / degrees.len() as f64,
    }
}
