use std::collections::BTreeSet;

use orc_core::{HyperedgeId, NodeId};
use serde::{Deserialize, Serialize};

use crate::connectivity::{connected_components, degree_summary, is_weakly_connected, DegreeSummary};
use crate::hypergraph::Hypergraph;

/// Structural snapshot written after every pruning round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HypergraphStats {
    /// Number of remaining hyperedges.
    pub hyperedge_count: usize,
    /// Number of remaining nodes.
    pub node_count: usize,
    /// Whether the remaining hypergraph is weakly connected.
    pub weakly_connected: bool,
    /// Connected components as node sets.
    pub components: Vec<BTreeSet<NodeId>>,
    /// Degree summary of the remaining nodes.
    pub degrees: DegreeSummary,
    /// Remaining hyperedges with their members, in insertion order.
    pub hyperedges: Vec<(HyperedgeId, Vec<NodeId>)>,
}

impl HypergraphStats {
    /// Collects statistics from the current state of `graph`.
    pub fn collect(graph: &Hypergraph) -> Self {
        Self {
            hyperedge_count: graph.hyperedge_count(),
            node_count: graph.node_count(),
            weakly_connected: is_weakly_connected(graph),
            components: connected_components(graph),
            degrees: degree_summary(graph),
            hyperedges: graph
                .hyperedges()
                .map(|(id, record)| (id.clone(), record.members().to_vec()))
                .collect(),
        }
    }

    /// Plain-text report: counts, connectivity sentence, components and the
    /// full hyperedge listing.
    pub fn render(&self) -> String {
        let connectivity = if self.weakly_connected {
            "The hypergraph is weakly connected."
        } else {
            "The hypergraph is not weakly connected."
        };
        let components: Vec<String> = self
            .components
            .iter()
            .map(|component| format!("{{{}}}", join(component.iter())))
            .collect();
        let mut listing = String::new();
        for (id, members) in &self.hyperedges {
            listing.push_str(&format!(
                "Hyperedge ID: {id}, Hyperedge: [{}]\n",
                join(members.iter())
            ));
        }
        format!(
            "Number of hyperedges: {hyperedges}\n\
             Number of nodes: {nodes}\n\
             {connectivity}\n\
             Connected Components: [{components}]\n\
             No. of modules: {modules}\n\
             Degrees: max {max}, min {min}, mean {mean:.2}\n\
             \n\
             List of all hyperedges:\n\
             {listing}",
            hyperedges = self.hyperedge_count,
            nodes = self.node_count,
            components = components.join(", "),
            modules = self.components.len(),
            max = self.degrees.max,
            min = self.degrees.min,
            mean = self.degrees.mean,
        )
    }
}

fn join<'a>(nodes: impl Iterator<Item = &'a NodeId>) -> String {
    nodes.map(NodeId::as_str).collect::<Vec<_>>().join(", ")
}
