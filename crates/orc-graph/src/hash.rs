use sha2::{Digest, Sha256};

use crate::hypergraph::Hypergraph;

/// Canonical structural hash of the hypergraph.
///
/// Covers the sorted node set and every hyperedge's id with its sorted members.
/// Weight and curvature histories are excluded, so two runs pruning the same
/// hyperedges hash identically.
pub fn canonical_hash(graph: &Hypergraph) -> String {
    let mut hasher = Sha256::new();
    hasher.update((graph.node_count() as u64).to_le_bytes());
    for node in graph.nodes() {
        update_str(node.as_str(), &mut hasher);
    }

    let mut edges: Vec<(&str, Vec<&str>)> = graph
        .hyperedges()
        .map(|(id, record)| {
            let mut members: Vec<&str> = record.members().iter().map(|m| m.as_str()).collect();
            members.sort_unstable();
            (id.as_str(), members)
        })
        .collect();
    edges.sort();
    hasher.update((edges.len() as u64).to_le_bytes());
    for (id, members) in edges {
        update_str(id, &mut hasher);
        hasher.update((members.len() as u64).to_le_bytes());
        for member in members {
            update_str(member, &mut hasher);
        }
    }

    hex::encode(hasher.finalize())
}

fn update_str(value: &str, hasher: &mut Sha256) {
    hasher.update((value.len() as u64).to_le_bytes());
    hasher.update(value.as_bytes());
}
