use orc_core::errors::{ErrorInfo, OrcError};
use orc_core::provenance::SchemaVersion;
use orc_core::{HyperedgeId, NodeId};
use serde::{Deserialize, Serialize};

use crate::hypergraph::{EdgeInsert, HyperedgeRecord, Hypergraph};

/// Serializes the graph, histories included, to a compact `bincode` payload.
pub fn graph_to_bytes(graph: &Hypergraph) -> Result<Vec<u8>, OrcError> {
    let snapshot = Snapshot::from_graph(graph);
    bincode::serialize(&snapshot)
        .map_err(|err| OrcError::Serde(ErrorInfo::new("serialize-bytes", err.to_string())))
}

/// Restores a graph from its binary representation.
pub fn graph_from_bytes(bytes: &[u8]) -> Result<Hypergraph, OrcError> {
    let snapshot: Snapshot = bincode::deserialize(bytes)
        .map_err(|err| OrcError::Serde(ErrorInfo::new("deserialize-bytes", err.to_string())))?;
    snapshot.into_graph()
}

/// Serializes the graph to a pretty-printed JSON string.
pub fn graph_to_json(graph: &Hypergraph) -> Result<String, OrcError> {
    let snapshot = Snapshot::from_graph(graph);
    serde_json::to_string_pretty(&snapshot)
        .map_err(|err| OrcError::Serde(ErrorInfo::new("serialize-json", err.to_string())))
}

/// Restores a graph from a JSON string.
pub fn graph_from_json(json: &str) -> Result<Hypergraph, OrcError> {
    let snapshot: Snapshot = serde_json::from_str(json)
        .map_err(|err| OrcError::Serde(ErrorInfo::new("deserialize-json", err.to_string())))?;
    snapshot.into_graph()
}

#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    schema_version: SchemaVersion,
    nodes: Vec<NodeId>,
    hyperedges: Vec<SnapshotEdge>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotEdge {
    id: HyperedgeId,
    members: Vec<NodeId>,
    weights: Vec<f64>,
    curvatures: Vec<f64>,
}

impl Snapshot {
    fn from_graph(graph: &Hypergraph) -> Self {
        Self {
            schema_version: SchemaVersion::default(),
            nodes: graph.nodes().cloned().collect(),
            hyperedges: graph
                .hyperedges()
                .map(|(id, record)| SnapshotEdge {
                    id: id.clone(),
                    members: record.members().to_vec(),
                    weights: record.weights().to_vec(),
                    curvatures: record.curvatures().to_vec(),
                })
                .collect(),
        }
    }

    fn into_graph(self) -> Result<Hypergraph, OrcError> {
        let supported = SchemaVersion::default();
        if self.schema_version.major != supported.major {
            return Err(OrcError::Serde(
                ErrorInfo::new("schema-version", "snapshot schema is not supported")
                    .with_context("found", format!("{:?}", self.schema_version))
                    .with_context("supported", format!("{supported:?}")),
            ));
        }
        let mut graph = Hypergraph::new();
        for node in self.nodes {
            graph.add_node(node);
        }
        for edge in self.hyperedges {
            let record = HyperedgeRecord::restore(edge.members, edge.weights, edge.curvatures);
            if graph.insert_restored(edge.id.clone(), record) == EdgeInsert::Conflict {
                return Err(OrcError::Serde(
                    ErrorInfo::new("duplicate-hyperedge", "snapshot lists a hyperedge twice")
                        .with_context("hyperedge", edge.id),
                ));
            }
        }
        Ok(graph)
    }
}
