#![deny(missing_docs)]

//! Undirected co-authorship hypergraph with per-hyperedge weight and curvature
//! histories, all-pairs distances, lazy random walks and Ollivier-Ricci style
//! hyperedge curvature.

mod connectivity;
mod curvature;
mod distance;
mod earthmover;
mod generators;
mod hash;
mod hypergraph;
mod serialization;
mod stats;
mod walk;
mod weights;

pub use connectivity::{connected_components, degree_summary, is_weakly_connected, DegreeSummary};
pub use curvature::{hyperedge_curvature, CurvatureParams, TRIVIAL_CURVATURE};
pub use distance::{all_pairs_shortest_paths, bounded_hop_distance, DistanceMatrix, DEFAULT_HOP_LIMIT};
pub use earthmover::{earthmover_distance, transport_distance, TransportParams, DEFAULT_MASS_TOLERANCE};
pub use generators::gen_coauthorship;
pub use hash::canonical_hash;
pub use hypergraph::{EdgeInsert, HyperedgeRecord, Hypergraph, RemovedHyperedge, INITIAL_WEIGHT};
pub use stats::HypergraphStats;
pub use walk::{node_probability, ProbabilityDistribution, WalkParams, DEFAULT_ALPHA};
pub use weights::{apply_curvature, next_weight, squash, WeightUpdate, DEFAULT_LOGISTIC_CLIP};

/// Re-export serialization helpers for downstream crates.
pub use serialization::{graph_from_bytes, graph_from_json, graph_to_bytes, graph_to_json};
