use std::collections::BTreeMap;

use itertools::Itertools;
use orc_core::errors::OrcError;
use orc_core::{HyperedgeId, NodeId, TransportSolver};
use serde::{Deserialize, Serialize};

use crate::distance::DistanceMatrix;
use crate::earthmover::{transport_distance, TransportParams};
use crate::hypergraph::Hypergraph;
use crate::walk::{node_probability, ProbabilityDistribution, WalkParams};

/// Curvature assigned to hyperedges with fewer than two members.
pub const TRIVIAL_CURVATURE: f64 = 1.0;

/// Random-walk and transport parameters used by curvature aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct CurvatureParams {
    /// Lazy random-walk parameters.
    #[serde(default)]
    pub walk: WalkParams,
    /// Transport validation parameters.
    #[serde(default)]
    pub transport: TransportParams,
}

/// Curvature of one hyperedge: `1 - mean_emd / weight` (or `1 - mean_emd`
/// when the current weight is zero), averaging over every unordered member
/// pair whose transport succeeded.
///
/// Pairs failing with a mass mismatch or solver failure are skipped with a
/// warning. `Ok(None)` means no pair succeeded and the curvature is undefined.
pub fn hyperedge_curvature<S>(
    graph: &Hypergraph,
    id: &HyperedgeId,
    matrix: &DistanceMatrix,
    solver: &S,
    params: &CurvatureParams,
) -> Result<Option<f64>, OrcError>
where
    S: TransportSolver + ?Sized,
{
    let record = graph.hyperedge(id)?;
    let members = record.members();
    if members.len() < 2 {
        return Ok(Some(TRIVIAL_CURVATURE));
    }

    let mut walks: BTreeMap<&NodeId, ProbabilityDistribution> = BTreeMap::new();
    for member in members {
        if !walks.contains_key(member) {
            walks.insert(member, node_probability(graph, member, &params.walk)?);
        }
    }

    let mut sum = 0.0;
    let mut count = 0usize;
    for (a, b) in members.iter().tuple_combinations() {
        match transport_distance(&walks[a], &walks[b], matrix, solver, &params.transport) {
            Ok(emd) => {
                sum += emd;
                count += 1;
            }
            Err(err) if err.skips_pair() => {
                tracing::warn!(hyperedge = %id, node_a = %a, node_b = %b, error = %err, "skipping member pair");
            }
            Err(err) => return Err(err),
        }
    }

    if count == 0 {
        tracing::warn!(hyperedge = %id, "no member pair produced a transport distance");
        return Ok(None);
    }
    let average = sum / count as f64;
    let weight = record.current_weight();
    let curvature = if weight == 0.0 {
        1.0 - average
    } else {
        1.0 - average / weight
    };
    tracing::debug!(hyperedge = %id, pairs = count, average, curvature, "hyperedge curvature");
    Ok(Some(curvature))
}
