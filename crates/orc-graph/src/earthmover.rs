use orc_core::errors::{ErrorInfo, OrcError};
use orc_core::{NodeId, TransportProblem, TransportSolver};
use serde::{Deserialize, Serialize};

use crate::distance::DistanceMatrix;
use crate::hypergraph::{unknown_node, Hypergraph};
use crate::walk::{node_probability, ProbabilityDistribution, WalkParams};

/// Default tolerance on the difference of total masses.
pub const DEFAULT_MASS_TOLERANCE: f64 = 1e-6;

/// Validation parameters for transport calls.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransportParams {
    /// Largest accepted difference between the two total masses.
    #[serde(default = "default_mass_tolerance")]
    pub mass_tolerance: f64,
}

fn default_mass_tolerance() -> f64 {
    DEFAULT_MASS_TOLERANCE
}

impl Default for TransportParams {
    fn default() -> Self {
        Self {
            mass_tolerance: DEFAULT_MASS_TOLERANCE,
        }
    }
}

/// Wasserstein-1 distance between two distributions under `matrix`.
///
/// Only positive-mass nodes enter the program. Lanes between mutually
/// unreachable nodes are forbidden, so a plan that would need one surfaces as
/// a solver failure.
pub fn transport_distance<S>(
    mu_a: &ProbabilityDistribution,
    mu_b: &ProbabilityDistribution,
    matrix: &DistanceMatrix,
    solver: &S,
    params: &TransportParams,
) -> Result<f64, OrcError>
where
    S: TransportSolver + ?Sized,
{
    let (total_a, total_b) = (mu_a.total(), mu_b.total());
    if (total_a - total_b).abs() > params.mass_tolerance {
        return Err(OrcError::MassMismatch(
            ErrorInfo::new(
                "mass-mismatch",
                "distributions being transported carry different total mass",
            )
            .with_context("anchor_a", mu_a.anchor())
            .with_context("anchor_b", mu_b.anchor())
            .with_context("mass_a", total_a)
            .with_context("mass_b", total_b),
        ));
    }

    let (rows, supply) = indexed_support(mu_a, matrix)?;
    let (cols, demand) = indexed_support(mu_b, matrix)?;
    let mut costs = Vec::with_capacity(rows.len() * cols.len());
    for &i in &rows {
        for &j in &cols {
            costs.push(matrix.distance_at(i, j));
        }
    }
    let problem = TransportProblem::new(supply, demand, costs)?;
    let plan = solver.solve(&problem).map_err(|err| {
        err.with_context("anchor_a", mu_a.anchor())
            .with_context("anchor_b", mu_b.anchor())
    })?;
    Ok(plan.cost)
}

/// Earth-mover distance between the random-walk distributions of two nodes.
pub fn earthmover_distance<S>(
    graph: &Hypergraph,
    node_a: &NodeId,
    node_b: &NodeId,
    matrix: &DistanceMatrix,
    solver: &S,
    walk: &WalkParams,
    params: &TransportParams,
) -> Result<f64, OrcError>
where
    S: TransportSolver + ?Sized,
{
    for node in [node_a, node_b] {
        if !graph.contains_node(node) {
            return Err(unknown_node(node));
        }
    }
    let mu_a = node_probability(graph, node_a, walk)?;
    let mu_b = node_probability(graph, node_b, walk)?;
    transport_distance(&mu_a, &mu_b, matrix, solver, params)
}

fn indexed_support(
    distribution: &ProbabilityDistribution,
    matrix: &DistanceMatrix,
) -> Result<(Vec<usize>, Vec<f64>), OrcError> {
    let mut indices = Vec::new();
    let mut masses = Vec::new();
    for (node, mass) in distribution.support() {
        let index = matrix.index_of(node).ok_or_else(|| {
            OrcError::Structural(
                ErrorInfo::new("node-not-indexed", "node is missing from the distance matrix")
                    .with_context("node", node)
                    .with_hint("recompute distances after structural changes"),
            )
        })?;
        indices.push(index);
        masses.push(mass);
    }
    Ok((indices, masses))
}
