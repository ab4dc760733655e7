use std::collections::BTreeMap;

use orc_core::errors::{ErrorInfo, OrcError};
use orc_core::NodeId;
use serde::{Deserialize, Serialize};

use crate::hypergraph::{unknown_node, Hypergraph};

/// Default probability of the walk staying at its anchor.
pub const DEFAULT_ALPHA: f64 = 0.1;

/// Parameters of the lazy one-step random walk.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WalkParams {
    /// Self-transition mass assigned to the anchor before renormalisation.
    #[serde(default = "default_alpha")]
    pub alpha: f64,
}

fn default_alpha() -> f64 {
    DEFAULT_ALPHA
}

impl Default for WalkParams {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
        }
    }
}

impl WalkParams {
    /// Rejects self-transition masses outside `[0, 1)`.
    pub fn validate(&self) -> Result<(), OrcError> {
        if !(0.0..1.0).contains(&self.alpha) {
            return Err(OrcError::Config(
                ErrorInfo::new("invalid-alpha", "self-transition mass must lie in [0, 1)")
                    .with_context("alpha", self.alpha),
            ));
        }
        Ok(())
    }
}

/// Probability mass over every node of the hypergraph, anchored at one node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityDistribution {
    anchor: NodeId,
    masses: BTreeMap<NodeId, f64>,
}

impl ProbabilityDistribution {
    /// Builds a distribution from explicit masses.
    pub fn from_masses(anchor: NodeId, masses: BTreeMap<NodeId, f64>) -> Self {
        Self { anchor, masses }
    }

    /// Node the walk starts from.
    pub fn anchor(&self) -> &NodeId {
        &self.anchor
    }

    /// Mass at `node`, zero for nodes outside the distribution.
    pub fn mass(&self, node: &NodeId) -> f64 {
        self.masses.get(node).copied().unwrap_or(0.0)
    }

    /// Sum of all masses.
    pub fn total(&self) -> f64 {
        self.masses.values().sum()
    }

    /// Every node with its mass, zero entries included, in node order.
    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, f64)> + '_ {
        self.masses.iter().map(|(node, mass)| (node, *mass))
    }

    /// Nodes carrying positive mass.
    pub fn support(&self) -> impl Iterator<Item = (&NodeId, f64)> + '_ {
        self.iter().filter(|(_, mass)| *mass > 0.0)
    }

    /// Number of nodes covered, zero entries included.
    pub fn len(&self) -> usize {
        self.masses.len()
    }

    /// Whether the distribution covers no nodes.
    pub fn is_empty(&self) -> bool {
        self.masses.is_empty()
    }
}

/// Lazy random-walk distribution anchored at `node`.
///
/// Neighbour `u` receives `(1 - alpha) * shared(v, u) / sum(|e| - 1)` where the
/// sum runs over hyperedges containing `v`; the anchor receives `alpha`; the
/// result is renormalised. A node with no co-members keeps all mass.
pub fn node_probability(
    graph: &Hypergraph,
    node: &NodeId,
    params: &WalkParams,
) -> Result<ProbabilityDistribution, OrcError> {
    if !graph.contains_node(node) {
        return Err(unknown_node(node));
    }
    let mut masses: BTreeMap<NodeId, f64> = graph.nodes().map(|id| (id.clone(), 0.0)).collect();

    let mut denominator = 0usize;
    for id in graph.incident_hyperedges(node)? {
        denominator += graph.members(&id)?.len().saturating_sub(1);
    }
    if denominator == 0 {
        masses.insert(node.clone(), 1.0);
        return Ok(ProbabilityDistribution::from_masses(node.clone(), masses));
    }

    for neighbour in graph.neighbours(node) {
        let numerator = graph.shared_hyperedges(node, &neighbour);
        let mass = (1.0 - params.alpha) * numerator as f64 / denominator as f64;
        masses.insert(neighbour, mass);
    }
    masses.insert(node.clone(), params.alpha);

    let total: f64 = masses.values().sum();
    if total > 0.0 {
        for mass in masses.values_mut() {
            *mass /= total;
        }
    } else {
        // repeated members with alpha = 0 leave nothing to normalise
        masses.insert(node.clone(), 1.0);
    }
    Ok(ProbabilityDistribution::from_masses(node.clone(), masses))
}
