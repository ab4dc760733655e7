use orc_core::errors::OrcError;
use orc_core::HyperedgeId;
use serde::{Deserialize, Serialize};

use crate::hypergraph::Hypergraph;

/// Default clip applied to the logistic input.
///
/// Beyond `x = 36` the logistic rounds to exactly `1.0` in `f64`, so wider
/// clips are capped to this value.
pub const DEFAULT_LOGISTIC_CLIP: f64 = 36.0;

/// Logistic squashing of `x` into the open interval `(0, 1)`.
pub fn squash(x: f64, clip: f64) -> f64 {
    let clip = clip.abs().min(DEFAULT_LOGISTIC_CLIP);
    let x = if x.is_nan() { 0.0 } else { x.clamp(-clip, clip) };
    1.0 / (1.0 + (-x).exp())
}

/// Next normalised weight: `squash(weight * (1 - curvature))`, or `0` when the
/// current weight is already zero.
pub fn next_weight(current: f64, curvature: f64, clip: f64) -> f64 {
    if current == 0.0 {
        return 0.0;
    }
    squash(current * (1.0 - curvature), clip)
}

/// Outcome of folding one curvature value into a hyperedge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightUpdate {
    /// Hyperedge that was updated.
    pub hyperedge: HyperedgeId,
    /// Curvature computed this iteration, `None` when undefined.
    pub curvature: Option<f64>,
    /// Weight after the update (unchanged when the curvature was undefined).
    pub weight: f64,
}

/// Appends the curvature and the resulting weight to the hyperedge histories.
///
/// An undefined curvature contributes nothing: both histories are left as they
/// were and the current weight is reported back.
pub fn apply_curvature(
    graph: &mut Hypergraph,
    id: &HyperedgeId,
    curvature: Option<f64>,
    clip: f64,
) -> Result<WeightUpdate, OrcError> {
    let current = graph.current_weight(id)?;
    let Some(value) = curvature else {
        return Ok(WeightUpdate {
            hyperedge: id.clone(),
            curvature: None,
            weight: current,
        });
    };
    let weight = next_weight(current, value, clip);
    graph.record_curvature(id, value)?;
    graph.record_weight(id, weight)?;
    Ok(WeightUpdate {
        hyperedge: id.clone(),
        curvature: Some(value),
        weight,
    })
}
