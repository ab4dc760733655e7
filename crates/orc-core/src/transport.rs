//! Capability contract for balanced transportation solvers.
//!
//! A [`TransportProblem`] describes `supply.len() x demand.len()` shipping
//! lanes. Lanes without a finite cost are forbidden; any backend able to solve
//! a balanced transportation program satisfies [`TransportSolver`].

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, OrcError};

/// Balanced transportation program: minimise `sum z(i,j) * cost(i,j)` subject
/// to row sums equal to `supply` and column sums equal to `demand`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportProblem {
    supply: Vec<f64>,
    demand: Vec<f64>,
    costs: Vec<Option<f64>>,
}

impl TransportProblem {
    /// Builds a problem from row-major lane costs (`None` marks a forbidden lane).
    pub fn new(
        supply: Vec<f64>,
        demand: Vec<f64>,
        costs: Vec<Option<f64>>,
    ) -> Result<Self, OrcError> {
        if costs.len() != supply.len() * demand.len() {
            return Err(OrcError::Solver(
                ErrorInfo::new("transport-shape", "cost table does not match supply x demand")
                    .with_context("supply", supply.len())
                    .with_context("demand", demand.len())
                    .with_context("costs", costs.len()),
            ));
        }
        if let Some(mass) = supply
            .iter()
            .chain(demand.iter())
            .find(|mass| !mass.is_finite() || **mass < 0.0)
        {
            return Err(OrcError::Solver(
                ErrorInfo::new("transport-mass", "masses must be finite and non-negative")
                    .with_context("mass", mass),
            ));
        }
        if let Some(cost) = costs.iter().flatten().find(|cost| !cost.is_finite()) {
            return Err(OrcError::Solver(
                ErrorInfo::new("transport-cost", "lane costs must be finite")
                    .with_hint("mark unreachable lanes with None")
                    .with_context("cost", cost),
            ));
        }
        Ok(Self {
            supply,
            demand,
            costs,
        })
    }

    /// Mass available at each origin.
    pub fn supply(&self) -> &[f64] {
        &self.supply
    }

    /// Mass required at each destination.
    pub fn demand(&self) -> &[f64] {
        &self.demand
    }

    /// Cost of shipping one unit from origin `i` to destination `j`.
    pub fn cost(&self, i: usize, j: usize) -> Option<f64> {
        self.costs
            .get(i * self.demand.len() + j)
            .copied()
            .flatten()
    }
}

/// Optimal shipping plan returned by a [`TransportSolver`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportPlan {
    /// Objective value of the plan.
    pub cost: f64,
    /// Non-zero shipments as `(origin, destination, amount)`.
    pub flows: Vec<(usize, usize, f64)>,
}

/// Backend capable of solving balanced transportation programs.
pub trait TransportSolver {
    /// Solves the program, failing with [`OrcError::Solver`] when no optimal plan exists.
    fn solve(&self, problem: &TransportProblem) -> Result<TransportPlan, OrcError>;
}

impl<T: TransportSolver + ?Sized> TransportSolver for &T {
    fn solve(&self, problem: &TransportProblem) -> Result<TransportPlan, OrcError> {
        (**self).solve(problem)
    }
}
