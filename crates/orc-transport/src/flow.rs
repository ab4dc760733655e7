use orc_core::errors::{ErrorInfo, OrcError};
use orc_core::{TransportPlan, TransportProblem, TransportSolver};
use serde::{Deserialize, Serialize};

/// Numerical knobs for [`SuccessiveShortestPath`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverOptions {
    /// Amounts at or below this threshold are treated as zero.
    #[serde(default = "default_flow_tolerance")]
    pub flow_tolerance: f64,
    /// Largest unshipped mass accepted once no augmenting path remains.
    #[serde(default = "default_feasibility_tolerance")]
    pub feasibility_tolerance: f64,
    /// Hard cap on augmentations; `None` derives one from the problem size.
    #[serde(default)]
    pub max_augmentations: Option<usize>,
}

fn default_flow_tolerance() -> f64 {
    1e-12
}

fn default_feasibility_tolerance() -> f64 {
    1e-6
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            flow_tolerance: default_flow_tolerance(),
            feasibility_tolerance: default_feasibility_tolerance(),
            max_augmentations: None,
        }
    }
}

/// Successive-shortest-path min-cost flow specialised to the bipartite
/// transportation network.
///
/// Every augmentation routes mass along a cheapest residual path from an
/// origin with unshipped supply to a destination with unmet demand. Residual
/// paths may traverse existing shipments backwards, which is what lets the
/// solver undo earlier greedy choices. Shortest paths are found with
/// Bellman-Ford because backward lanes carry negative cost.
#[derive(Debug, Clone, Default)]
pub struct SuccessiveShortestPath {
    options: SolverOptions,
}

impl SuccessiveShortestPath {
    /// Creates a solver with the provided options.
    pub fn new(options: SolverOptions) -> Self {
        Self { options }
    }

    /// Returns the options used by this solver.
    pub fn options(&self) -> &SolverOptions {
        &self.options
    }

    fn augmentation_limit(&self, origins: usize, destinations: usize) -> usize {
        self.options
            .max_augmentations
            .unwrap_or_else(|| 4 * (origins + destinations + 1).pow(2))
    }
}

impl TransportSolver for SuccessiveShortestPath {
    fn solve(&self, problem: &TransportProblem) -> Result<TransportPlan, OrcError> {
        let mut network = Residual::new(problem, self.options.flow_tolerance);
        let limit = self.augmentation_limit(network.origins, network.destinations);
        let mut augmentations = 0usize;

        while network.has_open_supply() && network.has_open_demand() {
            if augmentations >= limit {
                return Err(solver_error(
                    "transport-iteration-limit",
                    "augmentation budget exhausted before the plan was complete",
                )
                .with_context("augmentations", augmentations));
            }
            let Some(path) = network.cheapest_path()? else {
                break;
            };
            network.augment(&path);
            augmentations += 1;
        }

        let unshipped = network.open_supply().max(network.open_demand());
        if unshipped > self.options.feasibility_tolerance {
            return Err(OrcError::Solver(
                ErrorInfo::new(
                    "transport-infeasible",
                    "remaining mass cannot reach any destination",
                )
                .with_context("unshipped", unshipped)
                .with_hint("lanes between unreachable nodes are forbidden"),
            ));
        }

        let plan = network.into_plan();
        tracing::trace!(augmentations, cost = plan.cost, "transport plan solved");
        Ok(plan)
    }
}

struct Residual<'a> {
    problem: &'a TransportProblem,
    origins: usize,
    destinations: usize,
    supply: Vec<f64>,
    demand: Vec<f64>,
    flow: Vec<f64>,
    tolerance: f64,
}

impl<'a> Residual<'a> {
    fn new(problem: &'a TransportProblem, tolerance: f64) -> Self {
        let origins = problem.supply().len();
        let destinations = problem.demand().len();
        Self {
            problem,
            origins,
            destinations,
            supply: problem.supply().to_vec(),
            demand: problem.demand().to_vec(),
            flow: vec![0.0; origins * destinations],
            tolerance,
        }
    }

    fn lane(&self, origin: usize, destination: usize) -> usize {
        origin * self.destinations + destination
    }

    fn has_open_supply(&self) -> bool {
        self.supply.iter().any(|&mass| mass > self.tolerance)
    }

    fn has_open_demand(&self) -> bool {
        self.demand.iter().any(|&mass| mass > self.tolerance)
    }

    fn open_supply(&self) -> f64 {
        self.supply.iter().filter(|&&mass| mass > 0.0).sum()
    }

    fn open_demand(&self) -> f64 {
        self.demand.iter().filter(|&&mass| mass > 0.0).sum()
    }

    /// Node indices: origins occupy `0..origins`, destinations follow.
    fn cheapest_path(&self) -> Result<Option<Vec<usize>>, OrcError> {
        let total = self.origins + self.destinations;
        let mut dist = vec![f64::INFINITY; total];
        let mut pred: Vec<Option<usize>> = vec![None; total];
        for (origin, &mass) in self.supply.iter().enumerate() {
            if mass > self.tolerance {
                dist[origin] = 0.0;
            }
        }

        for _ in 0..total {
            let mut changed = false;
            for origin in 0..self.origins {
                if !dist[origin].is_finite() {
                    continue;
                }
                for destination in 0..self.destinations {
                    let Some(cost) = self.problem.cost(origin, destination) else {
                        continue;
                    };
                    let node = self.origins + destination;
                    if improves(dist[origin] + cost, dist[node]) {
                        dist[node] = dist[origin] + cost;
                        pred[node] = Some(origin);
                        changed = true;
                    }
                }
            }
            for destination in 0..self.destinations {
                let node = self.origins + destination;
                if !dist[node].is_finite() {
                    continue;
                }
                for origin in 0..self.origins {
                    if self.flow[self.lane(origin, destination)] <= self.tolerance {
                        continue;
                    }
                    let cost = self.problem.cost(origin, destination).unwrap_or(0.0);
                    if improves(dist[node] - cost, dist[origin]) {
                        dist[origin] = dist[node] - cost;
                        pred[origin] = Some(node);
                        changed = true;
                    }
                }
            }
            if !changed {
                break;
            }
        }

        let target = (0..self.destinations)
            .filter(|&destination| self.demand[destination] > self.tolerance)
            .map(|destination| self.origins + destination)
            .filter(|&node| dist[node].is_finite())
            .min_by(|a, b| dist[*a].total_cmp(&dist[*b]));
        let Some(target) = target else {
            return Ok(None);
        };

        let mut path = vec![target];
        let mut cursor = target;
        while let Some(previous) = pred[cursor] {
            path.push(previous);
            cursor = previous;
            if path.len() > total + 1 {
                return Err(solver_error(
                    "transport-numerical",
                    "residual predecessor chain does not terminate",
                ));
            }
        }
        if cursor >= self.origins || self.supply[cursor] <= self.tolerance {
            return Err(solver_error(
                "transport-numerical",
                "augmenting path does not start at an open origin",
            )
            .with_context("start", cursor));
        }
        path.reverse();
        Ok(Some(path))
    }

    fn augment(&mut self, path: &[usize]) {
        let start = path[0];
        let end = path[path.len() - 1] - self.origins;
        let mut delta = self.supply[start].min(self.demand[end]);
        for step in path.windows(2) {
            if step[0] >= self.origins {
                let lane = self.lane(step[1], step[0] - self.origins);
                delta = delta.min(self.flow[lane]);
            }
        }
        for step in path.windows(2) {
            if step[0] < self.origins {
                let lane = self.lane(step[0], step[1] - self.origins);
                self.flow[lane] += delta;
            } else {
                let lane = self.lane(step[1], step[0] - self.origins);
                self.flow[lane] = (self.flow[lane] - delta).max(0.0);
            }
        }
        self.supply[start] -= delta;
        self.demand[end] -= delta;
    }

    fn into_plan(self) -> TransportPlan {
        let mut cost = 0.0;
        let mut flows = Vec::new();
        for origin in 0..self.origins {
            for destination in 0..self.destinations {
                let amount = self.flow[self.lane(origin, destination)];
                if amount <= self.tolerance {
                    continue;
                }
                cost += amount * self.problem.cost(origin, destination).unwrap_or(0.0);
                flows.push((origin, destination, amount));
            }
        }
        TransportPlan { cost, flows }
    }
}

fn improves(candidate: f64, current: f64) -> bool {
    if !current.is_finite() {
        return candidate.is_finite();
    }
    candidate < current - 1e-12 * (1.0 + current.abs())
}

fn solver_error(code: &str, message: &str) -> OrcError {
    OrcError::Solver(ErrorInfo::new(code, message))
}
