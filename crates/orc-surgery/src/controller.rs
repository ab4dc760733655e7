use std::collections::BTreeSet;
use std::path::PathBuf;

use orc_core::errors::OrcError;
use orc_core::{HyperedgeId, NodeId, TransportSolver};
use orc_graph::{
    all_pairs_shortest_paths, apply_curvature, canonical_hash, hyperedge_curvature, Hypergraph,
    HypergraphStats,
};
use orc_transport::SuccessiveShortestPath;
use serde::{Deserialize, Serialize};

use crate::artifacts::{ArtifactSink, WeightRow};
use crate::config::SurgeryConfig;

/// Position of a [`SurgeryController`] in its fixed iteration budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurgeryState {
    /// Nothing has run yet; the next step is the baseline pass.
    Init,
    /// The next step runs iteration `k` (1-based).
    Iterating(usize),
    /// The budget is exhausted.
    Done,
}

/// Curvature bookkeeping for one pass over all hyperedges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IterationSummary {
    /// Iteration index; `0` is the baseline pass.
    pub iteration: usize,
    /// Hyperedges whose curvature was defined and folded into the weight.
    pub updated: usize,
    /// Hyperedges left untouched because no member pair succeeded.
    pub undefined: usize,
}

/// Hyperedges removed by one pruning round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PruneRound {
    /// Iteration the round ran after.
    pub iteration: usize,
    /// 1-based round counter (`iteration / prune_every`).
    pub round: usize,
    /// Number of removals requested from the weight table.
    pub requested: usize,
    /// Hyperedges actually removed, heaviest first.
    pub removed: Vec<HyperedgeId>,
    /// Nodes dropped because their last hyperedge was removed.
    pub orphaned: Vec<NodeId>,
}

/// Everything a completed run reports back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SurgeryReport {
    /// Canonical hash of the hypergraph before the baseline pass.
    pub initial_hash: String,
    /// Canonical hash of the hypergraph after the last iteration.
    pub final_hash: String,
    /// One entry per pass, baseline included.
    pub iterations: Vec<IterationSummary>,
    /// One entry per pruning round.
    pub rounds: Vec<PruneRound>,
    /// Files written by the sink, in write order.
    pub artifacts: Vec<PathBuf>,
}

/// Drives the reweight-and-prune loop over an explicitly passed hypergraph.
///
/// Iteration `0` is a baseline pass that reweights without pruning. Each
/// iteration `k` in `1..=K` recomputes all-pairs distances from the current
/// weights, folds every hyperedge's curvature into its weight, and on
/// pruning iterations removes the heaviest `floor(fraction * |E|)` hyperedges
/// as read back from the weight table before reporting statistics.
#[derive(Debug)]
pub struct SurgeryController<S, K> {
    config: SurgeryConfig,
    solver: S,
    sink: K,
    state: SurgeryState,
    report: SurgeryReport,
}

impl<K: ArtifactSink> SurgeryController<SuccessiveShortestPath, K> {
    /// Creates a controller backed by the default transport solver.
    pub fn with_default_solver(config: SurgeryConfig, sink: K) -> Result<Self, OrcError> {
        let solver = SuccessiveShortestPath::new(config.solver);
        Self::new(config, solver, sink)
    }
}

impl<S, K> SurgeryController<S, K>
where
    S: TransportSolver,
    K: ArtifactSink,
{
    /// Validates the configuration and creates a controller in [`SurgeryState::Init`].
    pub fn new(config: SurgeryConfig, solver: S, sink: K) -> Result<Self, OrcError> {
        config.validate()?;
        Ok(Self {
            config,
            solver,
            sink,
            state: SurgeryState::Init,
            report: SurgeryReport::default(),
        })
    }

    /// Current state.
    pub fn state(&self) -> SurgeryState {
        self.state
    }

    /// Configuration in use.
    pub fn config(&self) -> &SurgeryConfig {
        &self.config
    }

    /// Sink receiving artefacts.
    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// Consumes the controller and returns its sink.
    pub fn into_sink(self) -> K {
        self.sink
    }

    /// Report accumulated so far.
    pub fn report(&self) -> &SurgeryReport {
        &self.report
    }

    /// Runs the remaining budget and returns the full report.
    pub fn run(&mut self, graph: &mut Hypergraph) -> Result<SurgeryReport, OrcError> {
        while self.step(graph)? != SurgeryState::Done {}
        Ok(self.report.clone())
    }

    /// Performs one transition and returns the new state.
    pub fn step(&mut self, graph: &mut Hypergraph) -> Result<SurgeryState, OrcError> {
        let iteration = match self.state {
            SurgeryState::Init => {
                self.report.initial_hash = canonical_hash(graph);
                0
            }
            SurgeryState::Iterating(k) => k,
            SurgeryState::Done => return Ok(SurgeryState::Done),
        };

        let summary = self.reweight(graph, iteration)?;
        self.report.iterations.push(summary);
        if self.config.prunes_at(iteration) {
            let round = self.prune(graph, iteration)?;
            self.report.rounds.push(round);
        }
        self.report.final_hash = canonical_hash(graph);

        self.state = if iteration < self.config.iterations {
            SurgeryState::Iterating(iteration + 1)
        } else {
            SurgeryState::Done
        };
        Ok(self.state)
    }

    fn reweight(&mut self, graph: &mut Hypergraph, iteration: usize) -> Result<IterationSummary, OrcError> {
        let matrix = all_pairs_shortest_paths(graph);
        if self.config.output.write_distance_matrices {
            let written = self
                .sink
                .write_distance_matrix(iteration, &matrix.to_sentinel_rows())?;
            self.report.artifacts.extend(written);
        }

        let params = self.config.curvature_params();
        let mut rows = Vec::with_capacity(graph.hyperedge_count());
        let mut summary = IterationSummary {
            iteration,
            updated: 0,
            undefined: 0,
        };
        for id in graph.hyperedge_ids() {
            let curvature = hyperedge_curvature(graph, &id, &matrix, &self.solver, &params)?;
            if curvature.is_some() {
                summary.updated += 1;
            } else {
                summary.undefined += 1;
            }
            let update = apply_curvature(graph, &id, curvature, self.config.logistic_clip)?;
            rows.push(WeightRow::from(update));
        }
        let written = self.sink.append_weight_rows(iteration, &rows)?;
        self.report.artifacts.extend(written);

        tracing::info!(
            iteration,
            hyperedges = graph.hyperedge_count(),
            nodes = graph.node_count(),
            undefined = summary.undefined,
            "reweighted hyperedges"
        );
        Ok(summary)
    }

    fn prune(&mut self, graph: &mut Hypergraph, iteration: usize) -> Result<PruneRound, OrcError> {
        let requested = (self.config.prune_fraction * graph.hyperedge_count() as f64).floor() as usize;
        let rows = latest_rows(self.sink.read_weight_rows(iteration)?, graph);

        let mut removed = Vec::new();
        let mut orphaned = Vec::new();
        for row in rows.into_iter().take(requested) {
            if let Some(outcome) = graph.remove_hyperedge(&row.hyperedge) {
                removed.push(outcome.id);
                orphaned.extend(outcome.orphaned);
            }
        }

        let round = iteration / self.config.prune_every;
        let written = self
            .sink
            .write_stats(iteration, round, &HypergraphStats::collect(graph))?;
        self.report.artifacts.extend(written);

        tracing::info!(
            iteration,
            round,
            requested,
            removed = removed.len(),
            orphaned = orphaned.len(),
            "pruned heaviest hyperedges"
        );
        Ok(PruneRound {
            iteration,
            round,
            requested,
            removed,
            orphaned,
        })
    }
}

/// Last-written row per hyperedge still in `graph`, heaviest first.
///
/// Weight tables are append-only, so rows left by an earlier run into the same
/// directory precede the current ones and are superseded by them. Ties keep
/// table order.
fn latest_rows(rows: Vec<WeightRow>, graph: &Hypergraph) -> Vec<WeightRow> {
    let mut seen = BTreeSet::new();
    let mut latest: Vec<WeightRow> = rows
        .into_iter()
        .rev()
        .filter(|row| graph.contains_hyperedge(&row.hyperedge) && seen.insert(row.hyperedge.clone()))
        .collect();
    latest.reverse();
    latest.sort_by(|a, b| b.weight.total_cmp(&a.weight));
    latest
}
