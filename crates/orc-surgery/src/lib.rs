#![deny(missing_docs)]

//! Iterative Ollivier-Ricci reweighting and pruning of co-authorship
//! hypergraphs: configuration, tabular ingestion, artefact sinks, the surgery
//! state machine and run manifests.

mod artifacts;
mod config;
mod controller;
mod ingest;
mod manifest;

pub use artifacts::{ArtifactSink, CsvArtifactSink, MemorySink, WeightRow};
pub use config::{OutputConfig, SurgeryConfig};
pub use controller::{IterationSummary, PruneRound, SurgeryController, SurgeryReport, SurgeryState};
pub use ingest::{build_hypergraph, load_papers, parse_author_ids, read_papers, PaperRecord, PaperTable};
pub use manifest::{write_snapshot, RunManifest};

use orc_core::OrcError;
use orc_graph::Hypergraph;

/// Runs a full surgery on `graph`, writing every artefact under
/// `config.output.directory`, and returns the manifest.
///
/// The manifest and final snapshot are written when enabled in the output
/// configuration.
pub fn run_to_directory(
    config: &SurgeryConfig,
    graph: &mut Hypergraph,
    input_hash: Option<String>,
) -> Result<RunManifest, OrcError> {
    let sink = CsvArtifactSink::new(config.output.clone());
    let mut controller = SurgeryController::with_default_solver(config.clone(), sink)?;
    let mut report = controller.run(graph)?;

    if config.output.write_snapshot {
        let path = config.output.snapshot_path();
        write_snapshot(graph, &path)?;
        report.artifacts.push(path);
    }
    let manifest = RunManifest::from_report(config, &report, input_hash);
    if config.output.write_manifest {
        manifest.write(&config.output.manifest_path())?;
    }
    Ok(manifest)
}
