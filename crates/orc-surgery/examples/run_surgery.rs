//! Runs the reweight-and-prune loop on a paper table, or on a synthetic
//! co-authorship hypergraph when no table is given.
//!
//! ```text
//! cargo run -p orc-surgery --example run_surgery -- [papers.csv] [config.yaml]
//! ```

use std::env;
use std::path::PathBuf;

use orc_core::{OrcError, RngHandle};
use orc_graph::{degree_summary, gen_coauthorship, is_weakly_connected};
use orc_surgery::{build_hypergraph, load_papers, run_to_directory, SurgeryConfig};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), OrcError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = env::args().skip(1).map(PathBuf::from);
    let table = args.next();
    let config = match args.next() {
        Some(path) => SurgeryConfig::load(&path)?,
        None => SurgeryConfig::default(),
    };

    let (mut graph, input_hash) = match table {
        Some(path) => {
            let papers = load_papers(&path)?;
            (build_hypergraph(&papers.records)?, Some(papers.input_hash))
        }
        None => (gen_coauthorship(60, 40, 4, &mut RngHandle::from_seed(7))?, None),
    };

    let degrees = degree_summary(&graph);
    tracing::info!(
        hyperedges = graph.hyperedge_count(),
        nodes = graph.node_count(),
        connected = is_weakly_connected(&graph),
        max_degree = degrees.max,
        min_degree = degrees.min,
        mean_degree = degrees.mean,
        "loaded hypergraph"
    );

    let manifest = run_to_directory(&config, &mut graph, input_hash)?;
    tracing::info!(
        rounds = manifest.rounds.len(),
        artifacts = manifest.artifacts.len(),
        final_hash = %manifest.provenance.final_graph_hash,
        "surgery finished"
    );
    Ok(())
}
