use orc_core::errors::{ErrorInfo, OrcError};
use orc_core::rng::RngHandle;
use orc_core::{HyperedgeId, NodeId};
use rand::seq::index;
use rand::Rng;

use crate::hypergraph::Hypergraph;

/// Generates a synthetic co-authorship hypergraph.
///
/// Each of the `papers` hyperedges (`p0`, `p1`, ...) draws a team size
/// uniformly from `1..=max_team` and samples that many distinct authors
/// (`a0`, `a1`, ...) without replacement. Authors that never get sampled do
/// not appear in the result.
pub fn gen_coauthorship(
    papers: usize,
    authors: usize,
    max_team: usize,
    rng: &mut RngHandle,
) -> Result<Hypergraph, OrcError> {
    if authors == 0 || max_team == 0 {
        return Err(OrcError::Config(
            ErrorInfo::new(
                "invalid-generator",
                "co-authorship generator needs at least one author per team",
            )
            .with_context("authors", authors)
            .with_context("max_team", max_team),
        ));
    }
    let max_team = max_team.min(authors);
    let pool: Vec<NodeId> = (0..authors).map(|idx| NodeId::new(format!("a{idx}"))).collect();

    let mut graph = Hypergraph::new();
    for paper in 0..papers {
        let team = rng.gen_range(1..=max_team);
        let mut picked: Vec<usize> = index::sample(rng, authors, team).into_vec();
        picked.sort_unstable();
        let members = picked.into_iter().map(|idx| pool[idx].clone()).collect();
        graph.add_hyperedge(HyperedgeId::new(format!("p{paper}")), members);
    }
    tracing::debug!(
        papers,
        nodes = graph.node_count(),
        "generated co-authorship hypergraph"
    );
    Ok(graph)
}
