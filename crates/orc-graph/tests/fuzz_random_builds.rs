use orc_core::rng::RngHandle;
use orc_core::OrcError;
use orc_graph::{
    all_pairs_shortest_paths, canonical_hash, gen_coauthorship, graph_from_bytes, graph_from_json,
    graph_to_bytes, graph_to_json, Hypergraph,
};
use proptest::prelude::*;

fn check_invariants(graph: &Hypergraph) {
    for (id, record) in graph.hyperedges() {
        assert!(!record.weights().is_empty(), "{id} has no weight");
        for member in record.members() {
            assert!(graph.contains_node(member));
        }
    }
    for node in graph.nodes() {
        assert!(graph.degree(node).unwrap() > 0 || graph.hyperedge_count() == 0);
    }
}

fn check_distances(graph: &Hypergraph) {
    let matrix = all_pairs_shortest_paths(graph);
    assert!(matrix.is_symmetric(1e-12));
    for node in graph.nodes() {
        assert_eq!(matrix.distance(node, node), Some(0.0));
        assert!(!graph.neighbours(node).contains(node), "{node} neighbours itself");
    }
}

#[test]
fn generator_rejects_empty_author_pool() {
    let mut rng = RngHandle::from_seed(1);
    let err = gen_coauthorship(4, 0, 3, &mut rng).unwrap_err();
    assert!(matches!(err, OrcError::Config(_)));
}

#[test]
fn generator_is_deterministic_per_seed() {
    let first = gen_coauthorship(20, 12, 4, &mut RngHandle::from_seed(7)).unwrap();
    let second = gen_coauthorship(20, 12, 4, &mut RngHandle::from_seed(7)).unwrap();
    assert_eq!(canonical_hash(&first), canonical_hash(&second));
    assert_eq!(first.hyperedge_count(), 20);
}

#[test]
fn snapshots_preserve_histories_and_isolated_nodes() {
    let mut graph = gen_coauthorship(6, 5, 3, &mut RngHandle::from_seed(11)).unwrap();
    graph.add_node("isolated");
    graph.record_curvature(&"p0".into(), -0.25).unwrap();
    graph.record_weight(&"p0".into(), 0.6).unwrap();

    let json = graph_to_json(&graph).unwrap();
    let restored = graph_from_json(&json).unwrap();
    assert_eq!(canonical_hash(&graph), canonical_hash(&restored));
    assert!(restored.contains_node(&"isolated".into()));
    let record = restored.hyperedge(&"p0".into()).unwrap();
    assert_eq!(record.weights(), &[1.0, 0.6]);
    assert_eq!(record.curvatures(), &[-0.25]);
    assert_eq!(restored.hyperedge_ids(), graph.hyperedge_ids());
}

#[test]
fn corrupt_snapshots_are_serde_errors() {
    let err = graph_from_json("{\"nodes\": 3}").unwrap_err();
    assert_eq!(err.code(), "deserialize-json");
    let err = graph_from_bytes(&[1, 2, 3]).unwrap_err();
    assert!(matches!(err, OrcError::Serde(_)));
}

proptest! {
    #[test]
    fn random_builds_respect_invariants(
        seed in any::<u64>(),
        papers in 0usize..15,
        authors in 1usize..10,
        team in 1usize..5,
        weights in proptest::collection::vec(0.0f64..1.0, 15),
    ) {
        let mut rng = RngHandle::from_seed(seed);
        let mut graph = gen_coauthorship(papers, authors, team, &mut rng).unwrap();
        check_invariants(&graph);

        let bytes = graph_to_bytes(&graph).unwrap();
        let restored = graph_from_bytes(&bytes).unwrap();
        prop_assert_eq!(canonical_hash(&graph), canonical_hash(&restored));

        check_distances(&graph);
        for (id, weight) in graph.hyperedge_ids().into_iter().zip(weights) {
            graph.record_weight(&id, weight).unwrap();
        }
        check_distances(&graph);

        for id in graph.hyperedge_ids().into_iter().step_by(2) {
            let removed = graph.remove_hyperedge(&id).unwrap();
            for orphan in &removed.orphaned {
                prop_assert!(!graph.contains_node(orphan));
            }
            check_invariants(&graph);
        }
    }
}
