use std::collections::BTreeMap;

use orc_core::{NodeId, OrcError};
use orc_graph::{
    all_pairs_shortest_paths, apply_curvature, earthmover_distance, hyperedge_curvature,
    node_probability, squash, transport_distance, CurvatureParams, Hypergraph,
    ProbabilityDistribution, TransportParams, WalkParams, DEFAULT_LOGISTIC_CLIP,
};
use orc_transport::SuccessiveShortestPath;
use proptest::prelude::*;

fn ids(raw: &[&str]) -> Vec<NodeId> {
    raw.iter().map(|id| NodeId::from(*id)).collect()
}

fn three_papers() -> Hypergraph {
    let mut graph = Hypergraph::new();
    graph.add_hyperedge("A", ids(&["1", "2", "3"]));
    graph.add_hyperedge("B", ids(&["2", "3", "4"]));
    graph.add_hyperedge("C", ids(&["4", "5"]));
    graph
}

#[test]
fn walk_distributions_sum_to_one() {
    let mut graph = three_papers();
    graph.add_node("alone");
    let params = WalkParams::default();
    for node in graph.nodes() {
        let mu = node_probability(&graph, node, &params).unwrap();
        assert_eq!(mu.len(), graph.node_count());
        assert!((mu.total() - 1.0).abs() < 1e-12, "{node}: {}", mu.total());
        assert!(mu.iter().all(|(_, mass)| mass >= 0.0));
    }
    let alone = node_probability(&graph, &"alone".into(), &params).unwrap();
    assert_eq!(alone.mass(&"alone".into()), 1.0);
}

#[test]
fn walk_weights_neighbours_by_shared_hyperedges() {
    let graph = three_papers();
    let mu = node_probability(&graph, &"2".into(), &WalkParams::default()).unwrap();
    // node 2 sits in A and B: denominator 2 + 2, node 3 shares both
    let expected_three = 0.9 * 2.0 / 4.0;
    let expected_one = 0.9 * 1.0 / 4.0;
    let total = 0.1 + expected_three + 2.0 * expected_one;
    assert!((mu.mass(&"3".into()) - expected_three / total).abs() < 1e-12);
    assert!((mu.mass(&"1".into()) - expected_one / total).abs() < 1e-12);
    assert!((mu.mass(&"2".into()) - 0.1 / total).abs() < 1e-12);
    assert_eq!(mu.mass(&"5".into()), 0.0);
}

#[test]
fn invalid_alpha_is_rejected() {
    let err = WalkParams { alpha: 1.0 }.validate().unwrap_err();
    assert!(matches!(err, OrcError::Config(_)));
    assert!(WalkParams { alpha: 0.0 }.validate().is_ok());
}

#[test]
fn earthmover_distance_to_self_is_zero() {
    let graph = three_papers();
    let matrix = all_pairs_shortest_paths(&graph);
    let solver = SuccessiveShortestPath::default();
    for node in graph.nodes() {
        let emd = earthmover_distance(
            &graph,
            node,
            node,
            &matrix,
            &solver,
            &WalkParams::default(),
            &TransportParams::default(),
        )
        .unwrap();
        assert!(emd.abs() < 1e-9);
    }
}

#[test]
fn unbalanced_masses_are_reported() {
    let graph = three_papers();
    let matrix = all_pairs_shortest_paths(&graph);
    let full = BTreeMap::from([(NodeId::from("1"), 1.0)]);
    let half = BTreeMap::from([(NodeId::from("2"), 0.5)]);
    let err = transport_distance(
        &ProbabilityDistribution::from_masses("1".into(), full),
        &ProbabilityDistribution::from_masses("2".into(), half),
        &matrix,
        &SuccessiveShortestPath::default(),
        &TransportParams::default(),
    )
    .unwrap_err();
    assert_eq!(err.code(), "mass-mismatch");
    assert!(err.skips_pair());
}

#[test]
fn unknown_nodes_are_structural_errors() {
    let graph = three_papers();
    let matrix = all_pairs_shortest_paths(&graph);
    let err = earthmover_distance(
        &graph,
        &"1".into(),
        &"ghost".into(),
        &matrix,
        &SuccessiveShortestPath::default(),
        &WalkParams::default(),
        &TransportParams::default(),
    )
    .unwrap_err();
    assert!(matches!(err, OrcError::Structural(_)));
    assert!(!err.skips_pair());
}

#[test]
fn pair_hyperedge_curvature_matches_hand_computation() {
    let mut graph = Hypergraph::new();
    graph.add_hyperedge("pair", ids(&["x", "y"]));
    let matrix = all_pairs_shortest_paths(&graph);
    let solver = SuccessiveShortestPath::default();
    // mu_x = {x: 0.1, y: 0.9}, mu_y = {x: 0.9, y: 0.1}; 0.8 mass travels distance 1
    let curvature = hyperedge_curvature(
        &graph,
        &"pair".into(),
        &matrix,
        &solver,
        &CurvatureParams::default(),
    )
    .unwrap()
    .unwrap();
    assert!((curvature - 0.2).abs() < 1e-9, "curvature = {curvature}");

    let update = apply_curvature(&mut graph, &"pair".into(), Some(curvature), DEFAULT_LOGISTIC_CLIP).unwrap();
    let record = graph.hyperedge(&"pair".into()).unwrap();
    assert_eq!(record.curvatures(), &[curvature]);
    assert_eq!(record.weights().len(), 2);
    assert!((update.weight - squash(1.0 - curvature, DEFAULT_LOGISTIC_CLIP)).abs() < 1e-15);
}

#[test]
fn small_hyperedges_are_trivially_flat() {
    let mut graph = Hypergraph::new();
    graph.add_hyperedge("solo", ids(&["x"]));
    graph.add_hyperedge("twice", ids(&["y", "y"]));
    let matrix = all_pairs_shortest_paths(&graph);
    let solver = SuccessiveShortestPath::default();
    let params = CurvatureParams::default();
    for id in ["solo", "twice"] {
        let value = hyperedge_curvature(&graph, &id.into(), &matrix, &solver, &params).unwrap();
        assert_eq!(value, Some(1.0), "{id}");
    }
}

#[test]
fn undefined_curvature_leaves_histories_alone() {
    let mut graph = three_papers();
    let update = apply_curvature(&mut graph, &"A".into(), None, DEFAULT_LOGISTIC_CLIP).unwrap();
    assert_eq!(update.curvature, None);
    assert_eq!(update.weight, 1.0);
    let record = graph.hyperedge(&"A".into()).unwrap();
    assert_eq!(record.weights(), &[1.0]);
    assert!(record.curvatures().is_empty());
}

#[test]
fn zero_weight_stays_zero() {
    let mut graph = three_papers();
    graph.record_weight(&"C".into(), 0.0).unwrap();
    let update = apply_curvature(&mut graph, &"C".into(), Some(-3.0), DEFAULT_LOGISTIC_CLIP).unwrap();
    assert_eq!(update.weight, 0.0);
}

proptest! {
    #[test]
    fn squash_stays_strictly_inside_unit_interval(x in proptest::num::f64::ANY, clip in 0.0f64..1e6) {
        let value = squash(x, clip);
        prop_assert!(value > 0.0 && value < 1.0, "squash({x}, {clip}) = {value}");
    }
}
