use std::fs;

use orc_core::{NodeId, OrcError};
use orc_surgery::{build_hypergraph, load_papers, parse_author_ids, read_papers, SurgeryConfig};

fn ids(raw: &[&str]) -> Vec<NodeId> {
    raw.iter().map(|id| NodeId::from(*id)).collect()
}

#[test]
fn author_literals_accept_common_spellings() {
    assert_eq!(parse_author_ids("['a1', 'a2']").unwrap(), ids(&["a1", "a2"]));
    assert_eq!(parse_author_ids("[\"x\",\"y\" , 'z',]").unwrap(), ids(&["x", "y", "z"]));
    assert_eq!(parse_author_ids(" [12, 7] ").unwrap(), ids(&["12", "7"]));
    assert_eq!(parse_author_ids("['O\\'Neil']").unwrap(), ids(&["O'Neil"]));
    assert!(parse_author_ids("[]").unwrap().is_empty());
}

#[test]
fn malformed_literals_are_structural_errors() {
    for raw in ["a1, a2", "['a1'", "['a1' 'a2']", "[,]", "['a1]"] {
        let err = parse_author_ids(raw).unwrap_err();
        assert!(matches!(err, OrcError::Structural(_)), "{raw}");
        assert_eq!(err.code(), "malformed-author-list");
    }
}

#[test]
fn papers_become_hyperedges() {
    let table = "title,paper_id,author_ids\n\
                 first,A,\"['1', '2', '3']\"\n\
                 second,B,\"['2', '3', '4']\"\n\
                 third,C,\"['4', '5']\"\n";
    let papers = read_papers(table.as_bytes()).unwrap();
    assert_eq!(papers.records.len(), 3);
    assert_eq!(papers.input_hash.len(), 64);

    let graph = build_hypergraph(&papers.records).unwrap();
    assert_eq!(graph.hyperedge_count(), 3);
    assert_eq!(graph.node_count(), 5);
    assert_eq!(graph.degree(&"4".into()).unwrap(), 2);
}

#[test]
fn bad_rows_name_their_position() {
    let table = "paper_id,author_ids\nA,\"['1']\"\nB,\"[1 2]\"\n";
    let papers = read_papers(table.as_bytes()).unwrap();
    let err = build_hypergraph(&papers.records).unwrap_err();
    assert_eq!(err.info().context.get("row").map(String::as_str), Some("2"));
    assert_eq!(err.info().context.get("paper_id").map(String::as_str), Some("B"));

    let err = read_papers("paper_id\nA\n".as_bytes()).unwrap_err();
    assert!(matches!(err, OrcError::Structural(_)));
}

#[test]
fn papers_load_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("papers.csv");
    fs::write(&path, "paper_id,author_ids\nP1,\"['a', 'b']\"\n").unwrap();
    let papers = load_papers(&path).unwrap();
    assert_eq!(papers.records[0].paper_id, "P1");

    let err = load_papers(&dir.path().join("missing.csv")).unwrap_err();
    assert!(matches!(err, OrcError::Artifact(_)));
}

#[test]
fn yaml_overrides_keep_remaining_defaults() {
    let config = SurgeryConfig::from_yaml_str(
        "iterations: 3\nwalk:\n  alpha: 0.25\noutput:\n  directory: runs/demo\n  write_snapshot: true\n",
    )
    .unwrap();
    assert_eq!(config.iterations, 3);
    assert_eq!(config.walk.alpha, 0.25);
    assert_eq!(config.prune_fraction, 0.08);
    assert_eq!(config.prune_every, 2);
    assert_eq!(config.logistic_clip, 36.0);
    assert!(config.output.write_snapshot);
    assert!(config.output.write_distance_matrices);
    assert!(config.output.weights_path(0) != config.output.weights_path(1));
    assert!(config.output.weights_path(3).ends_with("normalized_weights_iteration_3.csv"));
}

#[test]
fn out_of_range_values_fail_validation() {
    for yaml in [
        "prune_fraction: 1.5",
        "prune_every: 0",
        "logistic_clip: -1.0",
        "walk:\n  alpha: 1.0",
    ] {
        let err = SurgeryConfig::from_yaml_str(yaml).unwrap_err();
        assert!(matches!(err, OrcError::Config(_)), "{yaml}");
    }
    let err = SurgeryConfig::from_yaml_str("iterations: [1").unwrap_err();
    assert_eq!(err.code(), "config-parse");
}

#[test]
fn config_loads_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("surgery.yaml");
    fs::write(&path, "iterations: 7\n").unwrap();
    assert_eq!(SurgeryConfig::load(&path).unwrap().iterations, 7);
}

proptest::proptest! {
    #[test]
    fn printed_lists_parse_back(authors in proptest::collection::vec("[A-Za-z0-9_.-]{1,12}", 0..8)) {
        let literal = format!(
            "[{}]",
            authors.iter().map(|a| format!("'{a}'")).collect::<Vec<_>>().join(", ")
        );
        let parsed = parse_author_ids(&literal).unwrap();
        let expected: Vec<NodeId> = authors.iter().map(|a| NodeId::from(a.as_str())).collect();
        proptest::prop_assert_eq!(parsed, expected);
    }
}
