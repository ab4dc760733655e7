use orc_core::{NodeId, OrcError, TransportProblem};

#[test]
fn problem_rejects_shape_mismatch() {
    let err = TransportProblem::new(vec![1.0], vec![0.5, 0.5], vec![Some(1.0)]).unwrap_err();
    assert!(matches!(err, OrcError::Solver(ref info) if info.code == "transport-shape"));
}

#[test]
fn problem_rejects_negative_mass() {
    let err = TransportProblem::new(vec![-0.1], vec![1.0], vec![Some(0.0)]).unwrap_err();
    assert_eq!(err.code(), "transport-mass");
}

#[test]
fn forbidden_lanes_read_as_none() {
    let problem =
        TransportProblem::new(vec![0.5, 0.5], vec![1.0], vec![Some(2.0), None]).unwrap();
    assert_eq!(problem.cost(0, 0), Some(2.0));
    assert_eq!(problem.cost(1, 0), None);
    assert_eq!(problem.cost(5, 5), None);
}

#[test]
fn identifiers_serialize_transparently() {
    let id = NodeId::from("2241");
    assert_eq!(serde_json::to_string(&id).unwrap(), "\"2241\"");
    assert_eq!(id.to_string(), "2241");
}
