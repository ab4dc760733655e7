use orc_core::errors::{ErrorInfo, OrcError};

fn sample_info(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message)
        .with_context("node", "a1")
        .with_context("reason", "example")
}

#[test]
fn structural_error_surface() {
    let err = OrcError::Structural(sample_info("unknown-node", "node does not exist"));
    assert_eq!(err.code(), "unknown-node");
    assert!(err.info().context.contains_key("node"));
    assert!(!err.skips_pair());
}

#[test]
fn transport_failures_skip_pairs() {
    let mismatch = OrcError::MassMismatch(sample_info("mass-mismatch", "unequal mass"));
    let solver = OrcError::Solver(sample_info("transport-infeasible", "no plan"));
    assert!(mismatch.skips_pair());
    assert!(solver.skips_pair());
}

#[test]
fn display_includes_context_and_hint() {
    let err = OrcError::Config(
        ErrorInfo::new("invalid-fraction", "prune fraction out of range")
            .with_context("value", 1.5)
            .with_hint("use a value within [0, 1]"),
    );
    let rendered = err.to_string();
    assert!(rendered.starts_with("config error: prune fraction out of range"));
    assert!(rendered.contains("value=1.5"));
    assert!(rendered.contains("hint: use a value within [0, 1]"));
}

#[test]
fn with_context_preserves_family() {
    let err = OrcError::Artifact(ErrorInfo::new("csv-write", "disk full")).with_context("path", "/tmp/x");
    match err {
        OrcError::Artifact(info) => assert_eq!(info.context.get("path").map(String::as_str), Some("/tmp/x")),
        other => panic!("unexpected family: {other:?}"),
    }
}

#[test]
fn errors_roundtrip_through_json() {
    let err = OrcError::Solver(sample_info("transport-iteration-limit", "gave up"));
    let json = serde_json::to_string(&err).unwrap();
    assert!(json.contains("\"family\":\"Solver\""));
    let back: OrcError = serde_json::from_str(&json).unwrap();
    assert_eq!(back, err);
}
