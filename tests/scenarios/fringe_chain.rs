//! Scenario: fringe calibration chain
//!
//! Three tasks chained via the dataset-type strings `cpFringeIsr` and
//! `cpFringeProc`, with `raw` entering at the external boundary and the
//! combined `fringe` product leaving at the output boundary.

use crate::helpers::*;
use calpipe::core::contract::validate;

#[test]
fn test_chain_resolves_and_contracts_hold() {
    let pipeline = resolve_doc(FRINGE_DOC).unwrap();

    let order: Vec<_> = pipeline
        .topological_order()
        .iter()
        .map(|t| t.name.clone())
        .collect();
    assert_eq!(order, vec!["isr", "cpFringe", "cpFringeCombine"]);

    let report = validate(&pipeline).unwrap();
    assert!(report.is_valid(), "violations: {:?}", report.violations);
}

#[test]
fn test_raw_is_external_boundary_not_error() {
    let pipeline = resolve_doc(FRINGE_DOC).unwrap();

    let external = pipeline.external_inputs();
    assert_eq!(external.len(), 1);
    assert_eq!(external[0].dataset_type, "raw");
    assert_eq!(external[0].task, "isr");

    let outputs = pipeline.pipeline_outputs();
    assert_eq!(outputs.len(), 1);
    assert_eq!(outputs[0].dataset_type, "fringe");
}

#[test]
fn test_wrong_calibration_type_is_recorded_violation() {
    // Same chain, but the combine override says dark while the contract
    // still demands fringe
    let doc = FRINGE_DOC.replace("calibrationType: fringe", "calibrationType: dark");
    let pipeline = resolve_doc(&doc).unwrap();

    let report = validate(&pipeline).unwrap();
    assert!(!report.is_valid());
    assert_eq!(report.violations.len(), 1);

    let violation = &report.violations[0];
    assert_eq!(violation.task, "cpFringeCombine");
    assert_eq!(violation.path, "calibrationType");
    assert_eq!(violation.actual, "\"dark\"");
}

#[test]
fn test_boundaries_are_reported_as_notes() {
    let pipeline = resolve_doc(FRINGE_DOC).unwrap();
    let report = validate(&pipeline).unwrap();

    assert!(report.notes.iter().any(|n| n.contains("'raw'")));
    assert!(report.notes.iter().any(|n| n.contains("'fringe'")));
}

#[test]
fn test_resolve_and_validate_are_deterministic() {
    let a = resolve_doc(FRINGE_DOC).unwrap();
    let b = resolve_doc(FRINGE_DOC).unwrap();

    assert_eq!(a.edges(), b.edges());
    let report_a = serde_json::to_string(&validate(&a).unwrap()).unwrap();
    let report_b = serde_json::to_string(&validate(&b).unwrap()).unwrap();
    assert_eq!(report_a, report_b);

    // Validation is idempotent on the same pipeline as well
    assert_eq!(validate(&a).unwrap(), validate(&a).unwrap());
}
