//! Scenario: contract evaluation and reporting
//!
//! The validator reports every broken contract in one pass and keeps the
//! malformed-document case (bad reference) strictly separate from the
//! unsatisfied-invariant case (violation).

use crate::helpers::*;
use calpipe::core::contract::validate;
use calpipe::core::PipelineError;

#[test]
fn test_all_violations_reported_in_document_order() {
    let doc = r#"
tasks:
  isr:
    class: lsst.ip.isr.isrTask.IsrTask
    config:
      doFringe: false
      doDark: false
contracts:
  - isr.doFringe == true
  - isr.doDark == false
  - isr.isrStats.doCtiStatistics == true
"#;
    let pipeline = resolve_doc(doc).unwrap();
    let report = validate(&pipeline).unwrap();

    // Two of three contracts fail independently; both appear, in order
    assert_eq!(report.violations.len(), 2);
    assert_eq!(report.violations[0].path, "doFringe");
    assert_eq!(report.violations[1].path, "isrStats.doCtiStatistics");
}

#[test]
fn test_unknown_task_is_reference_error_not_violation() {
    let doc = r#"
tasks:
  isr:
    class: lsst.ip.isr.isrTask.IsrTask
contracts:
  - ghost.doFringe == true
"#;
    let pipeline = resolve_doc(doc).unwrap();
    let err = validate(&pipeline).unwrap_err();

    match err {
        PipelineError::ContractReference { contract, reason } => {
            assert!(contract.contains("ghost.doFringe"));
            assert!(reason.contains("ghost"));
        }
        other => panic!("Expected ContractReference, got {:?}", other),
    }
}

#[test]
fn test_unresolvable_path_is_reference_error() {
    let doc = r#"
tasks:
  isr:
    class: lsst.ip.isr.isrTask.IsrTask
contracts:
  - isr.noSuchField == true
"#;
    let pipeline = resolve_doc(doc).unwrap();
    assert!(matches!(
        validate(&pipeline).unwrap_err(),
        PipelineError::ContractReference { .. }
    ));
}

#[test]
fn test_enum_token_compares_equal_to_string_literal() {
    let doc = r#"
tasks:
  cpDarkCombine:
    class: lsst.cp.pipe.cpCombine.CalibCombineTask
contracts:
  - cpDarkCombine.exposureScaling == Unity
  - cpDarkCombine.exposureScaling == "Unity"
"#;
    let pipeline = resolve_doc(doc).unwrap();
    let report = validate(&pipeline).unwrap();
    assert!(report.is_valid(), "violations: {:?}", report.violations);
}

#[test]
fn test_inequality_contract() {
    let doc = r#"
tasks:
  cpDarkCombine:
    class: lsst.cp.pipe.cpCombine.CalibCombineTask
contracts:
  - cpDarkCombine.calibrationType != "flat"
"#;
    let pipeline = resolve_doc(doc).unwrap();
    assert!(validate(&pipeline).unwrap().is_valid());
}
