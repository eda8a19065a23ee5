//! Scenario: dark construction with inline mutation fragments
//!
//! The dark documents tweak list-valued fields after the structural merge.
//! A fragment may only touch a field the class template already defines.

use crate::helpers::*;
use calpipe::core::{ConfigValue, PipelineError};

#[test]
fn test_appended_token_visible_in_resolved_config() {
    let pipeline = resolve_doc(
        r#"
description: dark construction
tasks:
  isr:
    class: lsst.ip.isr.isrTask.IsrTask
    config:
      connections.ccdExposure: raw
      connections.outputExposure: cpDarkIsr
      doDark: false
      python: |
        maskNameList.append('SUSPECT')
"#,
    )
    .unwrap();

    let isr = pipeline.task("isr").unwrap();
    match isr.config.get("maskNameList").unwrap() {
        ConfigValue::List(items) => {
            assert_eq!(items.len(), 3);
            assert_eq!(*items.last().unwrap(), ConfigValue::Str("SUSPECT".into()));
        }
        other => panic!("Expected list, got {:?}", other),
    }
}

#[test]
fn test_mutation_runs_after_structural_overrides() {
    // The override replaces the whole list; the fragment then appends to
    // the replaced value, not the template default
    let pipeline = resolve_doc(
        r#"
tasks:
  isr:
    class: lsst.ip.isr.isrTask.IsrTask
    config:
      maskNameList: [NO_DATA]
      python: |
        maskNameList.append('SUSPECT')
"#,
    )
    .unwrap();

    let isr = pipeline.task("isr").unwrap();
    match isr.config.get("maskNameList").unwrap() {
        ConfigValue::List(items) => {
            assert_eq!(
                items,
                &vec![
                    ConfigValue::Str("NO_DATA".into()),
                    ConfigValue::Str("SUSPECT".into())
                ]
            );
        }
        other => panic!("Expected list, got {:?}", other),
    }
}

#[test]
fn test_mutation_on_field_missing_from_template_fails() {
    // CpDarkTask's template has no maskNameList
    let err = resolve_doc(
        r#"
tasks:
  cpDark:
    class: lsst.cp.pipe.cpDarkTask.CpDarkTask
    config:
      python: |
        maskNameList.append('SUSPECT')
"#,
    )
    .unwrap_err();

    match err {
        PipelineError::ConfigPath { task, path } => {
            assert_eq!(task, "cpDark");
            assert_eq!(path, "maskNameList");
        }
        other => panic!("Expected ConfigPath error, got {:?}", other),
    }
}

#[test]
fn test_assignment_fragment_replaces_scalar() {
    let pipeline = resolve_doc(
        r#"
tasks:
  cpDark:
    class: lsst.cp.pipe.cpDarkTask.CpDarkTask
    config:
      python: |
        crGrow = 4
"#,
    )
    .unwrap();

    let dark = pipeline.task("cpDark").unwrap();
    assert_eq!(dark.config.get("crGrow").unwrap(), &ConfigValue::Int(4));
}
