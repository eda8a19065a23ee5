//! Test fixtures shared by the scenario tests

use calpipe::core::{document, pipeline, PipelineError, ResolvedPipeline};
use calpipe::registry::Registry;

/// Task-class registry covering the calibration classes the scenarios use
pub const REGISTRY_YAML: &str = r#"
classes:
  lsst.ip.isr.isrTask.IsrTask:
    connections:
      inputs: [ccdExposure]
      outputs: [outputExposure]
    defaults:
      doFringe: true
      doDark: true
      maskNameList: [BAD, SAT]
      isrStats:
        doCtiStatistics: false
  lsst.cp.pipe.cpFringeTask.CpFringeTask:
    connections:
      inputs: [inputExp]
      outputs: [outputExp]
    defaults:
      subtractBackground: true
  lsst.cp.pipe.cpCombine.CalibCombineTask:
    connections:
      inputs: [inputExpHandles]
      outputs: [outputData]
    defaults:
      calibrationType: dark
      exposureScaling: Unity
  lsst.cp.pipe.cpDarkTask.CpDarkTask:
    connections:
      inputs: [inputExp]
      outputs: [outputExp]
    defaults:
      crGrow: 2
"#;

pub fn registry() -> Registry {
    Registry::from_yaml(REGISTRY_YAML).expect("fixture registry parses")
}

/// Parse and resolve a document against the fixture registry
pub fn resolve_doc(yaml: &str) -> Result<ResolvedPipeline, PipelineError> {
    let registry = registry();
    let doc = document::parse(yaml)?;
    pipeline::resolve(&doc, &registry.defaults, &registry.roles)
}

/// The fringe construction chain: isr -> cpFringe -> cpFringeCombine
pub const FRINGE_DOC: &str = r#"
description: cp_pipe fringe calibration construction
tasks:
  isr:
    class: lsst.ip.isr.isrTask.IsrTask
    config:
      connections.ccdExposure: raw
      connections.outputExposure: cpFringeIsr
      doFringe: false
  cpFringe:
    class: lsst.cp.pipe.cpFringeTask.CpFringeTask
    config:
      connections.inputExp: cpFringeIsr
      connections.outputExp: cpFringeProc
  cpFringeCombine:
    class: lsst.cp.pipe.cpCombine.CalibCombineTask
    config:
      connections.inputExpHandles: cpFringeProc
      connections.outputData: fringe
      calibrationType: fringe
contracts:
  - isr.doFringe == false
  - cpFringeCombine.calibrationType == "fringe"
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_registry_is_complete() {
        let registry = registry();
        assert!(registry
            .defaults
            .lookup("lsst.ip.isr.isrTask.IsrTask")
            .is_some());
        assert!(registry
            .defaults
            .lookup("lsst.cp.pipe.cpCombine.CalibCombineTask")
            .is_some());
    }

    #[test]
    fn test_fringe_doc_resolves() {
        assert!(resolve_doc(FRINGE_DOC).is_ok());
    }
}
