//! Document contracts
//!
//! A contract is an assertion over the fully resolved configuration of one
//! task: `<taskName>.<dotted.config.path> <==|!=> <literal>`. Contracts are
//! checked before any task executes. Evaluation never short-circuits: the
//! report collects every violation so a user sees all broken contracts in
//! one pass. A contract that names an unknown task or an unresolvable path
//! is malformed and aborts validation with `ContractReferenceError` instead
//! of being recorded as a violation.

use crate::core::error::PipelineError;
use crate::core::pipeline::ResolvedPipeline;
use crate::core::value::ConfigValue;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::OnceLock;

/// Comparison operator in a contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ContractOp {
    Eq,
    Ne,
}

impl fmt::Display for ContractOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContractOp::Eq => write!(f, "=="),
            ContractOp::Ne => write!(f, "!="),
        }
    }
}

/// One parsed contract expression
#[derive(Debug, Clone, PartialEq)]
pub struct ContractExpr {
    /// Source text as authored, for reporting
    pub source: String,
    pub task: String,
    pub path: String,
    pub op: ContractOp,
    pub literal: ConfigValue,
}

fn contract_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^(?P<task>[A-Za-z_][A-Za-z0-9_]*)\.(?P<path>[A-Za-z_][A-Za-z0-9_.]*)\s*(?P<op>==|!=)\s*(?P<lit>.+)$",
        )
        .expect("static regex")
    })
}

impl ContractExpr {
    /// Parse a contract expression from its document form
    pub fn parse(text: &str) -> Result<ContractExpr, PipelineError> {
        let text = text.trim();
        let caps = contract_re()
            .captures(text)
            .ok_or_else(|| PipelineError::ContractReference {
                contract: text.to_string(),
                reason: "expected <task>.<path> ==|!= <literal>".to_string(),
            })?;

        let op = match &caps["op"] {
            "==" => ContractOp::Eq,
            _ => ContractOp::Ne,
        };
        let literal = ConfigValue::parse_literal(&caps["lit"]).ok_or_else(|| {
            PipelineError::ContractReference {
                contract: text.to_string(),
                reason: format!("bad literal '{}'", &caps["lit"]),
            }
        })?;

        Ok(ContractExpr {
            source: text.to_string(),
            task: caps["task"].to_string(),
            path: caps["path"].to_string(),
            op,
            literal,
        })
    }

    /// Evaluate against a resolved pipeline. `Ok(None)` means satisfied.
    fn evaluate(
        &self,
        pipeline: &ResolvedPipeline,
    ) -> Result<Option<ContractViolation>, PipelineError> {
        let node = pipeline
            .task(&self.task)
            .ok_or_else(|| PipelineError::ContractReference {
                contract: self.source.clone(),
                reason: format!("no task named '{}'", self.task),
            })?;

        let actual = node
            .config
            .get(&self.path)
            .map_err(|_| PipelineError::ContractReference {
                contract: self.source.clone(),
                reason: format!(
                    "task '{}' has no config path '{}'",
                    self.task, self.path
                ),
            })?;

        let holds = match self.op {
            ContractOp::Eq => actual == &self.literal,
            ContractOp::Ne => actual != &self.literal,
        };

        if holds {
            Ok(None)
        } else {
            Ok(Some(ContractViolation {
                contract: self.source.clone(),
                task: self.task.clone(),
                path: self.path.clone(),
                expected: format!("{} {}", self.op, self.literal),
                actual: actual.to_string(),
            }))
        }
    }
}

/// A well-formed contract whose value check failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContractViolation {
    pub contract: String,
    pub task: String,
    pub path: String,
    pub expected: String,
    pub actual: String,
}

impl fmt::Display for ContractViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}.{} is {}, expected {}",
            self.contract, self.task, self.path, self.actual, self.expected
        )
    }
}

/// Outcome of a validation pass over a resolved pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct ValidationReport {
    /// Violations in document order; empty means the pipeline is valid
    pub violations: Vec<ContractViolation>,
    /// Informational notes (unmatched connection strings at the graph
    /// boundary), never fatal
    pub notes: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Evaluate every contract of a resolved pipeline.
///
/// Pure and idempotent: the same pipeline always yields an identical report.
pub fn validate(pipeline: &ResolvedPipeline) -> Result<ValidationReport, PipelineError> {
    let mut report = ValidationReport::default();

    for contract in pipeline.contracts() {
        if let Some(violation) = contract.evaluate(pipeline)? {
            report.violations.push(violation);
        }
    }

    for boundary in pipeline.external_inputs() {
        report.notes.push(format!(
            "dataset '{}' consumed by task '{}' ({}) has no in-pipeline producer (external input)",
            boundary.dataset_type, boundary.task, boundary.role
        ));
    }
    for boundary in pipeline.pipeline_outputs() {
        report.notes.push(format!(
            "dataset '{}' produced by task '{}' ({}) has no in-pipeline consumer (pipeline output)",
            boundary.dataset_type, boundary.task, boundary.role
        ));
    }

    Ok(report)
}
