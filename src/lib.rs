//! calpipe - definition and validation engine for declarative calibration pipelines

pub mod cli;
pub mod core;
pub mod execution;
pub mod registry;

// Re-export commonly used types
pub use crate::core::{
    parse, parse_file, resolve, validate, ConfigTemplate, ConfigValue, ContractExpr,
    ContractViolation, PipelineDocument, PipelineError, ResolvedConfig, ResolvedPipeline,
    TaskNode, TaskSpec, ValidationReport,
};
pub use crate::execution::{
    Driver, ExecutionEvent, LoggingRunner, RunStatus, RunSummary, TaskRunner,
};
pub use crate::registry::{DefaultsRegistry, Registry, RoleConventions, Roles};
