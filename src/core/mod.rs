//! Core engine: documents, config resolution, contracts, and graph building
//!
//! This module defines the data model for declarative pipeline documents and
//! the pure resolution pass that turns one into a validated, graph-linked
//! `ResolvedPipeline`.

pub mod config;
pub mod contract;
pub mod document;
pub mod error;
pub mod mutation;
pub mod pipeline;
pub mod task;
pub mod value;

pub use config::{ConfigTemplate, ResolvedConfig};
pub use contract::{validate, ContractExpr, ContractOp, ContractViolation, ValidationReport};
pub use document::{parse, parse_file, PipelineDocument, TaskSpec};
pub use error::PipelineError;
pub use pipeline::{resolve, Boundary, ConnectionEdge, InputBinding, ResolvedPipeline};
pub use task::TaskNode;
pub use value::ConfigValue;
