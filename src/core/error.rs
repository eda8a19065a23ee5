//! Engine error taxonomy
//!
//! Every fatal condition that aborts a resolution pass. Contract violations
//! are deliberately not here: a well-formed contract whose value check fails
//! is collected into the `ValidationReport`, not raised as an error.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Malformed document structure
    #[error("Parse error: {0}")]
    Parse(String),

    /// A task references a class identifier with no registered defaults
    #[error("Task '{task}' references unknown class '{class}'")]
    UnknownTaskClass { task: String, class: String },

    /// An override, mutation, or lookup targets a nonexistent dotted path
    #[error("Task '{task}': no such config path '{path}'")]
    ConfigPath { task: String, path: String },

    /// The connection graph admits no topological order
    #[error("Cycle detected in pipeline graph involving task '{task}'")]
    Cycle { task: String },

    /// A contract names an unknown task or unresolvable config path
    #[error("Contract '{contract}' is malformed: {reason}")]
    ContractReference { contract: String, reason: String },
}

impl From<serde_yaml::Error> for PipelineError {
    fn from(err: serde_yaml::Error) -> Self {
        PipelineError::Parse(err.to_string())
    }
}
