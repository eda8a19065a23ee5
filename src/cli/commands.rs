//! CLI command definitions

use clap::Args;

/// Resolve a pipeline document and check its contracts
#[derive(Debug, Args, Clone)]
pub struct ValidateCommand {
    /// Path to pipeline YAML document
    #[arg(short, long)]
    pub file: String,

    /// Path to task-class registry YAML
    #[arg(short, long)]
    pub registry: String,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Print the resolved task graph
#[derive(Debug, Args, Clone)]
pub struct GraphCommand {
    /// Path to pipeline YAML document
    #[arg(short, long)]
    pub file: String,

    /// Path to task-class registry YAML
    #[arg(short, long)]
    pub registry: String,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Execute a pipeline with the placeholder runner
#[derive(Debug, Args, Clone)]
pub struct RunCommand {
    /// Path to pipeline YAML document
    #[arg(short, long)]
    pub file: String,

    /// Path to task-class registry YAML
    #[arg(short, long)]
    pub registry: String,

    /// Run even if contract validation reports violations
    #[arg(long)]
    pub ignore_contracts: bool,
}
