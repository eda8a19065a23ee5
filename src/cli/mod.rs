//! Command-line interface

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use commands::{GraphCommand, RunCommand, ValidateCommand};

/// Calibration pipeline definition and validation tool
#[derive(Debug, Parser, Clone)]
#[command(name = "calpipe")]
#[command(author = "Calpipe Contributors")]
#[command(version = "0.1.0")]
#[command(about = "Validate and drive declarative calibration pipelines", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Resolve a pipeline document and check its contracts
    Validate(ValidateCommand),

    /// Print the resolved task graph
    Graph(GraphCommand),

    /// Execute a pipeline with the placeholder runner
    Run(RunCommand),
}

impl Cli {
    /// Parse CLI arguments from environment
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Parse CLI arguments from a slice
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(itr)
    }
}

use std::ffi::OsString;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_validate_command() {
        let cli = Cli::try_parse_from([
            "calpipe", "validate", "-f", "pipeline.yaml", "-r", "registry.yaml",
        ])
        .unwrap();
        match cli.command {
            Command::Validate(cmd) => {
                assert_eq!(cmd.file, "pipeline.yaml");
                assert_eq!(cmd.registry, "registry.yaml");
                assert!(!cmd.json);
            }
            other => panic!("Expected validate command, got {:?}", other),
        }
        assert!(!cli.verbose);
    }

    #[test]
    fn test_verbose_is_global() {
        let cli = Cli::try_parse_from([
            "calpipe", "run", "-f", "p.yaml", "-r", "r.yaml", "--verbose",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Command::Run(cmd) => assert!(!cmd.ignore_contracts),
            other => panic!("Expected run command, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_subcommand_fails() {
        assert!(Cli::try_parse_from(["calpipe"]).is_err());
    }
}
