use anyhow::{Context, Result};
use calpipe::cli::commands::{GraphCommand, RunCommand, ValidateCommand};
use calpipe::cli::output::*;
use calpipe::cli::{Cli, Command};
use calpipe::core::{contract, document, pipeline, ResolvedPipeline};
use calpipe::execution::{Driver, LoggingRunner, RunStatus};
use calpipe::registry::Registry;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    let cli = Cli::from_args();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set logging subscriber")?;

    match &cli.command {
        Command::Validate(cmd) => validate_pipeline(cmd)?,
        Command::Graph(cmd) => show_graph(cmd)?,
        Command::Run(cmd) => run_pipeline(cmd)?,
    }

    Ok(())
}

fn load_pipeline(file: &str, registry: &str) -> Result<ResolvedPipeline> {
    let registry = Registry::from_file(registry).context("Failed to load task-class registry")?;
    let doc = document::parse_file(file).context("Failed to load pipeline document")?;
    let pipeline = pipeline::resolve(&doc, &registry.defaults, &registry.roles)
        .context("Failed to resolve pipeline")?;
    Ok(pipeline)
}

fn validate_pipeline(cmd: &ValidateCommand) -> Result<()> {
    println!("{} Validating pipeline...", INFO);

    let pipeline = load_pipeline(&cmd.file, &cmd.registry)?;
    let report = contract::validate(&pipeline)?;

    println!(
        "{} Resolved pipeline: {} ({} tasks, {} edges)",
        INFO,
        style(&pipeline.description).bold(),
        style(pipeline.tasks().count()).cyan(),
        style(pipeline.edges().len()).cyan()
    );

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if !report.is_valid() {
        std::process::exit(1);
    }
    Ok(())
}

fn show_graph(cmd: &GraphCommand) -> Result<()> {
    let pipeline = load_pipeline(&cmd.file, &cmd.registry)?;

    if cmd.json {
        let order: Vec<_> = pipeline
            .topological_order()
            .iter()
            .map(|t| t.name.clone())
            .collect();
        let data = serde_json::json!({
            "description": pipeline.description,
            "order": order,
            "edges": pipeline.edges(),
            "external_inputs": pipeline.external_inputs(),
            "pipeline_outputs": pipeline.pipeline_outputs(),
        });
        println!("{}", serde_json::to_string_pretty(&data)?);
        return Ok(());
    }

    println!("{} {}", INFO, style(&pipeline.description).bold());
    println!("\n  Execution order:");
    for (i, task) in pipeline.topological_order().iter().enumerate() {
        println!(
            "    {}. {} ({})",
            i + 1,
            style(&task.name).cyan(),
            style(&task.class).dim()
        );
    }

    println!("\n  Edges:");
    for edge in pipeline.edges() {
        println!("    {}", format_edge(edge));
    }

    println!("\n  Boundaries:");
    for boundary in pipeline.external_inputs() {
        println!("    {}", format_boundary(boundary, "external input"));
    }
    for boundary in pipeline.pipeline_outputs() {
        println!("    {}", format_boundary(boundary, "pipeline output"));
    }

    Ok(())
}

fn run_pipeline(cmd: &RunCommand) -> Result<()> {
    let pipeline = load_pipeline(&cmd.file, &cmd.registry)?;

    // Contracts gate execution
    let report = contract::validate(&pipeline)?;
    if !report.is_valid() {
        print_report(&report);
        if !cmd.ignore_contracts {
            println!(
                "{} Refusing to run an invalid pipeline (use --ignore-contracts to override)",
                CROSS
            );
            std::process::exit(1);
        }
        println!("{} Running despite contract violations", WARN);
    }

    let mut driver = Driver::new(LoggingRunner);
    driver.add_event_handler(|event| {
        println!("{}", format_execution_event(event));
    });

    println!();
    let summary = driver.execute(&pipeline);
    println!("\n{}", format_run_summary(&summary));

    if summary.status != RunStatus::Completed {
        if let Some(error) = &summary.error {
            println!("{} {}", CROSS, style(error).red());
        }
        std::process::exit(1);
    }
    Ok(())
}
