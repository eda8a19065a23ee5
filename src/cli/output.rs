//! CLI output formatting

use crate::core::contract::{ContractViolation, ValidationReport};
use crate::core::pipeline::{Boundary, ConnectionEdge};
use crate::execution::{ExecutionEvent, RunStatus, RunSummary};
use console::Emoji;

// Re-export style
pub use console::style;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "! ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "> ");

/// Format one contract violation for display
pub fn format_violation(violation: &ContractViolation) -> String {
    format!(
        "{} {} -- {}.{} is {}, expected {}",
        CROSS,
        style(&violation.contract).bold(),
        style(&violation.task).cyan(),
        violation.path,
        style(&violation.actual).red(),
        style(&violation.expected).green()
    )
}

/// Print a full validation report, violations first
pub fn print_report(report: &ValidationReport) {
    for violation in &report.violations {
        println!("{}", format_violation(violation));
    }
    for note in &report.notes {
        println!("{} {}", INFO, style(note).dim());
    }
    if report.is_valid() {
        println!("{} All contracts hold", CHECK);
    } else {
        println!(
            "{} {} contract violation(s)",
            CROSS,
            style(report.violations.len()).red()
        );
    }
}

/// Format a graph edge for display
pub fn format_edge(edge: &ConnectionEdge) -> String {
    format!(
        "{} --[{}]--> {}  ({} -> {})",
        style(&edge.producer).cyan(),
        style(&edge.dataset_type).bold(),
        style(&edge.consumer).cyan(),
        edge.producer_role,
        edge.consumer_role
    )
}

/// Format a boundary dataset for display
pub fn format_boundary(boundary: &Boundary, kind: &str) -> String {
    format!(
        "{} {} ({}.{})",
        style(kind).dim(),
        style(&boundary.dataset_type).bold(),
        boundary.task,
        boundary.role
    )
}

/// Format an execution event for display
pub fn format_execution_event(event: &ExecutionEvent) -> String {
    match event {
        ExecutionEvent::PipelineStarted {
            execution_id,
            description,
        } => format!(
            "{} Starting pipeline {} ({})",
            ROCKET,
            style(description).bold(),
            style(&execution_id.to_string()[..8]).dim()
        ),
        ExecutionEvent::TaskStarted { task } => {
            format!("{} {}", INFO, style(task).cyan())
        }
        ExecutionEvent::TaskCompleted { task, produced } => format!(
            "{} {} produced [{}]",
            CHECK,
            style(task).cyan(),
            produced.join(", ")
        ),
        ExecutionEvent::TaskFailed { task, error } => {
            format!("{} {} failed: {}", CROSS, style(task).cyan(), error)
        }
        ExecutionEvent::PipelineCompleted {
            execution_id,
            status,
        } => format!(
            "{} Pipeline {} {}",
            if *status == RunStatus::Completed {
                CHECK
            } else {
                CROSS
            },
            style(&execution_id.to_string()[..8]).dim(),
            format_status(*status)
        ),
    }
}

/// Format a run status for display
pub fn format_status(status: RunStatus) -> String {
    match status {
        RunStatus::Completed => style("COMPLETED").green().to_string(),
        RunStatus::Failed => style("FAILED").red().to_string(),
    }
}

/// Format a run summary line
pub fn format_run_summary(summary: &RunSummary) -> String {
    format!(
        "{} {} - {} ({}/{} tasks)",
        style(&summary.execution_id.to_string()[..8]).dim(),
        style(&summary.description).bold(),
        format_status(summary.status),
        summary.tasks_run,
        summary.total_tasks
    )
}
