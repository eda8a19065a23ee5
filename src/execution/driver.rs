//! Execution driver
//!
//! Thin, synchronous driver over a validated pipeline: walks the tasks in
//! topological order and hands each one the datasets produced upstream, or
//! external-boundary placeholders for datasets no in-pipeline task produces.
//! Actual task behavior lives behind the `TaskRunner` trait; calibration
//! science, I/O, and retries are outside this engine. A task's inputs are
//! fully produced before it runs by construction of the order; no locking
//! is involved.

use crate::core::pipeline::ResolvedPipeline;
use crate::core::task::TaskNode;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use std::collections::HashMap;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// One dataset artifact flowing between tasks
#[derive(Debug, Clone)]
pub struct Dataset {
    pub dataset_type: String,
    pub origin: DatasetOrigin,
    /// Opaque payload; the engine never inspects it
    pub payload: serde_json::Value,
}

/// Where a dataset came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetOrigin {
    /// Bound at the external-input boundary
    External,
    /// Produced by an upstream task
    Produced { task: String },
}

/// Opaque executable unit behind each task node.
///
/// Returns produced payloads keyed by output role name; the driver maps
/// roles to dataset-type identifiers through the node's connection map.
pub trait TaskRunner {
    fn run(
        &self,
        task: &TaskNode,
        inputs: &[Dataset],
    ) -> Result<IndexMap<String, serde_json::Value>, String>;
}

/// Events emitted while a pipeline runs
#[derive(Debug, Clone)]
pub enum ExecutionEvent {
    PipelineStarted {
        execution_id: Uuid,
        description: String,
    },
    TaskStarted {
        task: String,
    },
    TaskCompleted {
        task: String,
        produced: Vec<String>,
    },
    TaskFailed {
        task: String,
        error: String,
    },
    PipelineCompleted {
        execution_id: Uuid,
        status: RunStatus,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum RunStatus {
    Completed,
    Failed,
}

/// Outcome of one driver pass
#[derive(Debug, Clone, serde::Serialize)]
pub struct RunSummary {
    pub execution_id: Uuid,
    pub description: String,
    pub status: RunStatus,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub tasks_run: usize,
    pub total_tasks: usize,
    pub error: Option<String>,
}

pub type EventHandler = Box<dyn Fn(&ExecutionEvent)>;

/// Synchronous pipeline driver
pub struct Driver<R> {
    runner: R,
    handlers: Vec<EventHandler>,
}

impl<R: TaskRunner> Driver<R> {
    pub fn new(runner: R) -> Self {
        Self {
            runner,
            handlers: Vec::new(),
        }
    }

    /// Add an event handler
    pub fn add_event_handler<F>(&mut self, handler: F)
    where
        F: Fn(&ExecutionEvent) + 'static,
    {
        self.handlers.push(Box::new(handler));
    }

    fn emit(&self, event: ExecutionEvent) {
        for handler in &self.handlers {
            handler(&event);
        }
    }

    /// Run every task in topological order, stopping at the first failure
    pub fn execute(&self, pipeline: &ResolvedPipeline) -> RunSummary {
        let execution_id = Uuid::new_v4();
        let started_at = Utc::now();
        let order = pipeline.topological_order();
        let total_tasks = order.len();

        info!(
            "Starting pipeline run: {} ({})",
            pipeline.description, execution_id
        );
        self.emit(ExecutionEvent::PipelineStarted {
            execution_id,
            description: pipeline.description.clone(),
        });

        // Produced artifacts keyed by dataset-type identifier
        let mut artifacts: HashMap<String, serde_json::Value> = HashMap::new();
        let mut tasks_run = 0;

        for node in order {
            let inputs = self.gather_inputs(pipeline, node, &artifacts);
            self.emit(ExecutionEvent::TaskStarted {
                task: node.name.clone(),
            });

            match self.runner.run(node, &inputs) {
                Ok(outputs) => {
                    let mut produced = Vec::new();
                    for (role, payload) in outputs {
                        match node.connections.get(&role) {
                            Some(dataset) => {
                                artifacts.insert(dataset.clone(), payload);
                                produced.push(dataset.clone());
                            }
                            None => warn!(
                                "Task '{}' produced unknown output role '{}'",
                                node.name, role
                            ),
                        }
                    }
                    tasks_run += 1;
                    self.emit(ExecutionEvent::TaskCompleted {
                        task: node.name.clone(),
                        produced,
                    });
                }
                Err(error) => {
                    self.emit(ExecutionEvent::TaskFailed {
                        task: node.name.clone(),
                        error: error.clone(),
                    });
                    self.emit(ExecutionEvent::PipelineCompleted {
                        execution_id,
                        status: RunStatus::Failed,
                    });
                    return RunSummary {
                        execution_id,
                        description: pipeline.description.clone(),
                        status: RunStatus::Failed,
                        started_at,
                        completed_at: Utc::now(),
                        tasks_run,
                        total_tasks,
                        error: Some(format!("Task '{}' failed: {}", node.name, error)),
                    };
                }
            }
        }

        self.emit(ExecutionEvent::PipelineCompleted {
            execution_id,
            status: RunStatus::Completed,
        });
        RunSummary {
            execution_id,
            description: pipeline.description.clone(),
            status: RunStatus::Completed,
            started_at,
            completed_at: Utc::now(),
            tasks_run,
            total_tasks,
            error: None,
        }
    }

    fn gather_inputs(
        &self,
        pipeline: &ResolvedPipeline,
        node: &TaskNode,
        artifacts: &HashMap<String, serde_json::Value>,
    ) -> Vec<Dataset> {
        pipeline
            .input_bindings(&node.name)
            .into_iter()
            .map(|binding| {
                if binding.is_external() {
                    Dataset {
                        dataset_type: binding.dataset_type,
                        origin: DatasetOrigin::External,
                        payload: serde_json::Value::Null,
                    }
                } else {
                    // Upstream outputs are complete before this task runs;
                    // a missing artifact would mean the runner skipped a role
                    let payload = artifacts
                        .get(&binding.dataset_type)
                        .cloned()
                        .unwrap_or(serde_json::Value::Null);
                    Dataset {
                        dataset_type: binding.dataset_type,
                        origin: DatasetOrigin::Produced {
                            task: binding.producers[0].clone(),
                        },
                        payload,
                    }
                }
            })
            .collect()
    }
}

/// Runner that produces placeholder payloads and logs what it would do.
/// Useful for exercising a pipeline's wiring without the science tasks.
pub struct LoggingRunner;

impl TaskRunner for LoggingRunner {
    fn run(
        &self,
        task: &TaskNode,
        inputs: &[Dataset],
    ) -> Result<IndexMap<String, serde_json::Value>, String> {
        for (path, value) in task.config.iter() {
            debug!("Task '{}' config {} = {}", task.name, path, value);
        }
        for input in inputs {
            info!(
                "Task '{}' consumes '{}' ({})",
                task.name,
                input.dataset_type,
                match &input.origin {
                    DatasetOrigin::External => "external boundary".to_string(),
                    DatasetOrigin::Produced { task } => format!("from '{}'", task),
                }
            );
        }
        Ok(task
            .outputs()
            .map(|(role, dataset)| {
                (
                    role.to_string(),
                    serde_json::json!({ "dataset_type": dataset, "task": task.name }),
                )
            })
            .collect())
    }
}
