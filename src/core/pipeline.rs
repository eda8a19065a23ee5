//! Pipeline graph resolution
//!
//! Builds the directed acyclic graph implied by a document: every output
//! connection value is matched against every input connection value, and an
//! edge links producer to consumer wherever the dataset-type strings are
//! equal. String equality is the sole edge mechanism; fan-out and fan-in are
//! both legal. A dataset consumed by some task but produced by none is an
//! external input boundary, not an error; a dataset produced but never
//! consumed is a pipeline output boundary.

use crate::core::contract::ContractExpr;
use crate::core::document::PipelineDocument;
use crate::core::error::PipelineError;
use crate::core::task::TaskNode;
use crate::registry::{DefaultsRegistry, RoleConventions};
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// A derived data-flow edge between two tasks
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionEdge {
    pub producer: String,
    pub producer_role: String,
    pub consumer: String,
    pub consumer_role: String,
    pub dataset_type: String,
}

/// A dataset crossing the pipeline boundary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Boundary {
    pub task: String,
    pub role: String,
    pub dataset_type: String,
}

/// One resolved input of a task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputBinding {
    pub role: String,
    pub dataset_type: String,
    /// Upstream tasks producing this dataset; empty means the dataset is
    /// bound to the external-input boundary
    pub producers: Vec<String>,
}

impl InputBinding {
    pub fn is_external(&self) -> bool {
        self.producers.is_empty()
    }
}

/// The validated, graph-linked result of resolving one document.
/// Immutable once built; recomputed from scratch if the document changes.
#[derive(Debug, Clone)]
pub struct ResolvedPipeline {
    pub description: String,
    tasks: IndexMap<String, TaskNode>,
    edges: Vec<ConnectionEdge>,
    external_inputs: Vec<Boundary>,
    pipeline_outputs: Vec<Boundary>,
    contracts: Vec<ContractExpr>,
    topo_order: Vec<String>,
}

/// Resolve a document against the registries and build its graph.
///
/// Fatal errors abort immediately; no partial pipeline is ever returned.
pub fn resolve(
    doc: &PipelineDocument,
    defaults: &DefaultsRegistry,
    conventions: &RoleConventions,
) -> Result<ResolvedPipeline, PipelineError> {
    let mut tasks = IndexMap::new();
    for (name, spec) in &doc.tasks {
        let node = TaskNode::resolve(name, spec, defaults, conventions)?;
        tasks.insert(name.clone(), node);
    }

    // dataset-type -> every (task, role) producing it
    let mut producers: HashMap<&str, Vec<(&str, &str)>> = HashMap::new();
    for node in tasks.values() {
        for (role, dataset) in node.outputs() {
            producers
                .entry(dataset)
                .or_default()
                .push((node.name.as_str(), role));
        }
    }

    let mut edges = Vec::new();
    let mut external_inputs = Vec::new();
    let mut consumed: HashSet<&str> = HashSet::new();
    for node in tasks.values() {
        for (role, dataset) in node.inputs() {
            consumed.insert(dataset);
            match producers.get(dataset) {
                Some(sources) => {
                    for (producer, producer_role) in sources {
                        edges.push(ConnectionEdge {
                            producer: producer.to_string(),
                            producer_role: producer_role.to_string(),
                            consumer: node.name.clone(),
                            consumer_role: role.to_string(),
                            dataset_type: dataset.to_string(),
                        });
                    }
                }
                None => external_inputs.push(Boundary {
                    task: node.name.clone(),
                    role: role.to_string(),
                    dataset_type: dataset.to_string(),
                }),
            }
        }
    }

    let mut pipeline_outputs = Vec::new();
    for node in tasks.values() {
        for (role, dataset) in node.outputs() {
            if !consumed.contains(dataset) {
                pipeline_outputs.push(Boundary {
                    task: node.name.clone(),
                    role: role.to_string(),
                    dataset_type: dataset.to_string(),
                });
            }
        }
    }

    check_cycles(&tasks, &edges)?;
    let topo_order = topological_order(&tasks, &edges);

    Ok(ResolvedPipeline {
        description: doc.description.clone(),
        tasks,
        edges,
        external_inputs,
        pipeline_outputs,
        contracts: doc.contracts.clone(),
        topo_order,
    })
}

impl ResolvedPipeline {
    pub fn task(&self, name: &str) -> Option<&TaskNode> {
        self.tasks.get(name)
    }

    /// Tasks in document declaration order
    pub fn tasks(&self) -> impl Iterator<Item = &TaskNode> {
        self.tasks.values()
    }

    pub fn edges(&self) -> &[ConnectionEdge] {
        &self.edges
    }

    pub fn external_inputs(&self) -> &[Boundary] {
        &self.external_inputs
    }

    pub fn pipeline_outputs(&self) -> &[Boundary] {
        &self.pipeline_outputs
    }

    pub fn contracts(&self) -> &[ContractExpr] {
        &self.contracts
    }

    /// Execution order. Stable: independent tasks keep declaration order.
    pub fn topological_order(&self) -> Vec<&TaskNode> {
        self.topo_order
            .iter()
            .filter_map(|name| self.tasks.get(name))
            .collect()
    }

    /// Every input of a task, bound either to its upstream producers or to
    /// the external-input boundary
    pub fn input_bindings(&self, task: &str) -> Vec<InputBinding> {
        let Some(node) = self.tasks.get(task) else {
            return Vec::new();
        };
        node.inputs()
            .map(|(role, dataset)| {
                let producers = self
                    .edges
                    .iter()
                    .filter(|e| e.consumer == task && e.consumer_role == role)
                    .map(|e| e.producer.clone())
                    .collect();
                InputBinding {
                    role: role.to_string(),
                    dataset_type: dataset.to_string(),
                    producers,
                }
            })
            .collect()
    }
}

fn successors<'a>(
    tasks: &'a IndexMap<String, TaskNode>,
    edges: &'a [ConnectionEdge],
) -> HashMap<&'a str, Vec<&'a str>> {
    let mut map: HashMap<&str, Vec<&str>> = tasks
        .keys()
        .map(|name| (name.as_str(), Vec::new()))
        .collect();
    for edge in edges {
        map.entry(edge.producer.as_str())
            .or_default()
            .push(edge.consumer.as_str());
    }
    map
}

/// Depth-first coloring walk over the edge set
fn check_cycles(
    tasks: &IndexMap<String, TaskNode>,
    edges: &[ConnectionEdge],
) -> Result<(), PipelineError> {
    let successors = successors(tasks, edges);
    let mut visited = HashSet::new();
    let mut stack = HashSet::new();

    for name in tasks.keys() {
        if !visited.contains(name.as_str()) {
            dfs_check(name.as_str(), &successors, &mut visited, &mut stack)?;
        }
    }
    Ok(())
}

fn dfs_check<'a>(
    name: &'a str,
    successors: &HashMap<&'a str, Vec<&'a str>>,
    visited: &mut HashSet<&'a str>,
    stack: &mut HashSet<&'a str>,
) -> Result<(), PipelineError> {
    visited.insert(name);
    stack.insert(name);

    if let Some(next) = successors.get(name) {
        for &succ in next {
            if stack.contains(succ) {
                return Err(PipelineError::Cycle {
                    task: succ.to_string(),
                });
            }
            if !visited.contains(succ) {
                dfs_check(succ, successors, visited, stack)?;
            }
        }
    }

    stack.remove(name);
    Ok(())
}

/// Kahn-style order that always scans candidates in declaration order, so
/// independent tasks retain the order the document declared them in.
/// Assumes the edge set has already passed the cycle check.
fn topological_order(
    tasks: &IndexMap<String, TaskNode>,
    edges: &[ConnectionEdge],
) -> Vec<String> {
    let mut predecessors: HashMap<&str, HashSet<&str>> = tasks
        .keys()
        .map(|name| (name.as_str(), HashSet::new()))
        .collect();
    for edge in edges {
        if let Some(preds) = predecessors.get_mut(edge.consumer.as_str()) {
            preds.insert(edge.producer.as_str());
        }
    }

    let mut emitted: HashSet<&str> = HashSet::new();
    let mut order = Vec::with_capacity(tasks.len());
    while order.len() < tasks.len() {
        for name in tasks.keys() {
            if emitted.contains(name.as_str()) {
                continue;
            }
            let ready = predecessors[name.as_str()]
                .iter()
                .all(|pred| emitted.contains(pred));
            if ready {
                emitted.insert(name.as_str());
                order.push(name.clone());
            }
        }
    }
    order
}
