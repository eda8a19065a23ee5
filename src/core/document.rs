//! Pipeline documents
//!
//! Parsing of the declarative document format:
//!
//! ```yaml
//! description: Fringe calibration construction
//! tasks:
//!   isr:
//!     class: lsst.ip.isr.isrTask.IsrTask
//!     config:
//!       connections.ccdExposure: raw
//!       connections.outputExposure: cpFringeIsr
//!       doFringe: false
//!       python: |
//!         maskNameList.append('SUSPECT')
//! contracts:
//!   - cpFringeCombine.calibrationType == "fringe"
//! ```
//!
//! Task order, override order, and contract order are all semantically
//! significant, so every mapping parses into an IndexMap.

use crate::core::contract::ContractExpr;
use crate::core::error::PipelineError;
use crate::core::mutation::Mutation;
use crate::core::value::ConfigValue;
use indexmap::IndexMap;
use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::path::Path;

/// One parsed pipeline document
#[derive(Debug, Clone)]
pub struct PipelineDocument {
    pub description: String,
    /// Task name -> spec, in declaration order. Task names are unique:
    /// a duplicate name in the document is a parse error.
    pub tasks: IndexMap<String, TaskSpec>,
    pub contracts: Vec<ContractExpr>,
}

/// One task as authored in a document
#[derive(Debug, Clone)]
pub struct TaskSpec {
    /// Implementing-class identifier, opaque to this engine
    pub class: String,
    /// Structural overrides in document order, dotted-path keyed
    pub overrides: IndexMap<String, ConfigValue>,
    /// Inline mutation fragments, applied after all structural overrides
    pub mutations: Vec<Mutation>,
}

#[derive(Debug, Deserialize)]
struct RawDocument {
    #[serde(default)]
    description: String,
    #[serde(deserialize_with = "unique_tasks")]
    tasks: IndexMap<String, RawTask>,
    #[serde(default)]
    contracts: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawTask {
    class: String,
    #[serde(default)]
    config: IndexMap<String, serde_yaml::Value>,
}

/// IndexMap's own deserializer keeps the last value for a repeated key, so
/// a duplicated task name must be caught here while the pairs still arrive
/// one at a time.
fn unique_tasks<'de, D>(deserializer: D) -> Result<IndexMap<String, RawTask>, D::Error>
where
    D: Deserializer<'de>,
{
    struct TasksVisitor;

    impl<'de> Visitor<'de> for TasksVisitor {
        type Value = IndexMap<String, RawTask>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a mapping of task names to task definitions")
        }

        fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut tasks = IndexMap::with_capacity(access.size_hint().unwrap_or(0));
            while let Some((name, task)) = access.next_entry::<String, RawTask>()? {
                if tasks.insert(name.clone(), task).is_some() {
                    return Err(de::Error::custom(format!("duplicate task name '{}'", name)));
                }
            }
            Ok(tasks)
        }
    }

    deserializer.deserialize_map(TasksVisitor)
}

/// Parse a document from YAML text
pub fn parse(text: &str) -> Result<PipelineDocument, PipelineError> {
    let raw: RawDocument = serde_yaml::from_str(text)?;

    let mut tasks = IndexMap::new();
    for (name, raw_task) in raw.tasks {
        let spec = TaskSpec::from_raw(&name, raw_task)?;
        tasks.insert(name, spec);
    }

    let contracts = raw
        .contracts
        .iter()
        .map(|text| ContractExpr::parse(text))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(PipelineDocument {
        description: raw.description,
        tasks,
        contracts,
    })
}

/// Parse a document from a file on disk
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<PipelineDocument, PipelineError> {
    let text = std::fs::read_to_string(&path)
        .map_err(|e| PipelineError::Parse(format!("{}: {}", path.as_ref().display(), e)))?;
    parse(&text)
}

impl TaskSpec {
    fn from_raw(task: &str, raw: RawTask) -> Result<TaskSpec, PipelineError> {
        let mut overrides = IndexMap::new();
        let mut mutations = Vec::new();

        for (key, value) in &raw.config {
            if key == "python" {
                for fragment in fragment_strings(task, value)? {
                    mutations.extend(Mutation::parse_fragment(&fragment)?);
                }
                continue;
            }
            flatten_value(task, key, value, &mut overrides)?;
        }

        Ok(TaskSpec {
            class: raw.class,
            overrides,
            mutations,
        })
    }
}

/// The `python` key holds a fragment block or a list of fragment blocks
fn fragment_strings(task: &str, value: &serde_yaml::Value) -> Result<Vec<String>, PipelineError> {
    match value {
        serde_yaml::Value::String(s) => Ok(vec![s.clone()]),
        serde_yaml::Value::Sequence(items) => items
            .iter()
            .map(|item| match item {
                serde_yaml::Value::String(s) => Ok(s.clone()),
                _ => Err(PipelineError::Parse(format!(
                    "Task '{}': python fragments must be strings",
                    task
                ))),
            })
            .collect(),
        _ => Err(PipelineError::Parse(format!(
            "Task '{}': python fragments must be strings",
            task
        ))),
    }
}

/// Flatten nested mappings into dotted paths; classify scalars and lists
fn flatten_value(
    task: &str,
    path: &str,
    value: &serde_yaml::Value,
    out: &mut IndexMap<String, ConfigValue>,
) -> Result<(), PipelineError> {
    if let serde_yaml::Value::Mapping(map) = value {
        for (key, nested) in map {
            let key = key.as_str().ok_or_else(|| {
                PipelineError::Parse(format!(
                    "Task '{}': non-string config key under '{}'",
                    task, path
                ))
            })?;
            flatten_value(task, &format!("{}.{}", path, key), nested, out)?;
        }
        return Ok(());
    }

    let value = ConfigValue::from_yaml(value).ok_or_else(|| {
        PipelineError::Parse(format!(
            "Task '{}': unsupported value at config path '{}'",
            task, path
        ))
    })?;
    out.insert(path.to_string(), value);
    Ok(())
}
