//! Config model
//!
//! Task configuration is a flat, ordered mapping of dotted paths to typed
//! values. A class's registered defaults form a `ConfigTemplate`; merging a
//! document's overrides onto it produces a `ResolvedConfig`. Overrides apply
//! in document order and fully replace the value at their path; there is no
//! deep merge beyond what dotted-path scoping already expresses.

use crate::core::error::PipelineError;
use crate::core::value::ConfigValue;
use indexmap::IndexMap;
use serde::Serialize;

/// Default configuration registered for a task class
#[derive(Debug, Clone, Default)]
pub struct ConfigTemplate {
    entries: IndexMap<String, ConfigValue>,
}

impl ConfigTemplate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a default value at a dotted path
    pub fn insert(&mut self, path: impl Into<String>, value: ConfigValue) {
        self.entries.insert(path.into(), value);
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// Merge document overrides onto these defaults.
    ///
    /// An override targeting a path the template does not define is a
    /// `ConfigPathError`: contracts depend on exact post-merge values, so a
    /// silently ignored typo would corrupt validation downstream.
    pub fn merge(
        &self,
        task: &str,
        overrides: &IndexMap<String, ConfigValue>,
    ) -> Result<ResolvedConfig, PipelineError> {
        let mut entries = self.entries.clone();
        for (path, value) in overrides {
            if !entries.contains_key(path.as_str()) {
                return Err(PipelineError::ConfigPath {
                    task: task.to_string(),
                    path: path.clone(),
                });
            }
            entries[path.as_str()] = value.clone();
        }
        Ok(ResolvedConfig {
            task: task.to_string(),
            entries,
        })
    }
}

impl FromIterator<(String, ConfigValue)> for ConfigTemplate {
    fn from_iter<I: IntoIterator<Item = (String, ConfigValue)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// A task's configuration after all overrides and mutations
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedConfig {
    /// Task name, carried for error reporting
    task: String,
    entries: IndexMap<String, ConfigValue>,
}

impl ResolvedConfig {
    /// Look up a value by dotted path
    pub fn get(&self, path: &str) -> Result<&ConfigValue, PipelineError> {
        self.entries
            .get(path)
            .ok_or_else(|| PipelineError::ConfigPath {
                task: self.task.clone(),
                path: path.to_string(),
            })
    }

    /// Mutable access for the mutation mini-language. Mutations may only
    /// touch fields already present; a missing path is a `ConfigPathError`.
    pub(crate) fn get_mut(&mut self, path: &str) -> Result<&mut ConfigValue, PipelineError> {
        let task = self.task.clone();
        self.entries.get_mut(path).ok_or(PipelineError::ConfigPath {
            task,
            path: path.to_string(),
        })
    }

    pub(crate) fn set(&mut self, path: &str, value: ConfigValue) -> Result<(), PipelineError> {
        *self.get_mut(path)? = value;
        Ok(())
    }

    pub fn task(&self) -> &str {
        &self.task
    }

    /// Iterate entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Split off the `connections.*` sub-mapping, keyed by role name.
    ///
    /// Connection values drive graph topology; everything else only drives
    /// contract evaluation and eventual task behavior.
    pub fn connection_map(&self) -> IndexMap<String, String> {
        self.entries
            .iter()
            .filter_map(|(path, value)| {
                let role = path.strip_prefix("connections.")?;
                let dataset = match value {
                    ConfigValue::Str(s) | ConfigValue::Token(s) => s.clone(),
                    other => other.to_string(),
                };
                Some((role.to_string(), dataset))
            })
            .collect()
    }
}
