//! Task nodes
//!
//! A task node is one resolved pipeline stage: the opaque class identifier,
//! the fully merged configuration, and the connection map that drives graph
//! topology. The class's calibration behavior lives outside this engine.

use crate::core::config::ResolvedConfig;
use crate::core::document::TaskSpec;
use crate::core::error::PipelineError;
use crate::core::mutation;
use crate::registry::{DefaultsRegistry, RoleConventions, Roles};
use indexmap::IndexMap;

/// One resolved pipeline stage
#[derive(Debug, Clone)]
pub struct TaskNode {
    /// Task name within the document
    pub name: String,
    /// Implementing-class identifier
    pub class: String,
    /// Configuration after defaults, overrides, and mutations
    pub config: ResolvedConfig,
    /// Role name -> dataset-type identifier
    pub connections: IndexMap<String, String>,
    roles: Roles,
}

impl TaskNode {
    /// Resolve a spec against the registries.
    ///
    /// Merge order: registered defaults, then structural overrides in
    /// document order, then mutation fragments last.
    pub fn resolve(
        name: &str,
        spec: &TaskSpec,
        defaults: &DefaultsRegistry,
        conventions: &RoleConventions,
    ) -> Result<TaskNode, PipelineError> {
        let template =
            defaults
                .lookup(&spec.class)
                .ok_or_else(|| PipelineError::UnknownTaskClass {
                    task: name.to_string(),
                    class: spec.class.clone(),
                })?;

        let mut config = template.merge(name, &spec.overrides)?;
        mutation::apply_all(&mut config, &spec.mutations)?;

        let connections = config.connection_map();
        Ok(TaskNode {
            name: name.to_string(),
            class: spec.class.clone(),
            config,
            connections,
            roles: conventions.roles_of(&spec.class),
        })
    }

    /// Input connections: (role, dataset-type)
    pub fn inputs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.connections
            .iter()
            .filter(|(role, _)| !self.roles.is_output(role))
            .map(|(role, dataset)| (role.as_str(), dataset.as_str()))
    }

    /// Output connections: (role, dataset-type)
    pub fn outputs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.connections
            .iter()
            .filter(|(role, _)| self.roles.is_output(role))
            .map(|(role, dataset)| (role.as_str(), dataset.as_str()))
    }
}
