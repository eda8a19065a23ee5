//! Task class registries
//!
//! The engine does not know what an `lsst.ip.isr.isrTask.IsrTask` is. Two
//! external collaborators describe registered classes, and every resolution
//! call takes them as explicit parameters. There is no ambient or global
//! lookup, which keeps resolution a pure function of its inputs.
//!
//! For end-to-end CLI use both collaborators load from one registry file:
//!
//! ```yaml
//! classes:
//!   lsst.ip.isr.isrTask.IsrTask:
//!     connections:
//!       inputs: [ccdExposure]
//!       outputs: [outputExposure]
//!     defaults:
//!       doFringe: true
//!       connections.ccdExposure: raw
//! ```

use crate::core::config::ConfigTemplate;
use crate::core::error::PipelineError;
use crate::core::value::ConfigValue;
use indexmap::IndexMap;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

/// Which connection roles of a class are inputs vs outputs
#[derive(Debug, Clone, Default)]
pub struct Roles {
    pub inputs: HashSet<String>,
    pub outputs: HashSet<String>,
}

impl Roles {
    /// Classify a connection role. Roles with no explicit entry fall back
    /// to the naming convention: `output*` keys are outputs.
    pub fn is_output(&self, role: &str) -> bool {
        if self.outputs.contains(role) {
            return true;
        }
        if self.inputs.contains(role) {
            return false;
        }
        role.starts_with("output")
    }
}

/// Base configuration per class identifier
#[derive(Debug, Clone, Default)]
pub struct DefaultsRegistry {
    classes: IndexMap<String, ConfigTemplate>,
}

impl DefaultsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, class_id: impl Into<String>, template: ConfigTemplate) {
        self.classes.insert(class_id.into(), template);
    }

    pub fn lookup(&self, class_id: &str) -> Option<&ConfigTemplate> {
        self.classes.get(class_id)
    }
}

/// Input/output role metadata per class identifier
#[derive(Debug, Clone, Default)]
pub struct RoleConventions {
    classes: IndexMap<String, Roles>,
}

impl RoleConventions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, class_id: impl Into<String>, roles: Roles) {
        self.classes.insert(class_id.into(), roles);
    }

    /// Roles for a class; an unregistered class gets the empty set, which
    /// makes `Roles::is_output` fall back to the `output*` convention.
    pub fn roles_of(&self, class_id: &str) -> Roles {
        self.classes.get(class_id).cloned().unwrap_or_default()
    }
}

/// Both collaborators, loaded together from a registry file
#[derive(Debug, Clone, Default)]
pub struct Registry {
    pub defaults: DefaultsRegistry,
    pub roles: RoleConventions,
}

#[derive(Debug, Deserialize)]
struct RawRegistry {
    classes: IndexMap<String, RawClass>,
}

#[derive(Debug, Deserialize)]
struct RawClass {
    #[serde(default)]
    connections: RawRoles,
    #[serde(default)]
    defaults: IndexMap<String, serde_yaml::Value>,
}

#[derive(Debug, Deserialize, Default)]
struct RawRoles {
    #[serde(default)]
    inputs: Vec<String>,
    #[serde(default)]
    outputs: Vec<String>,
}

impl Registry {
    /// Parse a registry from YAML text
    pub fn from_yaml(text: &str) -> Result<Registry, PipelineError> {
        let raw: RawRegistry = serde_yaml::from_str(text)?;
        let mut registry = Registry::default();

        for (class_id, raw_class) in raw.classes {
            let mut template = ConfigTemplate::new();
            for (path, value) in &raw_class.defaults {
                insert_flattened(&class_id, path, value, &mut template)?;
            }
            // Connection roles always exist as config paths, defaulting to
            // the role's own name, so documents can rebind them
            for role in raw_class
                .connections
                .inputs
                .iter()
                .chain(&raw_class.connections.outputs)
            {
                let path = format!("connections.{}", role);
                if !template.contains(&path) {
                    template.insert(path, ConfigValue::Str(role.clone()));
                }
            }
            registry.defaults.register(&class_id, template);
            registry.roles.register(
                &class_id,
                Roles {
                    inputs: raw_class.connections.inputs.into_iter().collect(),
                    outputs: raw_class.connections.outputs.into_iter().collect(),
                },
            );
        }

        Ok(registry)
    }

    /// Load a registry from a file on disk
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Registry, PipelineError> {
        let text = std::fs::read_to_string(&path)
            .map_err(|e| PipelineError::Parse(format!("{}: {}", path.as_ref().display(), e)))?;
        Self::from_yaml(&text)
    }
}

fn insert_flattened(
    class_id: &str,
    path: &str,
    value: &serde_yaml::Value,
    template: &mut ConfigTemplate,
) -> Result<(), PipelineError> {
    if let serde_yaml::Value::Mapping(map) = value {
        for (key, nested) in map {
            let key = key.as_str().ok_or_else(|| {
                PipelineError::Parse(format!(
                    "Class '{}': non-string default key under '{}'",
                    class_id, path
                ))
            })?;
            insert_flattened(class_id, &format!("{}.{}", path, key), nested, template)?;
        }
        return Ok(());
    }
    let value = ConfigValue::from_yaml(value).ok_or_else(|| {
        PipelineError::Parse(format!(
            "Class '{}': unsupported default at '{}'",
            class_id, path
        ))
    })?;
    template.insert(path.to_string(), value);
    Ok(())
}
