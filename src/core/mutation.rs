//! Mutation-expression mini-language
//!
//! Documents may carry inline fragments that tweak a task's configuration
//! after all structural overrides have been applied. The grammar is a closed
//! set of three operations on an existing field:
//!
//! ```text
//! maskNameList.append('SUSPECT')
//! maskNameList.remove('BAD')
//! binSize = 2
//! ```
//!
//! A leading `config.` on the path is accepted and stripped. Fragments only
//! mutate fields already present in the resolved config; targeting a missing
//! path fails with a `ConfigPathError`.

use crate::core::config::ResolvedConfig;
use crate::core::error::PipelineError;
use crate::core::value::ConfigValue;
use regex::Regex;
use std::sync::OnceLock;

/// One parsed mutation expression
#[derive(Debug, Clone, PartialEq)]
pub struct Mutation {
    /// Dotted config path being mutated
    pub path: String,
    pub kind: MutationKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MutationKind {
    /// `path = literal`
    Assign(ConfigValue),
    /// `path.append(literal)`
    Append(ConfigValue),
    /// `path.remove(literal)`
    Remove(ConfigValue),
}

fn call_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?P<path>[A-Za-z_][A-Za-z0-9_.]*)\.(?P<op>append|remove)\((?P<arg>.+)\)$")
            .expect("static regex")
    })
}

fn assign_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?P<path>[A-Za-z_][A-Za-z0-9_.]*)\s*=\s*(?P<value>.+)$")
            .expect("static regex")
    })
}

impl Mutation {
    /// Parse a fragment block into mutations, one per nonempty line
    pub fn parse_fragment(fragment: &str) -> Result<Vec<Mutation>, PipelineError> {
        fragment
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(Mutation::parse_line)
            .collect()
    }

    fn parse_line(line: &str) -> Result<Mutation, PipelineError> {
        if let Some(caps) = call_re().captures(line) {
            let value = ConfigValue::parse_literal(&caps["arg"]).ok_or_else(|| {
                PipelineError::Parse(format!("Bad literal in mutation fragment: {}", line))
            })?;
            let kind = match &caps["op"] {
                "append" => MutationKind::Append(value),
                _ => MutationKind::Remove(value),
            };
            return Ok(Mutation {
                path: strip_config_prefix(&caps["path"]),
                kind,
            });
        }
        if let Some(caps) = assign_re().captures(line) {
            let value = ConfigValue::parse_literal(&caps["value"]).ok_or_else(|| {
                PipelineError::Parse(format!("Bad literal in mutation fragment: {}", line))
            })?;
            return Ok(Mutation {
                path: strip_config_prefix(&caps["path"]),
                kind: MutationKind::Assign(value),
            });
        }
        Err(PipelineError::Parse(format!(
            "Unrecognized mutation fragment: {}",
            line
        )))
    }

    /// Apply this mutation to an already-merged config
    pub fn apply(&self, config: &mut ResolvedConfig) -> Result<(), PipelineError> {
        match &self.kind {
            MutationKind::Assign(value) => config.set(&self.path, value.clone()),
            MutationKind::Append(value) => {
                let target = config.get_mut(&self.path)?;
                let items = target.as_list_mut().ok_or_else(|| {
                    PipelineError::Parse(format!(
                        "Mutation target '{}' is not a list",
                        self.path
                    ))
                })?;
                items.push(value.clone());
                Ok(())
            }
            MutationKind::Remove(value) => {
                let target = config.get_mut(&self.path)?;
                let items = target.as_list_mut().ok_or_else(|| {
                    PipelineError::Parse(format!(
                        "Mutation target '{}' is not a list",
                        self.path
                    ))
                })?;
                items.retain(|item| item != value);
                Ok(())
            }
        }
    }
}

/// Apply fragments in order, after all structural overrides
pub fn apply_all(
    config: &mut ResolvedConfig,
    mutations: &[Mutation],
) -> Result<(), PipelineError> {
    for mutation in mutations {
        mutation.apply(config)?;
    }
    Ok(())
}

fn strip_config_prefix(path: &str) -> String {
    path.strip_prefix("config.").unwrap_or(path).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ConfigTemplate;
    use indexmap::IndexMap;

    fn config_with_list() -> ResolvedConfig {
        let mut template = ConfigTemplate::new();
        template.insert(
            "maskNameList",
            ConfigValue::List(vec![
                ConfigValue::Str("BAD".to_string()),
                ConfigValue::Str("SAT".to_string()),
            ]),
        );
        template.insert("binSize", ConfigValue::Int(1));
        template.merge("isr", &IndexMap::new()).unwrap()
    }

    #[test]
    fn test_parse_append() {
        let mutations = Mutation::parse_fragment("maskNameList.append('SUSPECT')").unwrap();
        assert_eq!(mutations.len(), 1);
        assert_eq!(mutations[0].path, "maskNameList");
        assert_eq!(
            mutations[0].kind,
            MutationKind::Append(ConfigValue::Str("SUSPECT".to_string()))
        );
    }

    #[test]
    fn test_parse_strips_config_prefix() {
        let mutations = Mutation::parse_fragment("config.binSize = 2").unwrap();
        assert_eq!(mutations[0].path, "binSize");
        assert_eq!(mutations[0].kind, MutationKind::Assign(ConfigValue::Int(2)));
    }

    #[test]
    fn test_append_reflected_in_readback() {
        let mut config = config_with_list();
        let mutations = Mutation::parse_fragment("maskNameList.append('SUSPECT')").unwrap();
        apply_all(&mut config, &mutations).unwrap();
        match config.get("maskNameList").unwrap() {
            ConfigValue::List(items) => {
                assert_eq!(items.len(), 3);
                assert_eq!(items[2], ConfigValue::Str("SUSPECT".to_string()));
            }
            other => panic!("Expected list, got {:?}", other),
        }
    }

    #[test]
    fn test_remove_drops_matching_entries() {
        let mut config = config_with_list();
        let mutations = Mutation::parse_fragment("maskNameList.remove('BAD')").unwrap();
        apply_all(&mut config, &mutations).unwrap();
        match config.get("maskNameList").unwrap() {
            ConfigValue::List(items) => {
                assert_eq!(items, &vec![ConfigValue::Str("SAT".to_string())]);
            }
            other => panic!("Expected list, got {:?}", other),
        }
    }

    #[test]
    fn test_mutation_on_missing_field_fails() {
        let mut config = config_with_list();
        let mutations = Mutation::parse_fragment("overscanList.append('X')").unwrap();
        let err = apply_all(&mut config, &mutations).unwrap_err();
        assert!(matches!(err, PipelineError::ConfigPath { .. }));
    }

    #[test]
    fn test_append_to_scalar_fails() {
        let mut config = config_with_list();
        let mutations = Mutation::parse_fragment("binSize.append(2)").unwrap();
        assert!(apply_all(&mut config, &mutations).is_err());
    }

    #[test]
    fn test_unrecognized_fragment_fails() {
        assert!(Mutation::parse_fragment("import os").is_err());
    }
}
