//! Typed config values
//!
//! Scalar values carried by task configuration and contract literals. YAML
//! erases the difference between a quoted string and a bare identifier, so
//! bare identifiers that look like enum tokens (`Unity`, `FULL`) are tracked
//! as a distinct variant. A token still compares equal to a plain string of
//! the same content; only the stored origin form differs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single configuration value
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    /// Boolean flag
    Bool(bool),
    /// Integer scalar
    Int(i64),
    /// Floating-point scalar
    Float(f64),
    /// Quoted or free-form string
    Str(String),
    /// Bare identifier (enum-like token, e.g. `Unity`)
    Token(String),
    /// List of values
    List(Vec<ConfigValue>),
}

impl PartialEq for ConfigValue {
    fn eq(&self, other: &Self) -> bool {
        use ConfigValue::*;
        match (self, other) {
            (Bool(a), Bool(b)) => a == b,
            (Int(a), Int(b)) => a == b,
            (Float(a), Float(b)) => a == b,
            // A config author reads `2` and `2.0` as the same number
            (Int(a), Float(b)) | (Float(b), Int(a)) => (*a as f64) == *b,
            // Tokens are string-equivalent for comparison purposes
            (Str(a), Str(b))
            | (Token(a), Token(b))
            | (Str(a), Token(b))
            | (Token(a), Str(b)) => a == b,
            (List(a), List(b)) => a == b,
            _ => false,
        }
    }
}

impl ConfigValue {
    /// Classify a parsed YAML scalar into a typed value.
    ///
    /// Mappings are rejected here; the document layer flattens nested
    /// mappings into dotted paths before values reach this point.
    pub fn from_yaml(value: &serde_yaml::Value) -> Option<ConfigValue> {
        match value {
            serde_yaml::Value::Bool(b) => Some(ConfigValue::Bool(*b)),
            serde_yaml::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(ConfigValue::Int(i))
                } else {
                    n.as_f64().map(ConfigValue::Float)
                }
            }
            serde_yaml::Value::String(s) => {
                if is_enum_token(s) {
                    Some(ConfigValue::Token(s.clone()))
                } else {
                    Some(ConfigValue::Str(s.clone()))
                }
            }
            serde_yaml::Value::Sequence(items) => {
                let values: Option<Vec<_>> = items.iter().map(ConfigValue::from_yaml).collect();
                values.map(ConfigValue::List)
            }
            _ => None,
        }
    }

    /// Parse a literal as written in a contract or mutation fragment.
    ///
    /// Quoting is visible in this grammar, so the string/token distinction
    /// is exact: `"Unity"` is a string, `Unity` is a token.
    pub fn parse_literal(text: &str) -> Option<ConfigValue> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        if (text.starts_with('"') && text.ends_with('"') && text.len() >= 2)
            || (text.starts_with('\'') && text.ends_with('\'') && text.len() >= 2)
        {
            return Some(ConfigValue::Str(text[1..text.len() - 1].to_string()));
        }
        match text {
            "true" | "True" => return Some(ConfigValue::Bool(true)),
            "false" | "False" => return Some(ConfigValue::Bool(false)),
            _ => {}
        }
        if let Ok(i) = text.parse::<i64>() {
            return Some(ConfigValue::Int(i));
        }
        if let Ok(f) = text.parse::<f64>() {
            return Some(ConfigValue::Float(f));
        }
        if is_identifier(text) {
            return Some(ConfigValue::Token(text.to_string()));
        }
        None
    }

    /// Mutable list access, used by the mutation mini-language
    pub fn as_list_mut(&mut self) -> Option<&mut Vec<ConfigValue>> {
        match self {
            ConfigValue::List(items) => Some(items),
            _ => None,
        }
    }
}

/// Bare identifier starting with an uppercase letter, e.g. `Unity` or `FULL`
fn is_enum_token(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_uppercase() => chars.all(|c| c.is_ascii_alphanumeric()),
        _ => false,
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

impl fmt::Display for ConfigValue {
    /// Round-trippable origin form: strings print quoted, tokens bare
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Bool(b) => write!(f, "{}", b),
            ConfigValue::Int(i) => write!(f, "{}", i),
            ConfigValue::Float(x) => write!(f, "{}", x),
            ConfigValue::Str(s) => write!(f, "\"{}\"", s),
            ConfigValue::Token(t) => write!(f, "{}", t),
            ConfigValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}
