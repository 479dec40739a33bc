use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::enums::Kind;

/// One violated rule, located by its path from the validated root.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Dotted/indexed path, e.g. `Addresses[1].City` or `Schools[SMP].Name`.
    pub path: String,
    /// Declared field name (element fields carry their index: `Hobbies[2]`).
    pub field: String,
    /// Rust-side field name, which differs from `field` for renamed fields.
    pub struct_field: String,
    /// The tag that failed. For rules expanded from an alias this is the alias.
    pub tag: String,
    /// The concrete rule that failed.
    pub actual_tag: String,
    pub param: String,
    /// JSON rendering of the offending value.
    pub value: serde_json::Value,
    pub message: String,
}

impl ValidationError {
    /// The message used when no template is registered for the tag.
    pub fn default_message(path: &str, field: &str, tag: &str) -> String {
        format!(
            "Key: '{}' Error:Field validation for '{}' failed on the '{}' tag",
            path, field, tag
        )
    }

    /// Fills a message template. Recognized placeholders: `{field}`,
    /// `{path}`, `{tag}`, `{param}`, `{value}`.
    pub fn render_message(template: &str, error: &ValidationError) -> String {
        let value = match &error.value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        template
            .replace("{field}", &error.field)
            .replace("{path}", &error.path)
            .replace("{tag}", &error.tag)
            .replace("{param}", &error.param)
            .replace("{value}", &value)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Every violation found by one validation call, in traversal order.
///
/// An empty report is the only success signal.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub errors: Vec<ValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.errors.iter()
    }

    /// The error recorded at `path`, if any.
    pub fn for_path(&self, path: &str) -> Option<&ValidationError> {
        self.errors.iter().find(|e| e.path == path)
    }

    /// `(path, tag)` pairs in report order. Handy for assertions.
    pub fn tags(&self) -> Vec<(&str, &str)> {
        self.errors
            .iter()
            .map(|e| (e.path.as_str(), e.tag.as_str()))
            .collect()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}

impl IntoIterator for ValidationReport {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationReport {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

/// Syntax and resolution problems in a single tag string.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TagError {
    #[error("empty rule at position {position}")]
    EmptySegment { position: usize },
    #[error("rule with parameter '{param}' has no name")]
    MissingName { param: String },
    #[error("invalid rule name '{name}'")]
    InvalidName { name: String },
    #[error("directive '{directive}' cannot be part of an or-group")]
    DirectiveInGroup { directive: String },
    #[error("directive '{directive}' does not take a parameter")]
    DirectiveParam { directive: String },
    #[error("'keys' must directly follow 'dive'")]
    KeysWithoutDive,
    #[error("'keys' is never closed by 'endkeys'")]
    UnclosedKeys,
    #[error("'endkeys' without a matching 'keys'")]
    EndKeysWithoutKeys,
    #[error("'dive' is not allowed inside a keys section")]
    DiveInKeys,
    #[error("'-' must be the whole tag")]
    MisplacedSkip,
    #[error("unknown rule '{name}'")]
    UnknownRule { name: String },
    #[error("alias expansion cycles: {chain}")]
    CyclicAlias { chain: String },
}

/// Fatal setup mistakes. These halt the registration or validation call that
/// hit them; they are never folded into a [`ValidationReport`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid tag '{tag}' on '{path}': {source}")]
    Tag {
        path: String,
        tag: String,
        #[source]
        source: TagError,
    },
    #[error("invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: String },
    #[error("'{name}' is already registered as {existing}")]
    NameConflict { name: String, existing: &'static str },
    #[error("rule '{tag}' on '{path}' references unknown field '{field}'")]
    UnknownField {
        path: String,
        tag: String,
        field: String,
    },
    #[error("rule '{tag}' on '{path}' has invalid parameter '{param}': {reason}")]
    InvalidParam {
        path: String,
        tag: String,
        param: String,
        reason: String,
    },
    #[error("rule '{tag}' on '{path}' does not apply to {kind} values")]
    UnsupportedKind {
        path: String,
        tag: String,
        kind: String,
    },
    #[error("cannot dive into {kind} value at '{path}'")]
    InvalidDive { path: String, kind: Kind },
    #[error("'keys' used on {kind} value at '{path}'; only maps have keys")]
    KeysOnNonMap { path: String, kind: Kind },
    #[error("traversal exceeded the maximum depth of {max} at '{path}'")]
    DepthExceeded { path: String, max: usize },
    #[error("failed to load validator configuration: {message}")]
    Load { message: String },
}

impl ConfigError {
    pub(crate) fn tag(path: &str, tag: &str, source: TagError) -> Self {
        ConfigError::Tag {
            path: path.to_string(),
            tag: tag.to_string(),
            source,
        }
    }
}

/// Serialization error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SerializeError {
    pub message: String,
}

impl fmt::Display for SerializeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for SerializeError {}
