//! Validator configuration, loadable from JSON or YAML.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::ConfigError;

pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Settings a [`Validator`](crate::Validator) is built with.
///
/// ```yaml
/// max_depth: 32
/// struct_rules: true
/// aliases:
///   varchar: required,max=255
/// messages:
///   required: "{field} is required"
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidatorConfig {
    /// Nesting limit for composites and dives. Deeper values fail with
    /// [`ConfigError::DepthExceeded`].
    pub max_depth: usize,
    /// Whether rules written on a composite-valued field (e.g. `required` on
    /// a nested record) are evaluated. When false they are ignored and only
    /// the nested fields are checked.
    pub struct_rules: bool,
    /// Aliases registered at construction, in name order.
    pub aliases: BTreeMap<String, String>,
    /// Message templates keyed by reported tag.
    pub messages: BTreeMap<String, String>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        ValidatorConfig {
            max_depth: DEFAULT_MAX_DEPTH,
            struct_rules: true,
            aliases: BTreeMap::new(),
            messages: BTreeMap::new(),
        }
    }
}

impl ValidatorConfig {
    pub fn from_json(input: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(input).map_err(|e| ConfigError::Load {
            message: format!("invalid JSON configuration: {}", e),
        })
    }

    #[cfg(feature = "yaml")]
    pub fn from_yaml(input: &str) -> Result<Self, ConfigError> {
        let value: serde_json::Value = serde_saphyr::from_str(input).map_err(|e| ConfigError::Load {
            message: format!("invalid YAML configuration: {}", e),
        })?;
        serde_json::from_value(value).map_err(|e| ConfigError::Load {
            message: format!("invalid configuration: {}", e),
        })
    }
}
