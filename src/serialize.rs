//! [`ValidationReport`] → JSON / YAML serialization.

use crate::error::{SerializeError, ValidationReport};

/// Serialize a report to pretty-printed JSON.
///
/// Errors keep traversal order; each entry carries its path, tag, parameter
/// and the offending value as JSON.
pub fn to_json(report: &ValidationReport) -> Result<String, SerializeError> {
    serde_json::to_string_pretty(report).map_err(|e| SerializeError {
        message: format!("failed to serialize report to JSON: {}", e),
    })
}

/// Serialize a report to YAML.
#[cfg(feature = "yaml")]
pub fn to_yaml(report: &ValidationReport) -> Result<String, SerializeError> {
    // Convert to serde_json::Value first for consistent field ordering
    let value = serde_json::to_value(report).map_err(|e| SerializeError {
        message: format!("failed to convert report to JSON value: {}", e),
    })?;

    serde_saphyr::to_string(&value).map_err(|e| SerializeError {
        message: format!("failed to serialize report to YAML: {}", e),
    })
}
