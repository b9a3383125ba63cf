//! Engine configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::domain::name::DEFAULT_MAX_NAME_LEN;
use crate::domain::{Result, SpindleError};

/// Tunables shared by every queue of a registry.
///
/// Every field has a default, so `{}` is a valid configuration document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Entries fetched per store round-trip while listing a queue.
    pub list_page_size: usize,

    /// Longest accepted queue name, in bytes.
    pub max_queue_name_len: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            list_page_size: 1024,
            max_queue_name_len: DEFAULT_MAX_NAME_LEN,
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(raw).map_err(|e| SpindleError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| SpindleError::Config(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<()> {
        if self.list_page_size == 0 {
            return Err(SpindleError::Config(
                "list_page_size must be at least 1".to_string(),
            ));
        }
        if self.max_queue_name_len == 0 {
            return Err(SpindleError::Config(
                "max_queue_name_len must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        assert_eq!(
            EngineConfig::from_json_str("{}").unwrap(),
            EngineConfig::default()
        );
    }

    #[test]
    fn partial_document_overrides_only_given_fields() {
        let config = EngineConfig::from_json_str(r#"{"list_page_size": 16}"#).unwrap();
        assert_eq!(config.list_page_size, 16);
        assert_eq!(config.max_queue_name_len, DEFAULT_MAX_NAME_LEN);
    }

    #[test]
    fn unknown_fields_and_zero_sizes_are_rejected() {
        assert!(matches!(
            EngineConfig::from_json_str(r#"{"page": 3}"#),
            Err(SpindleError::Config(_))
        ));
        assert!(matches!(
            EngineConfig::from_json_str(r#"{"list_page_size": 0}"#),
            Err(SpindleError::Config(_))
        ));
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let err = EngineConfig::from_path("/nonexistent/spindle.json").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/spindle.json"));
    }
}
