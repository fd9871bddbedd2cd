//! Registry configuration
//!
//! Loaded from TOML or JSON (chosen by file extension) and overridable through
//! the builder.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::audit::{AUDIT_LOG_CAPACITY, DEFAULT_PERSISTED_EVENTS, DEFAULT_STORAGE_KEY};
use super::error::{RegistryError, RegistryResult};
use super::visibility::StalenessThresholds;

/// Development builds fail fast on unknown actions; production builds warn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    Development,
    Production,
}

impl Default for BuildMode {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            BuildMode::Development
        } else {
            BuildMode::Production
        }
    }
}

/// Registry configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub build_mode: BuildMode,
    /// Trailing audit events mirrored to session storage
    pub persisted_events: usize,
    /// Session key holding the persisted audit tail
    pub storage_key: String,
    /// Log every dispatch at info level
    pub debug: bool,
    /// Merge the persisted audit tail when the registry is built
    pub restore_audit_on_start: bool,
    pub thresholds: StalenessThresholds,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            build_mode: BuildMode::default(),
            persisted_events: DEFAULT_PERSISTED_EVENTS,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            debug: false,
            restore_audit_on_start: false,
            thresholds: StalenessThresholds::default(),
        }
    }
}

impl RegistryConfig {
    pub fn validate(&self) -> RegistryResult<()> {
        self.thresholds.validate()?;
        if self.persisted_events > AUDIT_LOG_CAPACITY {
            return Err(RegistryError::invalid_configuration(format!(
                "persisted_events ({}) exceeds audit capacity ({})",
                self.persisted_events, AUDIT_LOG_CAPACITY
            )));
        }
        if self.storage_key.trim().is_empty() {
            return Err(RegistryError::invalid_configuration(
                "storage_key must not be empty",
            ));
        }
        Ok(())
    }

    pub fn from_toml_str(content: &str) -> RegistryResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(content: &str) -> RegistryResult<Self> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a `.json` file, or TOML for any other extension
    pub fn from_file(path: impl AsRef<Path>) -> RegistryResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        if path.extension().and_then(|s| s.to_str()) == Some("json") {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        }
    }

    pub fn to_toml_string(&self) -> RegistryResult<String> {
        toml::to_string_pretty(self).map_err(|e| RegistryError::serialization(e.to_string()))
    }
}
