//! CLI configuration management
//!
//! The config file is a registry configuration (TOML, or JSON by extension)
//! with an optional `[cli]` table for CLI defaults. Command-line flags win
//! over file values.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::cli::{errors::CliResult, output::OutputFormat};
use crate::registry::config::RegistryConfig;

/// Session file used when neither flags nor the config file name one
pub const DEFAULT_SESSION_FILE: &str = ".cachebust-session.json";

/// CLI configuration structure
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Configuration file path
    pub config_file: Option<PathBuf>,
    /// File backing the session store
    pub session_file: Option<PathBuf>,
    /// Output format
    pub output_format: OutputFormat,
    /// Quiet mode
    pub quiet: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            config_file: None,
            session_file: None,
            output_format: OutputFormat::Human,
            quiet: false,
        }
    }
}

/// `[cli]` table of the configuration file
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct CliFileConfig {
    /// Default output format
    pub output_format: Option<String>,
    /// Default session file
    pub session_file: Option<PathBuf>,
    /// Default quiet mode
    pub quiet: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
struct CliSection {
    #[serde(default)]
    cli: CliFileConfig,
}

impl CliConfig {
    /// Load configuration from file and merge with CLI options
    pub fn load_and_merge(mut self) -> CliResult<(Self, RegistryConfig)> {
        let Some(config_path) = self.config_file.clone() else {
            return Ok((self, RegistryConfig::default()));
        };

        let registry_config = RegistryConfig::from_file(&config_path)?;
        let file_config = Self::load_cli_section(&config_path)?;

        if self.output_format == OutputFormat::Human
            && let Some(format) = file_config
                .output_format
                .as_deref()
                .and_then(OutputFormat::from_name)
        {
            self.output_format = format;
        }

        if self.session_file.is_none() {
            self.session_file = file_config.session_file;
        }

        if !self.quiet {
            self.quiet = file_config.quiet.unwrap_or(false);
        }

        Ok((self, registry_config))
    }

    /// Session file to use after merging
    pub fn session_path(&self) -> PathBuf {
        self.session_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_FILE))
    }

    fn load_cli_section(path: &Path) -> CliResult<CliFileConfig> {
        let content = std::fs::read_to_string(path)?;

        let section: CliSection = if path.extension().and_then(|s| s.to_str()) == Some("json") {
            serde_json::from_str(&content)?
        } else {
            toml::from_str(&content)?
        };
        Ok(section.cli)
    }
}
