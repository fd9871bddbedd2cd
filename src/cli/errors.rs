//! CLI-specific error handling
//!
//! Maps registry errors and the CLI's own I/O and parsing failures to
//! user-facing messages and exit codes.

use std::fmt;

use crate::registry::error::RegistryError;

/// CLI-specific error type
#[derive(Debug)]
pub enum CliError {
    /// Registry operation error
    Registry(RegistryError),
    /// Input/output error
    IoError(std::io::Error),
    /// JSON parsing error
    JsonError(serde_json::Error),
    /// TOML parsing error
    TomlError(toml::de::Error),
    /// Invalid argument error
    ArgumentError(String),
}

impl CliError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Registry(RegistryError::UnknownAction(_)) => 2,
            CliError::ArgumentError(_) => 2,
            CliError::Registry(RegistryError::InvalidConfiguration(_))
            | CliError::TomlError(_) => 3,
            _ => 1,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Registry(e) => write!(f, "{}", e),
            CliError::IoError(e) => write!(f, "I/O error: {}", e),
            CliError::JsonError(e) => write!(f, "JSON error: {}", e),
            CliError::TomlError(e) => write!(f, "TOML error: {}", e),
            CliError::ArgumentError(msg) => write!(f, "Argument error: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Registry(e) => Some(e),
            CliError::IoError(e) => Some(e),
            CliError::JsonError(e) => Some(e),
            CliError::TomlError(e) => Some(e),
            CliError::ArgumentError(_) => None,
        }
    }
}

impl From<RegistryError> for CliError {
    fn from(error: RegistryError) -> Self {
        CliError::Registry(error)
    }
}

impl From<std::io::Error> for CliError {
    fn from(error: std::io::Error) -> Self {
        CliError::IoError(error)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(error: serde_json::Error) -> Self {
        CliError::JsonError(error)
    }
}

impl From<toml::de::Error> for CliError {
    fn from(error: toml::de::Error) -> Self {
        CliError::TomlError(error)
    }
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let unknown: CliError = RegistryError::unknown_action("x:y").into();
        assert_eq!(unknown.exit_code(), 2);
        let config: CliError = RegistryError::invalid_configuration("bad").into();
        assert_eq!(config.exit_code(), 3);
        let io: CliError = std::io::Error::other("disk").into();
        assert_eq!(io.exit_code(), 1);
    }
}
