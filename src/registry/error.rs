//! Registry error types
//!
//! Only `UnknownAction` ever reaches callers of the dispatch path. Storage and
//! serialization failures are produced by the session-store plumbing and are
//! swallowed by the best-effort persistence helper before they can escape.

/// Error produced by registry operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Action identifier absent from the dispatch table
    UnknownAction(String),
    /// Configuration rejected by validation
    InvalidConfiguration(String),
    /// Session storage read or write failed
    StorageError(String),
    /// JSON/TOML encode or decode failed
    SerializationError(String),
    /// Filesystem I/O failed
    Io(String),
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::UnknownAction(action) => {
                write!(f, "Unknown cache invalidation action: {}", action)
            }
            RegistryError::InvalidConfiguration(msg) => {
                write!(f, "Invalid configuration: {}", msg)
            }
            RegistryError::StorageError(msg) => write!(f, "Storage error: {}", msg),
            RegistryError::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            RegistryError::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for RegistryError {}

impl RegistryError {
    /// Create unknown action error
    #[inline]
    pub fn unknown_action(action: impl Into<String>) -> Self {
        Self::UnknownAction(action.into())
    }

    /// Create configuration error
    #[inline]
    pub fn invalid_configuration(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    /// Create storage error
    #[inline]
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::StorageError(msg.into())
    }

    /// Create serialization error
    #[inline]
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::SerializationError(msg.into())
    }

    /// Error code for programmatic handling
    pub fn code(&self) -> u32 {
        match self {
            Self::UnknownAction(_) => 1001,
            Self::InvalidConfiguration(_) => 2001,
            Self::StorageError(_) => 3001,
            Self::SerializationError(_) => 3002,
            Self::Io(_) => 3003,
        }
    }

    /// Whether the failure can be absorbed locally without surfacing to the caller
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::StorageError(_) | Self::SerializationError(_) | Self::Io(_)
        )
    }
}

impl From<std::io::Error> for RegistryError {
    fn from(error: std::io::Error) -> Self {
        RegistryError::Io(error.to_string())
    }
}

impl From<serde_json::Error> for RegistryError {
    fn from(error: serde_json::Error) -> Self {
        RegistryError::SerializationError(error.to_string())
    }
}

impl From<toml::de::Error> for RegistryError {
    fn from(error: toml::de::Error) -> Self {
        RegistryError::SerializationError(error.to_string())
    }
}

/// Result alias for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;
