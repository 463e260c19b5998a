/// Error raised by a [`ContextStore`](crate::store::ContextStore) boundary.
///
/// Malformed inbound trace data is never reported through this type; it only
/// signals a caller reaching for a store that does not exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No request scope is active on the current task.
    OutOfScope,
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::OutOfScope => {
                write!(f, "No trace context store is active on this task")
            }
        }
    }
}

impl std::error::Error for StoreError {}

/// Error type for configuration operations.
#[derive(Debug)]
pub enum ConfigError {
    /// The value could not be converted to the requested type.
    TypeMismatch { key: String, expected: &'static str },
    /// An I/O or YAML parsing error occurred while loading config.
    Load(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::TypeMismatch { key, expected } => {
                write!(f, "Config type mismatch for '{key}': expected {expected}")
            }
            ConfigError::Load(msg) => write!(f, "Config load error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}
