use thiserror::Error;

/// Top-level error type for the Loupe system.
///
/// Subsystem crates define their own error types and implement
/// `From<SubsystemError> for LoupeError` where they need to cross crate
/// boundaries with the `?` operator.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoupeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for LoupeError {
    fn from(err: toml::de::Error) -> Self {
        LoupeError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for LoupeError {
    fn from(err: toml::ser::Error) -> Self {
        LoupeError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for LoupeError {
    fn from(err: serde_json::Error) -> Self {
        LoupeError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Loupe operations.
pub type Result<T> = std::result::Result<T, LoupeError>;
