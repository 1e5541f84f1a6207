use thiserror::Error;

/// Top-level error type for Greenora.
///
/// Subsystem crates define their own error types and implement
/// `From<SubsystemError> for GreenoraError` where they need to cross crate
/// boundaries with `?`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GreenoraError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Knowledge base error: {0}")]
    Knowledge(String),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for GreenoraError {
    fn from(err: toml::de::Error) -> Self {
        GreenoraError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for GreenoraError {
    fn from(err: toml::ser::Error) -> Self {
        GreenoraError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for GreenoraError {
    fn from(err: serde_json::Error) -> Self {
        GreenoraError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Greenora operations.
pub type Result<T> = std::result::Result<T, GreenoraError>;
