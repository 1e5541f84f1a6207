use greenora_core::error::GreenoraError;
use reqwest::StatusCode;
use thiserror::Error;

/// Backend client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection, timeout or body decoding failure.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The backend answered `success: false`.
    #[error("backend rejected request: {0}")]
    Application(String),

    #[error("unexpected status {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// The configured backend URL cannot carry endpoint paths.
    #[error("invalid backend url: {0}")]
    InvalidUrl(String),

    /// Caller input failed local checks; nothing was sent.
    #[error("validation failed: {0}")]
    Validation(String),
}

impl From<ClientError> for GreenoraError {
    fn from(err: ClientError) -> Self {
        GreenoraError::Backend(err.to_string())
    }
}
