//! Error types for the plant assistant.
//!
//! Reply generation itself cannot fail; these cover setup (loading the
//! knowledge asset) and session bookkeeping.

use greenora_core::error::GreenoraError;

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("failed to load knowledge asset: {0}")]
    KnowledgeLoad(String),
    #[error("invalid knowledge asset: {0}")]
    InvalidKnowledge(String),
    #[error("session not found: {0}")]
    SessionNotFound(uuid::Uuid),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<std::io::Error> for ChatError {
    fn from(err: std::io::Error) -> Self {
        ChatError::KnowledgeLoad(err.to_string())
    }
}

impl From<toml::de::Error> for ChatError {
    fn from(err: toml::de::Error) -> Self {
        ChatError::KnowledgeLoad(err.to_string())
    }
}

impl From<serde_json::Error> for ChatError {
    fn from(err: serde_json::Error) -> Self {
        ChatError::KnowledgeLoad(err.to_string())
    }
}

impl From<ChatError> for GreenoraError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::KnowledgeLoad(_) | ChatError::InvalidKnowledge(_) => {
                GreenoraError::Knowledge(err.to_string())
            }
            other => GreenoraError::Api(other.to_string()),
        }
    }
}
