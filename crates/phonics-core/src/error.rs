// Error types for content generation

use thiserror::Error;

/// Result type alias for generation operations
pub type Result<T> = std::result::Result<T, GenerationError>;

/// Errors that can occur while generating stories or feedback
#[derive(Debug, Error)]
pub enum GenerationError {
    /// LLM provider error (transport, quota, malformed response)
    #[error("LLM error: {0}")]
    Llm(String),

    /// The request cannot be turned into a prompt
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl GenerationError {
    /// Create an LLM error
    pub fn llm(msg: impl Into<String>) -> Self {
        GenerationError::Llm(msg.into())
    }

    /// Create an invalid request error
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        GenerationError::InvalidRequest(msg.into())
    }

    /// Message without the variant prefix, as shown to API clients
    pub fn detail(&self) -> String {
        match self {
            GenerationError::Llm(msg) | GenerationError::InvalidRequest(msg) => msg.clone(),
            GenerationError::Internal(e) => format!("{:#}", e),
        }
    }
}
