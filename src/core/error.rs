use std::io;
use thiserror::Error;

/// Unified error type for the chat pipeline
#[derive(Error, Debug)]
pub enum ChatError {
    /// Required completion endpoint configuration is absent
    #[error("Missing configuration: {0}")]
    ConfigMissing(String),

    /// Configuration file errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Completion endpoint failed or answered with an unexpected shape
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Statement execution errors (syntax, permission, constraint)
    #[error("Execution error: {0}")]
    Execution(String),

    /// Statement refused by the guarded statement policy
    #[error("Statement rejected: {0}")]
    StatementRejected(String),

    /// IO-related errors
    #[error("IO error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ChatError::Upstream(format!("Request timed out: {}", err))
        } else if err.is_connect() {
            ChatError::Upstream(format!("Connection failed: {}", err))
        } else if err.is_status() {
            ChatError::Upstream(format!("API returned error status: {}", err))
        } else if err.is_decode() {
            ChatError::Upstream(format!("Unexpected response body: {}", err))
        } else {
            ChatError::Upstream(format!("Request failed: {}", err))
        }
    }
}

impl From<sqlx::Error> for ChatError {
    fn from(err: sqlx::Error) -> Self {
        ChatError::Execution(err.to_string())
    }
}

impl From<serde_json::Error> for ChatError {
    fn from(err: serde_json::Error) -> Self {
        ChatError::Serialization(format!("JSON error: {}", err))
    }
}

impl From<serde_yml::Error> for ChatError {
    fn from(err: serde_yml::Error) -> Self {
        ChatError::Serialization(format!("YAML error: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, ChatError>;
