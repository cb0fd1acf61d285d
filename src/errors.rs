//! Error types for emobuddy
//!
//! One crate-wide error enum with context-carrying variants. Unknown
//! emotions and languages are never errors: they normalize at the edges.

use thiserror::Error;

/// Main error type for the emobuddy agent
#[derive(Error, Debug)]
pub enum AgentError {
    /// Pattern store (SQLite) errors
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// Stored data that no longer matches the expected layout
    #[error("Corrupt record in {table}: {reason}")]
    CorruptRecord { table: String, reason: String },

    /// Streaming errors
    #[error("Streaming error: {0}")]
    StreamingError(String),

    /// JSON parsing errors
    #[error("JSON parse error: {0}")]
    JsonParseError(String),

    /// Ollama API errors
    #[error("Ollama API error: {0}")]
    OllamaApiError(String),

    /// HTTP client errors
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Timeout errors
    #[error("Operation timed out after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// Generic errors with context
    #[error("Agent error: {0}")]
    Generic(String),
}

/// Result type alias for agent operations
pub type Result<T> = std::result::Result<T, AgentError>;

/// Convert anyhow errors to AgentError
impl From<anyhow::Error> for AgentError {
    fn from(err: anyhow::Error) -> Self {
        AgentError::Generic(err.to_string())
    }
}

impl AgentError {
    /// True for lock contention that goes away on its own
    /// (another writer holding the database).
    pub fn is_busy(&self) -> bool {
        match self {
            AgentError::Storage(rusqlite::Error::SqliteFailure(err, _)) => matches!(
                err.code,
                rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked
            ),
            _ => false,
        }
    }
}
