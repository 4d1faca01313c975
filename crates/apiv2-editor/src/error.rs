//! Error types for the example presenter

use apiv2_schema::SchemaError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("Unknown example `{request}` (available: {})", available.join(", "))]
    UnknownExample {
        request: String,
        available: Vec<String>,
    },

    #[error("Invalid schema registered under {uri}: {source}")]
    Schema {
        uri: String,
        #[source]
        source: SchemaError,
    },

    #[error("Invalid example table: {0}")]
    InvalidExampleTable(String),

    #[error("Invalid fileMatch pattern `{pattern}`: {source}")]
    InvalidFileMatch {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("Failed to serialize editor state: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type for presenter operations
pub type Result<T> = std::result::Result<T, EditorError>;
