use thiserror::Error;

/// Errors raised while turning a JSON Schema into a [`crate::SchemaDocument`].
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("invalid schema document: {0}")]
    InvalidSchema(#[from] serde_json::Error),

    #[error("undefined schema reference: {reference}")]
    UndefinedReference { reference: String },

    #[error("unsupported schema reference '{reference}': only local references are supported")]
    UnsupportedReference { reference: String },

    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("circular schema reference through '{reference}'")]
    CircularReference { reference: String },
}
