//! Error types for the business health chat

use thiserror::Error;

/// Result type alias for chat operations
pub type Result<T> = std::result::Result<T, ChatError>;

#[derive(Error, Debug)]
pub enum ChatError {

    // =============================
    // Domain Errors
    // =============================

    #[error("Invalid number for {field}: '{value}'")]
    InvalidNumber { field: String, value: String },

    #[error("Negative amount for {field}: {value}")]
    NegativeAmount { field: String, value: f64 },

    #[error("Store error: {0}")]
    StoreError(String),

    #[error("Lexicon error: {0}")]
    LexiconError(String),

    #[error("Embedding error: {0}")]
    EmbeddingError(String),

    // =============================
    // External Library Conversions
    // =============================

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
