//! Error types for the gift matching pipeline

use thiserror::Error;

/// Errors surfaced while loading the catalog, building embeddings or
/// answering queries
#[derive(Debug, Error)]
pub enum GiftError {
    /// Malformed or missing data in the source catalog
    #[error("Catalog format error: {0}")]
    DataFormat(String),

    /// CSV reader error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Embedding model failed to load
    #[error("Model error: {0}")]
    Model(String),

    /// Embedding generation error
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Serialization error (bincode)
    #[error("Serialization error: {0}")]
    Bincode(#[from] bincode::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GiftError {
    /// Create a data format error
    pub fn data_format(msg: impl Into<String>) -> Self {
        Self::DataFormat(msg.into())
    }

    /// Create a model error
    pub fn model(msg: impl Into<String>) -> Self {
        Self::Model(msg.into())
    }

    /// Create an embedding error
    pub fn embedding(msg: impl Into<String>) -> Self {
        Self::Embedding(msg.into())
    }
}

/// Result type for gift matching operations
pub type Result<T> = std::result::Result<T, GiftError>;
