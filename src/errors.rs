//! Error types for docqa
//!
//! Every failure in the retrieval-and-generation core surfaces to the
//! immediate caller as a [`RagError`]. Nothing is retried or swallowed here.

use thiserror::Error;

/// Main error type for the question-answering pipeline
#[derive(Error, Debug)]
pub enum RagError {
    /// `answer` called before any document was loaded
    #[error("No document loaded: call load() before answer()")]
    NotReady,

    /// Embedding dimension differs from the one already in use
    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Embedding capability returned the wrong number of vectors
    #[error("Embedding count mismatch: sent {expected} texts, received {actual} vectors")]
    EmbeddingCountMismatch { expected: usize, actual: usize },

    /// The embedding capability raised an error
    #[error("Embedding capability failed: {0}")]
    EmbeddingFailed(#[source] anyhow::Error),

    /// The generation capability raised an error
    #[error("Generation capability failed: {0}")]
    GenerationFailed(#[source] anyhow::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, RagError>;
