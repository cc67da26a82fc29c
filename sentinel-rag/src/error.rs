//! Error types for the `sentinel-rag` crate.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Errors that can occur in RAG operations.
///
/// Per-request failures (`InvalidInput`, `ForbiddenPattern`,
/// `GenerationTimeout`, `Generation`) are recovered by the pipeline into
/// structured [`AnswerResult`](crate::AnswerResult)s. Configuration-time
/// failures (`InvalidConfig`, `IndexNotFound`) propagate to the caller,
/// since they indicate a deployment defect rather than a bad query.
#[derive(Debug, Error)]
pub enum RagError {
    /// Malformed input to the sanitizer (empty once truncated and cleaned).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The query contained a denylisted substring.
    #[error("Query contains forbidden pattern '{pattern}'")]
    ForbiddenPattern {
        /// The denylist entry that matched.
        pattern: String,
    },

    /// A component was configured with inconsistent parameters.
    #[error("Configuration error: {0}")]
    InvalidConfig(String),

    /// A persisted index is absent or cannot be decoded.
    #[error("Index not found at {path}: {message}")]
    IndexNotFound {
        /// The persist location that was probed.
        path: PathBuf,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred during embedding generation.
    #[error("Embedding error ({provider}): {message}")]
    Embedding {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred in the vector store backend.
    #[error("Vector store error ({backend}): {message}")]
    VectorStore {
        /// The vector store backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// Answer generation exceeded its time budget.
    #[error("Answer generation timed out after {limit:?}")]
    GenerationTimeout {
        /// The timeout that elapsed.
        limit: Duration,
    },

    /// The language model failed to produce an answer.
    #[error("Answer generation failed: {0}")]
    Generation(String),

    /// An error in pipeline orchestration or persistence.
    #[error("Pipeline error: {0}")]
    Pipeline(String),
}

/// A convenience result type for RAG operations.
pub type Result<T> = std::result::Result<T, RagError>;
