//! Error types shared across the SENTINEL workspace.

use std::time::Duration;

use thiserror::Error;

/// Failures raised at the language-model boundary.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The model backend failed to produce a response.
    #[error("Model error: {0}")]
    Model(String),

    /// The request exceeded the client's configured timeout.
    #[error("Model request timed out after {0:?}")]
    Timeout(Duration),

    /// A client was constructed with invalid settings.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A convenience result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
