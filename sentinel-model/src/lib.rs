//! # sentinel-model
//!
//! Language-model clients for the SENTINEL stack.
//!
//! Provides [`OllamaClient`] for a locally hosted Ollama server and
//! [`MockLlm`] for tests. Both implement [`sentinel_core::LlmClient`], so
//! the RAG core can be wired to either without code changes.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use sentinel_model::{OllamaClient, OllamaConfig};
//!
//! let client = OllamaClient::new(OllamaConfig::default())?;
//! let text = client.invoke("Why is the sky blue?").await?;
//! ```

pub mod mock;
pub mod ollama;

pub use mock::MockLlm;
pub use ollama::{OllamaClient, OllamaConfig};
