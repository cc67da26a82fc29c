//! # sentinel-core
//!
//! Shared contracts for the SENTINEL compliance-monitoring stack.
//!
//! This crate sits at the root of the workspace dependency graph and defines
//! the two things every other crate agrees on:
//!
//! - [`LlmClient`] — the boundary with the language-model collaborator, a
//!   single synchronous `invoke(prompt) -> text` call
//! - [`CoreError`] — transport-level failures a client can surface
//!
//! Concrete clients live in `sentinel-model`; the RAG core in `sentinel-rag`
//! consumes the trait without knowing which backend is behind it.

mod error;
mod llm;

pub use error::{CoreError, Result};
pub use llm::LlmClient;
