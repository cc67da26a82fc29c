//! # sentinel-rag
//!
//! Retrieval-Augmented Generation core for SENTINEL, a compliance-monitoring
//! prototype that flags potentially suspicious insider-trading activity and
//! augments findings with regulatory citations retrieved from a document
//! corpus.
//!
//! ## Overview
//!
//! The crate composes five pieces:
//!
//! - [`Sanitizer`] — validates and cleans query text before it reaches the
//!   language model
//! - [`RecursiveChunker`] — splits documents into bounded, overlapping
//!   segments along semantic boundaries
//! - [`EmbeddingIndex`] — embeds chunks and serves top-k similarity queries,
//!   with optional on-disk persistence
//! - [`AnswerGenerator`] — renders the grounded prompt and invokes the
//!   language model under a timeout
//! - [`RagPipeline`] — orchestrates sanitize → retrieve → generate and
//!   reports structured [`AnswerResult`]s
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use sentinel_rag::{
//!     Chunker, EmbeddingIndex, HashingEmbeddingProvider, RagConfig, RagPipeline,
//!     RecursiveChunker,
//! };
//!
//! let chunker = RecursiveChunker::new(500, 50)?;
//! let chunks = chunker.chunk_documents(&documents);
//!
//! let embedder = Arc::new(HashingEmbeddingProvider::default());
//! let index = Arc::new(EmbeddingIndex::build(embedder, &chunks, None).await?);
//!
//! let pipeline = RagPipeline::builder().index(index).llm(llm).build()?;
//! let result = pipeline.answer_query("Apa itu insider trading?").await;
//! ```
//!
//! Per-query failures never cross the pipeline boundary as errors; callers
//! always receive an [`AnswerResult`] with an explicit outcome. Only
//! configuration and startup defects (invalid chunking parameters, a missing
//! persisted index) propagate as [`RagError`]s.

pub mod chunking;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod generate;
pub mod index;
pub mod inmemory;
#[cfg(feature = "ollama")]
pub mod ollama;
pub mod pipeline;
pub mod prompt;
pub mod sanitize;
pub mod vectorstore;

pub use chunking::{Chunker, RecursiveChunker};
pub use config::{RagConfig, RagConfigBuilder};
pub use document::{Chunk, Document, IndexEntry, Metadata, SearchResult};
pub use embedding::{EmbeddingProvider, HashingEmbeddingProvider};
pub use error::{RagError, Result};
pub use generate::AnswerGenerator;
pub use index::EmbeddingIndex;
pub use inmemory::InMemoryVectorStore;
#[cfg(feature = "ollama")]
pub use ollama::OllamaEmbeddingProvider;
pub use pipeline::{
    AnswerResult, QueryOutcome, RagPipeline, RagPipelineBuilder, RetrievalCase, RetrievalMetrics,
};
pub use sanitize::Sanitizer;
pub use vectorstore::VectorStore;
