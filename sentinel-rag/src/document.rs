//! Data types for documents, chunks, and retrieval results.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Key-value metadata carried by documents and their chunks.
pub type Metadata = HashMap<String, String>;

/// A caller-owned unit of source text.
///
/// Documents have no intrinsic identifier; when a batch is chunked, each
/// document's position in the batch becomes its `doc_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// The text content of the document.
    pub text: String,
    /// Key-value metadata (origin, category, identifiers).
    pub metadata: Metadata,
}

impl Document {
    /// Create a document with empty metadata.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), metadata: Metadata::new() }
    }

    /// Attach metadata to the document.
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }
}

/// A bounded segment of a [`Document`]'s text.
///
/// Immutable once created. `doc_id` and `chunk_id` are also mirrored into
/// `metadata` as strings so consumers that only see metadata can still
/// attribute a chunk to its source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// Position of the originating document in its batch.
    pub doc_id: usize,
    /// Sequential index of this chunk within its source text, starting at 0.
    pub chunk_id: usize,
    /// The chunk text.
    pub text: String,
    /// The parent document's metadata merged with chunk-specific fields.
    pub metadata: Metadata,
}

/// A stored ([`Chunk`], embedding) pair.
///
/// Embeddings are unit-normalized at index-build time, so similarity
/// ranking reduces to a dot product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndexEntry {
    /// The chunk this entry indexes.
    pub chunk: Chunk,
    /// The L2-normalized embedding of the chunk text.
    pub embedding: Vec<f32>,
}

/// A retrieved [`Chunk`] paired with its similarity score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// The retrieved chunk.
    pub chunk: Chunk,
    /// Cosine similarity to the query (higher is more relevant).
    pub score: f32,
}
