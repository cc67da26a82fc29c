//! Vector store trait for storing and searching embeddings.

use async_trait::async_trait;

use crate::document::{IndexEntry, SearchResult};
use crate::error::Result;

/// A storage backend for ([`Chunk`](crate::Chunk), embedding) pairs.
///
/// Stores grow append-only and preserve insertion order, which is the
/// tie-breaking order for equal similarity scores. The trait is the seam
/// for swapping the exhaustive in-memory scan for an approximate
/// nearest-neighbor structure later; nothing in the index or pipeline
/// assumes linear search.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Append entries to the store.
    ///
    /// The whole batch becomes visible to readers atomically; a concurrent
    /// search never observes part of it.
    async fn add(&self, entries: &[IndexEntry]) -> Result<()>;

    /// Return the `top_k` entries most similar to `embedding`.
    ///
    /// Results are ordered by descending score; ties keep insertion order,
    /// earliest first. Both sides are expected to be unit-normalized.
    async fn search(&self, embedding: &[f32], top_k: usize) -> Result<Vec<SearchResult>>;

    /// A snapshot of all entries in insertion order.
    async fn entries(&self) -> Result<Vec<IndexEntry>>;

    /// Number of stored entries.
    async fn len(&self) -> usize;

    /// Whether the store holds no entries.
    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
