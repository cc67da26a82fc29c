//! In-memory vector store with exhaustive dot-product search.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::document::{IndexEntry, SearchResult};
use crate::error::Result;
use crate::vectorstore::VectorStore;

/// An in-memory [`VectorStore`] backed by a `Vec` in insertion order.
///
/// Entries hold unit-normalized embeddings, so similarity is a plain dot
/// product. Search is a linear scan, which is adequate for the tens of
/// thousands of chunks this prototype targets. The `tokio::sync::RwLock`
/// gives single-writer/many-readers semantics: concurrent searches share
/// the read lock, while an append takes the write lock for its whole batch
/// so readers never see a partially inserted one.
///
/// # Example
///
/// ```rust,ignore
/// use sentinel_rag::{InMemoryVectorStore, VectorStore};
///
/// let store = InMemoryVectorStore::new();
/// store.add(&entries).await?;
/// let results = store.search(&query_embedding, 5).await?;
/// ```
#[derive(Debug, Default)]
pub struct InMemoryVectorStore {
    entries: RwLock<Vec<IndexEntry>>,
}

impl InMemoryVectorStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Inner product of two vectors. Equals cosine similarity when both sides
/// are unit-normalized. Extra components on the longer side are ignored.
fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn add(&self, new_entries: &[IndexEntry]) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.extend_from_slice(new_entries);
        Ok(())
    }

    async fn search(&self, embedding: &[f32], top_k: usize) -> Result<Vec<SearchResult>> {
        let entries = self.entries.read().await;

        let mut scored: Vec<SearchResult> = entries
            .iter()
            .map(|entry| SearchResult {
                chunk: entry.chunk.clone(),
                score: dot(&entry.embedding, embedding),
            })
            .collect();

        // Stable sort: equal scores keep insertion order, earliest first.
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);
        Ok(scored)
    }

    async fn entries(&self) -> Result<Vec<IndexEntry>> {
        Ok(self.entries.read().await.clone())
    }

    async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Chunk, Metadata};

    fn entry(chunk_id: usize, embedding: Vec<f32>) -> IndexEntry {
        IndexEntry {
            chunk: Chunk {
                doc_id: 0,
                chunk_id,
                text: format!("chunk {chunk_id}"),
                metadata: Metadata::new(),
            },
            embedding,
        }
    }

    #[tokio::test]
    async fn exact_match_ranks_first() {
        let store = InMemoryVectorStore::new();
        store
            .add(&[
                entry(0, vec![1.0, 0.0, 0.0]),
                entry(1, vec![0.0, 1.0, 0.0]),
                entry(2, vec![0.0, 0.0, 1.0]),
            ])
            .await
            .unwrap();

        let results = store.search(&[0.0, 1.0, 0.0], 3).await.unwrap();
        assert_eq!(results[0].chunk.chunk_id, 1);
        assert!((results[0].score - 1.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn ties_break_by_insertion_order() {
        let store = InMemoryVectorStore::new();
        // Two entries equidistant from the query, one inserted first.
        store.add(&[entry(7, vec![1.0, 0.0]), entry(3, vec![1.0, 0.0])]).await.unwrap();

        let results = store.search(&[1.0, 0.0], 2).await.unwrap();
        assert_eq!(results[0].chunk.chunk_id, 7);
        assert_eq!(results[1].chunk.chunk_id, 3);
    }

    #[tokio::test]
    async fn top_k_bounds_result_count() {
        let store = InMemoryVectorStore::new();
        store
            .add(&[
                entry(0, vec![1.0, 0.0]),
                entry(1, vec![0.8, 0.6]),
                entry(2, vec![0.6, 0.8]),
            ])
            .await
            .unwrap();

        let results = store.search(&[1.0, 0.0], 2).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].chunk.chunk_id, 0);
    }

    #[tokio::test]
    async fn empty_store_returns_no_results() {
        let store = InMemoryVectorStore::new();
        let results = store.search(&[1.0, 0.0], 5).await.unwrap();
        assert!(results.is_empty());
        assert!(store.is_empty().await);
    }
}
