//! The embedding index: chunks, their vectors, and optional persistence.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::document::{Chunk, IndexEntry, SearchResult};
use crate::embedding::{EmbeddingProvider, l2_normalize};
use crate::error::{RagError, Result};
use crate::inmemory::InMemoryVectorStore;
use crate::vectorstore::VectorStore;

/// Number of chunks embedded per provider call during a build.
const EMBED_BATCH_SIZE: usize = 64;

/// File name of the snapshot inside a persist directory.
const SNAPSHOT_FILE: &str = "index.json";

/// The serialized form of an index.
#[derive(Serialize, Deserialize)]
struct IndexSnapshot {
    dimensions: usize,
    entries: Vec<IndexEntry>,
}

/// An ordered collection of ([`Chunk`], embedding) pairs with top-k
/// similarity query.
///
/// Built once over a chunked corpus, optionally persisted as a JSON
/// snapshot, and queried read-only afterwards; [`append`](Self::append)
/// supports append-only growth without rebuilding existing entries.
/// Queries must use the same embedding provider the index was built with.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use sentinel_rag::{EmbeddingIndex, HashingEmbeddingProvider};
///
/// let embedder = Arc::new(HashingEmbeddingProvider::default());
/// let index = EmbeddingIndex::build(embedder, &chunks, Some(path)).await?;
/// let results = index.query("unusual volume before earnings", 5).await?;
/// ```
pub struct EmbeddingIndex {
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
    persist_dir: Option<PathBuf>,
}

impl std::fmt::Debug for EmbeddingIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingIndex")
            .field("persist_dir", &self.persist_dir)
            .finish_non_exhaustive()
    }
}

impl EmbeddingIndex {
    /// Create an empty index over a caller-supplied store.
    ///
    /// This is the constructor to use when swapping in a different
    /// [`VectorStore`] backend; [`build`](Self::build) and
    /// [`load`](Self::load) default to [`InMemoryVectorStore`].
    pub fn with_store(
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStore>,
        persist_dir: Option<&Path>,
    ) -> Self {
        Self { embedder, store, persist_dir: persist_dir.map(PathBuf::from) }
    }

    /// Embed every chunk and build a fresh index.
    ///
    /// When `persist_dir` is given, the index is written there (intermediate
    /// directories are created as needed) so it can be reloaded with
    /// [`load`](Self::load) after a restart.
    ///
    /// # Errors
    ///
    /// Returns an embedding error if the provider fails, or
    /// [`RagError::Pipeline`] if the snapshot cannot be written.
    pub async fn build(
        embedder: Arc<dyn EmbeddingProvider>,
        chunks: &[Chunk],
        persist_dir: Option<&Path>,
    ) -> Result<Self> {
        let index = Self::with_store(embedder, Arc::new(InMemoryVectorStore::new()), persist_dir);

        let entries = index.embed_chunks(chunks).await?;
        index.store.add(&entries).await?;
        if index.persist_dir.is_some() {
            index.persist().await?;
        }

        info!(chunk_count = chunks.len(), persisted = index.persist_dir.is_some(), "built index");
        Ok(index)
    }

    /// Reload a previously persisted index.
    ///
    /// # Errors
    ///
    /// - [`RagError::IndexNotFound`] if the snapshot is absent or cannot be
    ///   decoded.
    /// - [`RagError::InvalidConfig`] if the snapshot's dimensionality does
    ///   not match the supplied embedder (a deployment defect: the index
    ///   was built with a different model).
    pub async fn load(persist_dir: &Path, embedder: Arc<dyn EmbeddingProvider>) -> Result<Self> {
        let snapshot_path = persist_dir.join(SNAPSHOT_FILE);

        let bytes = std::fs::read(&snapshot_path).map_err(|e| RagError::IndexNotFound {
            path: persist_dir.to_path_buf(),
            message: e.to_string(),
        })?;

        let snapshot: IndexSnapshot =
            serde_json::from_slice(&bytes).map_err(|e| RagError::IndexNotFound {
                path: persist_dir.to_path_buf(),
                message: format!("corrupt snapshot: {e}"),
            })?;

        if snapshot.dimensions != embedder.dimensions() {
            return Err(RagError::InvalidConfig(format!(
                "snapshot dimensionality ({}) does not match embedder ({})",
                snapshot.dimensions,
                embedder.dimensions()
            )));
        }

        let store = InMemoryVectorStore::new();
        store.add(&snapshot.entries).await?;

        info!(
            path = %persist_dir.display(),
            entry_count = snapshot.entries.len(),
            "loaded index from snapshot"
        );

        Ok(Self::with_store(embedder, Arc::new(store), Some(persist_dir)))
    }

    /// Embed and append new chunks without touching existing entries.
    ///
    /// Rewrites the snapshot when persistence is configured.
    pub async fn append(&self, chunks: &[Chunk]) -> Result<()> {
        if chunks.is_empty() {
            return Ok(());
        }

        let entries = self.embed_chunks(chunks).await?;
        self.store.add(&entries).await?;
        if self.persist_dir.is_some() {
            self.persist().await?;
        }

        info!(chunk_count = chunks.len(), "appended chunks to index");
        Ok(())
    }

    /// Return the `top_k` chunks most similar to `text`.
    ///
    /// The query is embedded with the index's own provider and normalized,
    /// so ranking by cosine similarity reduces to the store's dot-product
    /// search. Ties break by insertion order, earliest first.
    pub async fn query(&self, text: &str, top_k: usize) -> Result<Vec<SearchResult>> {
        let mut embedding = self.embedder.embed(text).await?;
        l2_normalize(&mut embedding);

        let results = self.store.search(&embedding, top_k).await?;
        debug!(result_count = results.len(), "index query completed");
        Ok(results)
    }

    /// Write the current entries to the configured persist directory.
    /// No-op when persistence is not configured.
    pub async fn persist(&self) -> Result<()> {
        let Some(dir) = &self.persist_dir else {
            return Ok(());
        };

        std::fs::create_dir_all(dir).map_err(|e| {
            RagError::Pipeline(format!("failed to create persist directory: {e}"))
        })?;

        let snapshot = IndexSnapshot {
            dimensions: self.embedder.dimensions(),
            entries: self.store.entries().await?,
        };
        let bytes = serde_json::to_vec(&snapshot)
            .map_err(|e| RagError::Pipeline(format!("failed to encode snapshot: {e}")))?;

        std::fs::write(dir.join(SNAPSHOT_FILE), bytes)
            .map_err(|e| RagError::Pipeline(format!("failed to write snapshot: {e}")))?;

        debug!(path = %dir.display(), entry_count = snapshot.entries.len(), "persisted snapshot");
        Ok(())
    }

    /// Number of indexed chunks.
    pub async fn len(&self) -> usize {
        self.store.len().await
    }

    /// Whether the index holds no chunks.
    pub async fn is_empty(&self) -> bool {
        self.store.is_empty().await
    }

    /// The embedding provider this index was built with.
    pub fn embedder(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.embedder
    }

    /// The underlying vector store.
    pub fn store(&self) -> &Arc<dyn VectorStore> {
        &self.store
    }

    /// Embed chunk texts in batches and pair them with their chunks.
    async fn embed_chunks(&self, chunks: &[Chunk]) -> Result<Vec<IndexEntry>> {
        let mut entries = Vec::with_capacity(chunks.len());
        for batch in chunks.chunks(EMBED_BATCH_SIZE) {
            let texts: Vec<&str> = batch.iter().map(|c| c.text.as_str()).collect();
            let embeddings = self.embedder.embed_batch(&texts).await?;

            for (chunk, mut embedding) in batch.iter().cloned().zip(embeddings) {
                l2_normalize(&mut embedding);
                entries.push(IndexEntry { chunk, embedding });
            }
        }
        Ok(entries)
    }
}
