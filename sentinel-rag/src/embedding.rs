//! Embedding provider trait and the deterministic fallback embedder.

use std::hash::{DefaultHasher, Hash, Hasher};

use async_trait::async_trait;

use crate::error::{RagError, Result};

/// A provider that generates vector embeddings from text.
///
/// Implementations wrap specific embedding backends behind a unified async
/// interface. The default [`embed_batch`](EmbeddingProvider::embed_batch)
/// calls [`embed`](EmbeddingProvider::embed) sequentially; backends with
/// native batching should override it.
///
/// The same provider must be used at index-build time and query time;
/// mismatched providers silently degrade retrieval quality (dimensionality
/// mismatches are caught when loading a persisted index, model mismatches
/// are not).
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding vector for a single text input.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embedding vectors for a batch of text inputs.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.embed(text).await?);
        }
        Ok(results)
    }

    /// The dimensionality of embeddings produced by this provider.
    fn dimensions(&self) -> usize;
}

/// Scale a vector to unit L2 norm in place. Zero vectors are left unchanged.
pub fn l2_normalize(vector: &mut [f32]) {
    let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for value in vector.iter_mut() {
            *value /= norm;
        }
    }
}

/// Default dimensionality for [`HashingEmbeddingProvider`].
const DEFAULT_HASH_DIMENSIONS: usize = 256;

/// A deterministic hashed bag-of-words embedder.
///
/// Lower-cased alphanumeric tokens are hashed into a fixed number of
/// buckets and the bucket counts are L2-normalized. No model download, no
/// network, fully reproducible, which makes it the offline fallback and the
/// test vehicle. Semantic quality is far below a real embedding model.
#[derive(Debug, Clone)]
pub struct HashingEmbeddingProvider {
    dimensions: usize,
}

impl Default for HashingEmbeddingProvider {
    fn default() -> Self {
        Self { dimensions: DEFAULT_HASH_DIMENSIONS }
    }
}

impl HashingEmbeddingProvider {
    /// Create a provider with the given dimensionality.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::InvalidConfig`] if `dimensions` is zero.
    pub fn new(dimensions: usize) -> Result<Self> {
        if dimensions == 0 {
            return Err(RagError::InvalidConfig(
                "embedding dimensions must be greater than zero".to_string(),
            ));
        }
        Ok(Self { dimensions })
    }
}

#[async_trait]
impl EmbeddingProvider for HashingEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vector = vec![0.0f32; self.dimensions];

        for token in text.to_lowercase().split(|c: char| !c.is_alphanumeric()) {
            if token.is_empty() {
                continue;
            }
            let mut hasher = DefaultHasher::new();
            token.hash(&mut hasher);
            let bucket = (hasher.finish() as usize) % self.dimensions;
            vector[bucket] += 1.0;
        }

        l2_normalize(&mut vector);
        Ok(vector)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn embeddings_are_deterministic() {
        let provider = HashingEmbeddingProvider::default();
        let a = provider.embed("suspicious insider trade").await.unwrap();
        let b = provider.embed("suspicious insider trade").await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn embeddings_are_unit_length() {
        let provider = HashingEmbeddingProvider::default();
        let v = provider.embed("volume anomaly before earnings").await.unwrap();
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[tokio::test]
    async fn empty_text_embeds_to_zero_vector() {
        let provider = HashingEmbeddingProvider::default();
        let v = provider.embed("").await.unwrap();
        assert!(v.iter().all(|x| *x == 0.0));
        assert_eq!(v.len(), provider.dimensions());
    }

    #[tokio::test]
    async fn identical_token_sets_embed_identically() {
        let provider = HashingEmbeddingProvider::default();
        let a = provider.embed("BUY volume director").await.unwrap();
        let b = provider.embed("director buy VOLUME").await.unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn zero_dimensions_is_rejected() {
        assert!(matches!(HashingEmbeddingProvider::new(0), Err(RagError::InvalidConfig(_))));
    }

    #[test]
    fn normalize_leaves_zero_vector_untouched() {
        let mut v = vec![0.0f32; 4];
        l2_normalize(&mut v);
        assert!(v.iter().all(|x| *x == 0.0));
    }
}
