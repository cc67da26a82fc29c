//! Document chunking.
//!
//! [`RecursiveChunker`] splits text into bounded, overlapping segments,
//! preferring coarse separators (paragraph breaks) and falling back to finer
//! ones (line breaks, sentence ends, spaces) only when a window contains
//! nothing coarser. All positions are counted in characters and sliced on
//! character boundaries.

use tracing::debug;

use crate::document::{Chunk, Document, Metadata};
use crate::error::{RagError, Result};

/// Default priority-ordered separator list: paragraph break, line break,
/// sentence end, word boundary.
const DEFAULT_SEPARATORS: &[&str] = &["\n\n", "\n", ". ", " "];

/// A strategy for splitting text into chunks.
///
/// Implementations produce [`Chunk`]s with text and metadata; embeddings are
/// attached later by the index.
pub trait Chunker: Send + Sync {
    /// Split one text into chunks.
    ///
    /// Returns an empty `Vec` for empty input. Each chunk carries an
    /// incrementing `chunk_id` starting at 0, mirrored into its metadata.
    fn chunk_text(&self, text: &str, doc_id: usize, metadata: &Metadata) -> Vec<Chunk>;

    /// Split a batch of documents.
    ///
    /// Each document's position in the batch becomes its `doc_id`, merged
    /// into every resulting chunk's metadata.
    fn chunk_documents(&self, documents: &[Document]) -> Vec<Chunk> {
        let mut all_chunks = Vec::new();
        for (doc_id, document) in documents.iter().enumerate() {
            let mut metadata = document.metadata.clone();
            metadata.insert("doc_id".to_string(), doc_id.to_string());
            all_chunks.extend(self.chunk_text(&document.text, doc_id, &metadata));
        }
        debug!(
            document_count = documents.len(),
            chunk_count = all_chunks.len(),
            "chunked document batch"
        );
        all_chunks
    }
}

/// Splits text into chunks of at most `chunk_size` characters, consecutive
/// chunks sharing exactly `chunk_overlap` characters.
///
/// Each chunk's end is placed after the last occurrence of the coarsest
/// separator present in the current window; finer separators are tried only
/// when a coarser one is absent (or would not advance the split), and a
/// window with no usable separator is cut hard at `chunk_size`. The overlap
/// is taken verbatim from the previous chunk's tail, so:
///
/// - every chunk is at most `chunk_size` characters long;
/// - consecutive chunks from one text overlap by exactly `chunk_overlap`
///   characters;
/// - concatenating the first chunk with every later chunk minus its first
///   `chunk_overlap` characters reproduces the source text.
///
/// # Example
///
/// ```rust,ignore
/// use sentinel_rag::RecursiveChunker;
///
/// let chunker = RecursiveChunker::new(500, 50)?;
/// let chunks = chunker.chunk_documents(&documents);
/// ```
#[derive(Debug, Clone)]
pub struct RecursiveChunker {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Vec<String>,
}

impl RecursiveChunker {
    /// Create a chunker with the default separator list.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::InvalidConfig`] if `chunk_size` is zero or
    /// `chunk_overlap >= chunk_size` (which would make splitting degenerate
    /// or non-terminating).
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(RagError::InvalidConfig("chunk_size must be greater than zero".to_string()));
        }
        if chunk_overlap >= chunk_size {
            return Err(RagError::InvalidConfig(format!(
                "chunk_overlap ({chunk_overlap}) must be less than chunk_size ({chunk_size})"
            )));
        }
        Ok(Self {
            chunk_size,
            chunk_overlap,
            separators: DEFAULT_SEPARATORS.iter().map(|s| s.to_string()).collect(),
        })
    }

    /// Replace the priority-ordered separator list.
    pub fn with_separators(mut self, separators: Vec<String>) -> Self {
        self.separators = separators;
        self
    }

    /// Choose the end of the chunk starting at `start` (char positions).
    ///
    /// Prefers the coarsest separator whose last occurrence in the window
    /// still advances past the overlap region; a cut at or before
    /// `start + chunk_overlap` would make the next chunk start at or before
    /// this one, so such candidates are skipped.
    fn split_point(&self, text: &str, offsets: &[usize], start: usize, window_end: usize) -> usize {
        let window = &text[offsets[start]..offsets[window_end]];
        for separator in &self.separators {
            if let Some(pos) = window.rfind(separator.as_str()) {
                let end_byte = offsets[start] + pos + separator.len();
                // Separator ends on a char boundary, so the lookup is exact.
                let end = offsets.partition_point(|&b| b < end_byte);
                if end > start + self.chunk_overlap {
                    return end;
                }
            }
        }
        window_end
    }
}

impl Chunker for RecursiveChunker {
    fn chunk_text(&self, text: &str, doc_id: usize, metadata: &Metadata) -> Vec<Chunk> {
        if text.is_empty() {
            return Vec::new();
        }

        // Byte offset of each char, plus a one-past-end sentinel.
        let offsets: Vec<usize> =
            text.char_indices().map(|(i, _)| i).chain(std::iter::once(text.len())).collect();
        let total_chars = offsets.len() - 1;

        let mut chunks = Vec::new();
        let mut start = 0;
        loop {
            let window_end = (start + self.chunk_size).min(total_chars);
            let end = if window_end == total_chars {
                total_chars
            } else {
                self.split_point(text, &offsets, start, window_end)
            };

            let chunk_id = chunks.len();
            let mut chunk_metadata = metadata.clone();
            chunk_metadata.insert("chunk_id".to_string(), chunk_id.to_string());
            chunks.push(Chunk {
                doc_id,
                chunk_id,
                text: text[offsets[start]..offsets[end]].to_string(),
                metadata: chunk_metadata,
            });

            if end == total_chars {
                break;
            }
            start = end - self.chunk_overlap;
        }

        debug!(doc_id, chunk_count = chunks.len(), "chunked text");
        chunks
    }
}
