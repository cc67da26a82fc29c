//! Property tests for chunker invariants.

use proptest::prelude::*;
use sentinel_rag::chunking::{Chunker, RecursiveChunker};
use sentinel_rag::document::Metadata;

/// Generate a (chunk_size, chunk_overlap) pair with overlap < size.
fn arb_chunk_params() -> impl Strategy<Value = (usize, usize)> {
    (2usize..60).prop_flat_map(|size| (Just(size), 0usize..size))
}

/// Text mixing words, sentence ends, line and paragraph breaks.
fn arb_text() -> impl Strategy<Value = String> {
    "[a-z]{0,6}( |\\. |\n|\n\n)?[a-z ]{0,40}(\\. [a-z ]{0,40}){0,3}(\n\n[a-z ]{0,40})?"
}

fn chars(s: &str) -> Vec<char> {
    s.chars().collect()
}

/// **Chunk size bound**: no chunk is ever longer than `chunk_size`
/// characters, whatever separators the text contains.
mod prop_size_bound {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn chunks_never_exceed_chunk_size(
            text in arb_text(),
            (size, overlap) in arb_chunk_params(),
        ) {
            let chunker = RecursiveChunker::new(size, overlap).unwrap();
            for chunk in chunker.chunk_text(&text, 0, &Metadata::new()) {
                prop_assert!(
                    chunk.text.chars().count() <= size,
                    "chunk of {} chars exceeds chunk_size {}",
                    chunk.text.chars().count(),
                    size,
                );
            }
        }
    }
}

/// **Chunk coverage**: the first chunk plus every later chunk minus its
/// leading overlap reproduces the source text exactly.
mod prop_coverage {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn concatenated_chunks_reproduce_the_text(
            text in arb_text(),
            (size, overlap) in arb_chunk_params(),
        ) {
            let chunker = RecursiveChunker::new(size, overlap).unwrap();
            let chunks = chunker.chunk_text(&text, 0, &Metadata::new());

            let mut rebuilt = String::new();
            for (i, chunk) in chunks.iter().enumerate() {
                if i == 0 {
                    rebuilt.push_str(&chunk.text);
                } else {
                    rebuilt.extend(chunk.text.chars().skip(overlap));
                }
            }
            prop_assert_eq!(rebuilt, text);
        }
    }
}

/// **Overlap invariant**: consecutive chunks share exactly `chunk_overlap`
/// characters, the tail of one being the head of the next.
mod prop_overlap {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn consecutive_chunks_share_exact_overlap(
            text in arb_text(),
            (size, overlap) in arb_chunk_params(),
        ) {
            let chunker = RecursiveChunker::new(size, overlap).unwrap();
            let chunks = chunker.chunk_text(&text, 0, &Metadata::new());

            for window in chunks.windows(2) {
                let prev = chars(&window[0].text);
                let next = chars(&window[1].text);
                prop_assert!(prev.len() >= overlap);
                prop_assert!(next.len() >= overlap);
                prop_assert_eq!(
                    &prev[prev.len() - overlap..],
                    &next[..overlap],
                    "overlap mismatch between chunk {} and {}",
                    window[0].chunk_id,
                    window[1].chunk_id,
                );
            }
        }
    }
}

/// **Determinism**: chunking is a pure function of its inputs.
mod prop_determinism {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn chunking_is_deterministic(
            text in arb_text(),
            (size, overlap) in arb_chunk_params(),
        ) {
            let chunker = RecursiveChunker::new(size, overlap).unwrap();
            let first = chunker.chunk_text(&text, 0, &Metadata::new());
            let second = chunker.chunk_text(&text, 0, &Metadata::new());
            prop_assert_eq!(first, second);
        }
    }
}

/// The worked example from the synthetic-transaction corpus: a short
/// Indonesian transaction summary at chunk_size 20 / overlap 5.
#[test]
fn transaction_summary_chunks_with_exact_overlap() {
    let text = "Transaksi BUY oleh Direktur. Volume besar.";
    let chunker = RecursiveChunker::new(20, 5).unwrap();
    let chunks = chunker.chunk_text(text, 0, &Metadata::new());

    assert_eq!(chunks.len(), 3);
    for chunk in &chunks {
        assert!(chunk.text.chars().count() <= 20);
    }
    for window in chunks.windows(2) {
        let prev = chars(&window[0].text);
        let next = chars(&window[1].text);
        assert_eq!(&prev[prev.len() - 5..], &next[..5]);
    }

    // Non-overlapping portions reassemble the original text.
    let mut rebuilt = chunks[0].text.clone();
    for chunk in &chunks[1..] {
        rebuilt.extend(chunk.text.chars().skip(5));
    }
    assert_eq!(rebuilt, text);
}
