//! Query sanitization against prompt-injection payloads.
//!
//! The denylist is a defense-in-depth substring filter, not a parser; it
//! trades recall for simplicity because the grounding prompt
//! ([`crate::prompt`]) carries its own refusal instructions. Neither layer
//! is sufficient alone.

use tracing::warn;

use crate::error::{RagError, Result};

/// Substrings associated with code execution or filesystem/process access.
/// Matched case-insensitively anywhere in the query.
const FORBIDDEN_PATTERNS: &[&str] = &[
    "import ",
    "exec(",
    "eval(",
    "__import__",
    "os.",
    "sys.",
    "subprocess",
    "open(",
    "file(",
    "compile(",
];

/// Default maximum query length in characters.
pub const DEFAULT_MAX_QUERY_LENGTH: usize = 1000;

/// Validates and cleans raw query text before it reaches the language model.
///
/// Processing order: truncate to the configured maximum length (silent),
/// strip embedded NUL characters, scan the lower-cased text against the
/// denylist, trim surrounding whitespace. NUL stripping happens before the
/// denylist scan so that stripping cannot reassemble a forbidden substring.
///
/// # Example
///
/// ```rust,ignore
/// use sentinel_rag::Sanitizer;
///
/// let sanitizer = Sanitizer::default();
/// let clean = sanitizer.sanitize("What counts as insider trading?")?;
/// ```
#[derive(Debug, Clone)]
pub struct Sanitizer {
    max_length: usize,
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_QUERY_LENGTH)
    }
}

impl Sanitizer {
    /// Create a sanitizer with the given maximum query length in characters.
    pub fn new(max_length: usize) -> Self {
        Self { max_length }
    }

    /// The configured maximum query length.
    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Clean a query, or reject it.
    ///
    /// # Errors
    ///
    /// - [`RagError::ForbiddenPattern`] if a denylisted substring is found.
    ///   Only the matched pattern is logged, never the query text.
    /// - [`RagError::InvalidInput`] if the query is empty once truncated
    ///   and cleaned.
    pub fn sanitize(&self, query: &str) -> Result<String> {
        let truncated: String = query.chars().take(self.max_length).collect();
        let cleaned = truncated.replace('\0', "");

        let lowered = cleaned.to_lowercase();
        for pattern in FORBIDDEN_PATTERNS {
            if lowered.contains(pattern) {
                warn!(pattern = %pattern, "rejected query containing forbidden pattern");
                return Err(RagError::ForbiddenPattern { pattern: (*pattern).to_string() });
            }
        }

        let trimmed = cleaned.trim();
        if trimmed.is_empty() {
            return Err(RagError::InvalidInput(
                "query is empty after truncation and cleanup".to_string(),
            ));
        }

        Ok(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_query_is_returned_unchanged() {
        let sanitizer = Sanitizer::default();
        let query = "Apa itu insider trading?";
        assert_eq!(sanitizer.sanitize(query).unwrap(), query);
    }

    #[test]
    fn every_denylisted_pattern_is_rejected() {
        let sanitizer = Sanitizer::default();
        for pattern in FORBIDDEN_PATTERNS {
            let query = format!("please {pattern} something");
            let err = sanitizer.sanitize(&query).unwrap_err();
            assert!(
                matches!(&err, RagError::ForbiddenPattern { pattern: p } if p == pattern),
                "expected rejection for pattern {pattern:?}, got {err:?}"
            );
        }
    }

    #[test]
    fn denylist_match_is_case_insensitive() {
        let sanitizer = Sanitizer::default();
        let err = sanitizer.sanitize("IMPORT os and do bad things").unwrap_err();
        assert!(matches!(err, RagError::ForbiddenPattern { .. }));
    }

    #[test]
    fn code_injection_attempt_is_rejected() {
        let sanitizer = Sanitizer::default();
        let err = sanitizer.sanitize("import os; do bad things").unwrap_err();
        assert!(matches!(err, RagError::ForbiddenPattern { .. }));
    }

    #[test]
    fn truncation_is_silent_and_exact() {
        let sanitizer = Sanitizer::new(100);
        let long_query: String = "x".repeat(1000);
        let result = sanitizer.sanitize(&long_query).unwrap();
        assert_eq!(result.chars().count(), 100);
    }

    #[test]
    fn nul_bytes_are_stripped() {
        let sanitizer = Sanitizer::default();
        assert_eq!(sanitizer.sanitize("large\0 volume").unwrap(), "large volume");
    }

    #[test]
    fn nul_smuggled_pattern_is_still_rejected() {
        // Stripping NULs before the scan closes the "ex\0ec(" hole.
        let sanitizer = Sanitizer::default();
        let err = sanitizer.sanitize("ex\0ec(payload)").unwrap_err();
        assert!(matches!(err, RagError::ForbiddenPattern { .. }));
    }

    #[test]
    fn whitespace_is_trimmed() {
        let sanitizer = Sanitizer::default();
        assert_eq!(sanitizer.sanitize("  volume anomali  ").unwrap(), "volume anomali");
    }

    #[test]
    fn whitespace_only_query_is_invalid() {
        let sanitizer = Sanitizer::default();
        let err = sanitizer.sanitize("   \n\t ").unwrap_err();
        assert!(matches!(err, RagError::InvalidInput(_)));
    }

    #[test]
    fn sanitize_is_idempotent_for_accepted_queries() {
        let sanitizer = Sanitizer::default();
        for query in ["  padded question ", "plain question", "a\0b", "Transaksi BUY besar?"] {
            let once = sanitizer.sanitize(query).unwrap();
            let twice = sanitizer.sanitize(&once).unwrap();
            assert_eq!(once, twice, "sanitize not idempotent for {query:?}");
        }
    }
}
