//! RAG pipeline orchestrator.
//!
//! [`RagPipeline`] composes the sanitizer, the embedding index, and the
//! answer generator into one query-answering operation. Per-query failures
//! are converted into structured [`AnswerResult`]s, never raised: the
//! caller (an API layer, a batch job) always receives a well-formed result
//! and decides status codes itself.
//!
//! # Example
//!
//! ```rust,ignore
//! use sentinel_rag::{RagPipeline, RagConfig};
//!
//! let pipeline = RagPipeline::builder()
//!     .config(RagConfig::default())
//!     .index(index)
//!     .llm(llm)
//!     .build()?;
//!
//! let result = pipeline.answer_query("Apa itu insider trading?").await;
//! ```

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use sentinel_core::LlmClient;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::config::RagConfig;
use crate::document::SearchResult;
use crate::error::{RagError, Result};
use crate::generate::AnswerGenerator;
use crate::index::EmbeddingIndex;
use crate::prompt::{self, REFUSAL_ANSWER};
use crate::sanitize::Sanitizer;

/// Characters of the original question kept for audit in a blocked result.
const AUDIT_QUESTION_MAX: usize = 100;

/// Bound on the error detail carried by a failed result.
const ERROR_DETAIL_MAX: usize = 200;

/// Answer used when generation fails after retrieval succeeded.
const FAILURE_ANSWER: &str =
    "An answer could not be generated for this query. The retrieved sources are included for reference.";

/// Terminal state of one pipeline call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryOutcome {
    /// The full sanitize → retrieve → generate path completed.
    Answered,
    /// The sanitizer rejected the query.
    Blocked,
    /// Retrieval or generation failed after sanitization passed.
    Failed,
}

/// The structured result of one pipeline call.
///
/// A blocked or failed query still produces a complete result: a
/// human-readable answer, an explicit [`outcome`](Self::outcome), and an
/// [`error`](Self::error) indicator the caller can branch on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerResult {
    /// The question as used for retrieval (sanitized), or the original
    /// truncated for audit when the query was blocked.
    pub question: String,
    /// The generated answer, refusal, or failure explanation.
    pub answer: String,
    /// The retrieved chunks used as grounding context, best first.
    pub sources: Vec<SearchResult>,
    /// Number of retrieved sources.
    pub num_sources: usize,
    /// Whether sanitization modified the input.
    pub sanitized: bool,
    /// Terminal state of the call.
    pub outcome: QueryOutcome,
    /// Bounded, non-sensitive failure detail; `None` on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A labelled query for retrieval evaluation.
#[derive(Debug, Clone)]
pub struct RetrievalCase {
    /// The query text.
    pub query: String,
    /// Document ids expected among the retrieved chunks.
    pub expected_doc_ids: Vec<usize>,
}

/// Aggregated retrieval-quality metrics.
#[derive(Debug, Clone, Serialize)]
pub struct RetrievalMetrics {
    /// Mean precision@k across evaluated cases.
    pub mean_precision_at_k: f64,
    /// Per-case precision@k, in case order (cases without expectations are
    /// skipped).
    pub precision_scores: Vec<f64>,
    /// Total number of cases submitted.
    pub num_queries: usize,
}

/// The RAG pipeline orchestrator. Construct via [`RagPipeline::builder()`].
pub struct RagPipeline {
    config: RagConfig,
    sanitizer: Sanitizer,
    index: Arc<EmbeddingIndex>,
    generator: AnswerGenerator,
}

impl RagPipeline {
    /// Create a new [`RagPipelineBuilder`].
    pub fn builder() -> RagPipelineBuilder {
        RagPipelineBuilder::default()
    }

    /// Return a reference to the pipeline configuration.
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Return a reference to the embedding index.
    pub fn index(&self) -> &Arc<EmbeddingIndex> {
        &self.index
    }

    /// Answer a query: sanitize → retrieve → generate.
    ///
    /// Never returns an error. A rejected query yields a
    /// [`QueryOutcome::Blocked`] result with a fixed refusal answer; a
    /// retrieval or generation failure yields [`QueryOutcome::Failed`] with
    /// a bounded error summary. Retrieval always runs against the sanitized
    /// query, and a generation failure keeps the already-retrieved sources.
    pub async fn answer_query(&self, query: &str) -> AnswerResult {
        // SANITIZE
        let sanitized_query = match self.sanitizer.sanitize(query) {
            Ok(q) => q,
            Err(e) => return Self::blocked(query, &e),
        };
        let sanitized = query != sanitized_query;

        // RETRIEVE — always on the sanitized query, never the raw one.
        let sources = match self.index.query(&sanitized_query, self.config.top_k).await {
            Ok(sources) => sources,
            Err(e) => {
                error!(error = %e, "retrieval failed");
                return Self::failed(sanitized_query, Vec::new(), sanitized, &e);
            }
        };

        // GENERATE — the index is no longer touched, so a slow model call
        // cannot block other readers.
        let context = prompt::build_context(&sources);
        match self.generator.generate(&context, &sanitized_query).await {
            Ok(answer) => {
                info!(
                    query_len = sanitized_query.len(),
                    num_sources = sources.len(),
                    answer_len = answer.len(),
                    "query answered"
                );
                AnswerResult {
                    question: sanitized_query,
                    answer,
                    num_sources: sources.len(),
                    sources,
                    sanitized,
                    outcome: QueryOutcome::Answered,
                    error: None,
                }
            }
            Err(e) => {
                error!(error = %e, num_sources = sources.len(), "generation failed");
                Self::failed(sanitized_query, sources, sanitized, &e)
            }
        }
    }

    /// Measure retrieval precision@k over labelled cases.
    ///
    /// Precision is the fraction of distinct retrieved document ids that
    /// were expected; cases with no expected ids are skipped. Unlike
    /// [`answer_query`](Self::answer_query), retrieval errors propagate
    /// here: an evaluation harness wants hard failures.
    pub async fn evaluate_retrieval(&self, cases: &[RetrievalCase]) -> Result<RetrievalMetrics> {
        let mut precision_scores = Vec::new();

        for case in cases {
            let results = self.index.query(&case.query, self.config.top_k).await?;
            if case.expected_doc_ids.is_empty() {
                continue;
            }

            let expected: HashSet<usize> = case.expected_doc_ids.iter().copied().collect();
            let retrieved: HashSet<usize> = results.iter().map(|r| r.chunk.doc_id).collect();
            if retrieved.is_empty() {
                precision_scores.push(0.0);
                continue;
            }

            let hits = expected.intersection(&retrieved).count();
            precision_scores.push(hits as f64 / retrieved.len() as f64);
        }

        let mean_precision_at_k = if precision_scores.is_empty() {
            0.0
        } else {
            precision_scores.iter().sum::<f64>() / precision_scores.len() as f64
        };

        info!(
            num_queries = cases.len(),
            mean_precision = mean_precision_at_k,
            "retrieval evaluation complete"
        );

        Ok(RetrievalMetrics { mean_precision_at_k, precision_scores, num_queries: cases.len() })
    }

    /// Build the `Blocked` result for a rejected query.
    ///
    /// Carries the original (truncated, not sanitized) question for audit.
    /// The error field stays generic; the matched pattern is only logged.
    fn blocked(query: &str, cause: &RagError) -> AnswerResult {
        let detail = match cause {
            RagError::ForbiddenPattern { .. } => "query rejected: forbidden pattern detected",
            _ => "query rejected: invalid input",
        };
        AnswerResult {
            question: truncate_for_display(query, AUDIT_QUESTION_MAX),
            answer: REFUSAL_ANSWER.to_string(),
            sources: Vec::new(),
            num_sources: 0,
            sanitized: false,
            outcome: QueryOutcome::Blocked,
            error: Some(detail.to_string()),
        }
    }

    /// Build the `Failed` result, keeping whatever retrieval produced.
    fn failed(
        question: String,
        sources: Vec<SearchResult>,
        sanitized: bool,
        cause: &RagError,
    ) -> AnswerResult {
        AnswerResult {
            question,
            answer: FAILURE_ANSWER.to_string(),
            num_sources: sources.len(),
            sources,
            sanitized,
            outcome: QueryOutcome::Failed,
            error: Some(truncate_for_display(&cause.to_string(), ERROR_DETAIL_MAX)),
        }
    }
}

/// Truncate to `max` characters, appending an ellipsis when cut.
fn truncate_for_display(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let mut truncated: String = text.chars().take(max).collect();
        truncated.push_str("...");
        truncated
    }
}

/// Builder for constructing a [`RagPipeline`].
///
/// `index` and `llm` are required; the configuration and generation
/// timeout have defaults.
#[derive(Default)]
pub struct RagPipelineBuilder {
    config: Option<RagConfig>,
    index: Option<Arc<EmbeddingIndex>>,
    llm: Option<Arc<dyn LlmClient>>,
    generation_timeout: Option<Duration>,
}

impl RagPipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedding index to retrieve from.
    pub fn index(mut self, index: Arc<EmbeddingIndex>) -> Self {
        self.index = Some(index);
        self
    }

    /// Set the language-model client used for generation.
    pub fn llm(mut self, llm: Arc<dyn LlmClient>) -> Self {
        self.llm = Some(llm);
        self
    }

    /// Override the total generation timeout.
    pub fn generation_timeout(mut self, timeout: Duration) -> Self {
        self.generation_timeout = Some(timeout);
        self
    }

    /// Build the [`RagPipeline`], validating that required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::InvalidConfig`] if `index` or `llm` is missing.
    pub fn build(self) -> Result<RagPipeline> {
        let config = self.config.unwrap_or_default();
        let index =
            self.index.ok_or_else(|| RagError::InvalidConfig("index is required".to_string()))?;
        let llm = self.llm.ok_or_else(|| RagError::InvalidConfig("llm is required".to_string()))?;

        let mut generator = AnswerGenerator::new(llm);
        if let Some(timeout) = self.generation_timeout {
            generator = generator.with_timeout(timeout);
        }

        Ok(RagPipeline {
            sanitizer: Sanitizer::new(config.max_query_length),
            config,
            index,
            generator,
        })
    }
}
