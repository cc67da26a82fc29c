//! Grounded answer generation.

use std::sync::Arc;
use std::time::Duration;

use sentinel_core::{CoreError, LlmClient};
use tracing::{debug, error};

use crate::error::{RagError, Result};
use crate::prompt;

/// Default bound on one generation call, connection included.
pub const DEFAULT_GENERATION_TIMEOUT: Duration = Duration::from_secs(120);

/// Turns retrieved context and a question into a model answer.
///
/// Renders the fixed grounded prompt and invokes the configured
/// [`LlmClient`] under a total-request timeout. The connection-establishment
/// timeout is the client's own concern. Model output is returned raw, with
/// no post-processing or fact checking.
pub struct AnswerGenerator {
    llm: Arc<dyn LlmClient>,
    timeout: Duration,
}

impl AnswerGenerator {
    /// Create a generator with the default timeout.
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm, timeout: DEFAULT_GENERATION_TIMEOUT }
    }

    /// Override the total generation timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Generate an answer to `question` grounded in `context`.
    ///
    /// # Errors
    ///
    /// - [`RagError::GenerationTimeout`] if the model does not answer within
    ///   the configured timeout (whether detected here or by the client's
    ///   own transport timeout).
    /// - [`RagError::Generation`] for any other model failure.
    pub async fn generate(&self, context: &str, question: &str) -> Result<String> {
        let rendered = prompt::render(context, question);
        debug!(model = self.llm.name(), prompt_len = rendered.len(), "invoking language model");

        match tokio::time::timeout(self.timeout, self.llm.invoke(&rendered)).await {
            Err(_) => {
                error!(model = self.llm.name(), limit = ?self.timeout, "generation timed out");
                Err(RagError::GenerationTimeout { limit: self.timeout })
            }
            Ok(Err(CoreError::Timeout(limit))) => {
                error!(model = self.llm.name(), ?limit, "model client timed out");
                Err(RagError::GenerationTimeout { limit })
            }
            Ok(Err(e)) => {
                error!(model = self.llm.name(), error = %e, "generation failed");
                Err(RagError::Generation(e.to_string()))
            }
            Ok(Ok(answer)) => Ok(answer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentinel_model::MockLlm;

    #[tokio::test]
    async fn returns_model_output_unmodified() {
        let llm = Arc::new(MockLlm::new("  raw answer, untouched  "));
        let generator = AnswerGenerator::new(llm);
        let answer = generator.generate("some context", "some question").await.unwrap();
        assert_eq!(answer, "  raw answer, untouched  ");
    }

    #[tokio::test]
    async fn prompt_carries_context_and_question() {
        let llm = Arc::new(MockLlm::new("ok"));
        let generator = AnswerGenerator::new(Arc::clone(&llm) as Arc<dyn LlmClient>);
        generator.generate("ctx-marker", "question-marker").await.unwrap();

        let prompts = llm.prompts();
        assert!(prompts[0].contains("ctx-marker"));
        assert!(prompts[0].contains("question-marker"));
    }

    #[tokio::test]
    async fn slow_model_times_out() {
        let llm = Arc::new(MockLlm::new("late").with_delay(Duration::from_secs(5)));
        let generator = AnswerGenerator::new(llm).with_timeout(Duration::from_millis(20));
        let err = generator.generate("ctx", "q").await.unwrap_err();
        assert!(matches!(err, RagError::GenerationTimeout { .. }));
    }

    #[tokio::test]
    async fn client_timeout_maps_to_generation_timeout() {
        struct TimingOut;
        #[async_trait::async_trait]
        impl LlmClient for TimingOut {
            fn name(&self) -> &str {
                "timing-out"
            }
            async fn invoke(&self, _prompt: &str) -> sentinel_core::Result<String> {
                Err(CoreError::Timeout(Duration::from_secs(120)))
            }
        }

        let generator = AnswerGenerator::new(Arc::new(TimingOut));
        let err = generator.generate("ctx", "q").await.unwrap_err();
        assert!(matches!(err, RagError::GenerationTimeout { .. }));
    }

    #[tokio::test]
    async fn model_failure_maps_to_generation_error() {
        let llm = Arc::new(MockLlm::failing("connection refused"));
        let generator = AnswerGenerator::new(llm);
        let err = generator.generate("ctx", "q").await.unwrap_err();
        assert!(matches!(err, RagError::Generation(m) if m.contains("connection refused")));
    }
}
