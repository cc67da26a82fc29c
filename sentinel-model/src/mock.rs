//! Mock LLM for testing.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use sentinel_core::{CoreError, LlmClient, Result};

/// A scripted [`LlmClient`] for tests.
///
/// Returns a canned reply, fails with a fixed error, or sleeps before
/// responding to exercise timeout handling. Prompts passed to
/// [`invoke`](LlmClient::invoke) are recorded and can be inspected with
/// [`prompts`](MockLlm::prompts).
///
/// # Example
///
/// ```rust,ignore
/// use sentinel_model::MockLlm;
///
/// let llm = MockLlm::new("the answer is 42");
/// assert_eq!(llm.invoke("anything").await.unwrap(), "the answer is 42");
/// ```
pub struct MockLlm {
    reply: String,
    failure: Option<String>,
    delay: Option<Duration>,
    prompts: Mutex<Vec<String>>,
}

impl MockLlm {
    /// A mock that always returns `reply`.
    pub fn new(reply: impl Into<String>) -> Self {
        Self { reply: reply.into(), failure: None, delay: None, prompts: Mutex::new(Vec::new()) }
    }

    /// A mock that always fails with a model error carrying `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            reply: String::new(),
            failure: Some(message.into()),
            delay: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Sleep for `delay` before responding. Combine with a short generation
    /// timeout to simulate a stalled model.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// All prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().expect("prompt log poisoned").clone()
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    fn name(&self) -> &str {
        "mock"
    }

    async fn invoke(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().expect("prompt log poisoned").push(prompt.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.failure {
            Some(message) => Err(CoreError::Model(message.clone())),
            None => Ok(self.reply.clone()),
        }
    }
}
