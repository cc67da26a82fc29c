//! The language-model client trait.

use async_trait::async_trait;

use crate::error::Result;

/// A client for a text-completion language model.
///
/// The contract is deliberately narrow: one prompt in, one completion out.
/// Prompt construction, retrieval, and grounding all happen upstream in
/// `sentinel-rag`; a client only owns transport concerns (endpoints,
/// authentication, timeouts).
///
/// # Example
///
/// ```rust,ignore
/// use sentinel_core::LlmClient;
///
/// let answer = client.invoke("Question: ...").await?;
/// ```
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// A short identifier for the backing model, used in logs.
    fn name(&self) -> &str;

    /// Send a prompt to the model and return the completion text.
    ///
    /// Implementations must enforce their own connection timeout and map
    /// request timeouts to [`CoreError::Timeout`](crate::CoreError::Timeout)
    /// so callers can distinguish a slow model from a broken one.
    async fn invoke(&self, prompt: &str) -> Result<String>;
}
