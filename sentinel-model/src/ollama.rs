//! Ollama completion client.
//!
//! Talks to a local Ollama server over its `/api/generate` endpoint with
//! streaming disabled, so one request maps to one completion.

use std::time::Duration;

use async_trait::async_trait;
use sentinel_core::{CoreError, LlmClient, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

/// Default Ollama server address.
const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Default completion model.
const DEFAULT_MODEL: &str = "llama3.1:8b-instruct-q4_K_M";

/// Settings for an [`OllamaClient`].
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    /// Base URL of the Ollama server.
    pub base_url: String,
    /// Model name as known to the server.
    pub model: String,
    /// Sampling temperature. Compliance answers want determinism, so the
    /// default is low.
    pub temperature: f32,
    /// Timeout for establishing the TCP connection.
    pub connect_timeout: Duration,
    /// Timeout for the whole request, connection included.
    pub request_timeout: Duration,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.1,
            connect_timeout: Duration::from_secs(30),
            request_timeout: Duration::from_secs(120),
        }
    }
}

impl OllamaConfig {
    /// Override the server base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the total request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// An [`LlmClient`] backed by a local Ollama server.
pub struct OllamaClient {
    client: reqwest::Client,
    config: OllamaConfig,
}

impl OllamaClient {
    /// Create a new client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Config`] if the underlying HTTP client cannot
    /// be constructed or the base URL is empty.
    pub fn new(config: OllamaConfig) -> Result<Self> {
        if config.base_url.is_empty() {
            return Err(CoreError::Config("base_url must not be empty".to_string()));
        }

        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| CoreError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }
}

// ── Ollama API request/response types ──────────────────────────────

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: String,
}

// ── LlmClient implementation ───────────────────────────────────────

#[async_trait]
impl LlmClient for OllamaClient {
    fn name(&self) -> &str {
        &self.config.model
    }

    async fn invoke(&self, prompt: &str) -> Result<String> {
        debug!(model = %self.config.model, prompt_len = prompt.len(), "invoking Ollama");

        let url = format!("{}/api/generate", self.config.base_url);
        let body = GenerateRequest {
            model: &self.config.model,
            prompt,
            stream: false,
            options: GenerateOptions { temperature: self.config.temperature },
        };

        let response = self.client.post(&url).json(&body).send().await.map_err(|e| {
            if e.is_timeout() {
                error!(model = %self.config.model, "Ollama request timed out");
                CoreError::Timeout(self.config.request_timeout)
            } else {
                error!(model = %self.config.model, error = %e, "Ollama request failed");
                CoreError::Model(format!("request failed: {e}"))
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let detail =
                serde_json::from_str::<ErrorResponse>(&body).map(|e| e.error).unwrap_or(body);

            error!(model = %self.config.model, %status, "Ollama API error");
            return Err(CoreError::Model(format!("API returned {status}: {detail}")));
        }

        let completion: GenerateResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                CoreError::Timeout(self.config.request_timeout)
            } else {
                error!(model = %self.config.model, error = %e, "failed to parse Ollama response");
                CoreError::Model(format!("failed to parse response: {e}"))
            }
        })?;

        Ok(completion.response)
    }
}
