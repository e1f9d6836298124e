//! Answer generation seam.
//!
//! The pipeline talks to the language model through [`AnswerGenerator`];
//! implementations are injected at construction time rather than held in
//! process-wide state. [`OpenAiChatGenerator`] speaks the OpenAI-compatible
//! `/chat/completions` wire format, which covers OpenAI itself plus the
//! usual self-hosted gateways.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::types::RagError;

/// Generates an answer from a system prompt and a user question.
#[async_trait]
pub trait AnswerGenerator: Send + Sync {
    /// Fails with [`RagError::Generation`] when the call errors, times out,
    /// or returns no content.
    async fn generate(&self, system_prompt: &str, question: &str) -> Result<String, RagError>;
}

/// Chat-completions client for OpenAI-compatible endpoints.
pub struct OpenAiChatGenerator {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAiChatGenerator {
    /// Create a builder for the generator.
    pub fn builder() -> OpenAiChatGeneratorBuilder {
        OpenAiChatGeneratorBuilder::default()
    }
}

/// Builder for [`OpenAiChatGenerator`].
#[derive(Default)]
pub struct OpenAiChatGeneratorBuilder {
    base_url: Option<String>,
    api_key: Option<String>,
    model: Option<String>,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

impl OpenAiChatGeneratorBuilder {
    /// Endpoint base, e.g. `https://api.openai.com/v1`. Required.
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Bearer token. Optional; local gateways often need none.
    #[must_use]
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Model identifier. Required.
    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sampling temperature. Defaults to `0.7`.
    #[must_use]
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Completion token budget. Defaults to `4096`.
    #[must_use]
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Build the generator, returning `None` when `base_url` or `model` is
    /// missing.
    pub fn try_build(self) -> Option<OpenAiChatGenerator> {
        Some(OpenAiChatGenerator {
            client: reqwest::Client::new(),
            base_url: self.base_url?.trim_end_matches('/').to_string(),
            api_key: self.api_key.unwrap_or_default(),
            model: self.model?,
            temperature: self.temperature.unwrap_or(0.7),
            max_tokens: self.max_tokens.unwrap_or(4096),
        })
    }

    /// Build the generator.
    ///
    /// # Panics
    ///
    /// Panics if `base_url` or `model` was not set.
    pub fn build(self) -> OpenAiChatGenerator {
        self.try_build()
            .expect("OpenAiChatGeneratorBuilder requires base_url and model")
    }
}

#[async_trait]
impl AnswerGenerator for OpenAiChatGenerator {
    async fn generate(&self, system_prompt: &str, question: &str) -> Result<String, RagError> {
        let body = json!({
            "model": self.model,
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
            "messages": [
                { "role": "system", "content": system_prompt },
                { "role": "user", "content": question },
            ],
        });

        let url = format!("{}/chat/completions", self.base_url);
        let mut request = self.client.post(&url).json(&body);
        if !self.api_key.is_empty() {
            request = request.bearer_auth(&self.api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|err| RagError::Generation(format!("request to {url} failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(RagError::Generation(format!(
                "chat endpoint returned {status}: {detail}"
            )));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|err| RagError::Generation(format!("invalid response body: {err}")))?;

        let content = payload["choices"]
            .get(0)
            .and_then(|choice| choice["message"]["content"].as_str())
            .map(str::to_string)
            .filter(|text| !text.is_empty());

        content.ok_or_else(|| RagError::Generation("model returned no content".to_string()))
    }
}
