//! OpenAI Content Client
//!
//! HTTP implementation of [`ContentClient`] against an OpenAI-style service.
//!
//! # Endpoints
//!
//! - completions: `POST {prompt, max_tokens[, model]}` → `{"choices": [{"text": ...}]}`
//! - images: `POST {prompt, model, size, quality, n, style}` → `{"data": [{"url": ...}]}`
//!
//! Response parsing is kept in free functions so it can be tested without a
//! server.

use async_trait::async_trait;
use serde_json::Value;

use super::prompts::{
    cta_prompt, description_prompt, image_prompt, title_prompt, CTA_MAX_TOKENS,
    DESCRIPTION_MAX_TOKENS, TITLE_MAX_TOKENS,
};
use super::traits::{ContentClient, FailureReason, GenerationResult};
use crate::colors::HexColor;
use crate::config::ServiceConfig;

/// Content client for an OpenAI-style completions/images service
#[derive(Clone)]
pub struct OpenAiClient {
    config: ServiceConfig,
    http_client: reqwest::Client,
}

impl OpenAiClient {
    /// Create a client from explicit service settings
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: ServiceConfig) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        if config.api_key.is_none() {
            tracing::warn!("No API key configured; requests will likely be rejected");
        }

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Settings this client was built with
    #[must_use]
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    fn completion_body(&self, prompt: String, max_tokens: u32) -> Value {
        let mut body = serde_json::json!({
            "prompt": prompt,
            "max_tokens": max_tokens,
        });
        if let Some(ref model) = self.config.completion_model {
            body["model"] = serde_json::json!(model);
        }
        body
    }

    fn image_body(&self, prompt: String) -> Value {
        serde_json::json!({
            "prompt": prompt,
            "model": self.config.image_model,
            "size": self.config.image_size,
            "quality": self.config.image_quality,
            "n": self.config.image_count,
            "style": self.config.image_style,
        })
    }

    /// POST a JSON body and return the raw response text
    async fn post(&self, url: &str, body: &Value) -> Result<String, FailureReason> {
        let mut request = self.http_client.post(url).json(body);
        if let Some(ref key) = self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| FailureReason::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(url, status = status.as_u16(), "Service returned error status");
            return Err(FailureReason::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .text()
            .await
            .map_err(|e| FailureReason::Transport(e.to_string()))
    }

    async fn complete(&self, prompt: String, max_tokens: u32) -> GenerationResult<String> {
        let body = self.completion_body(prompt, max_tokens);
        tracing::debug!(max_tokens, "Requesting completion");
        match self.post(&self.config.completions_url, &body).await {
            Ok(text) => parse_completion(&text),
            Err(reason) => GenerationResult::Failed(reason),
        }
    }
}

#[async_trait]
impl ContentClient for OpenAiClient {
    fn name(&self) -> &str {
        "OpenAI"
    }

    async fn request_title(&self, seed: &str) -> GenerationResult<String> {
        self.complete(title_prompt(seed), TITLE_MAX_TOKENS).await
    }

    async fn request_description(&self, seed: &str) -> GenerationResult<String> {
        self.complete(description_prompt(seed), DESCRIPTION_MAX_TOKENS)
            .await
    }

    async fn request_cta(&self, seed: &str) -> GenerationResult<String> {
        self.complete(cta_prompt(seed), CTA_MAX_TOKENS).await
    }

    async fn request_image(
        &self,
        title: &str,
        description: &str,
        colors: &[HexColor; 3],
    ) -> GenerationResult<String> {
        let body = self.image_body(image_prompt(title, description, colors));
        tracing::debug!(model = %self.config.image_model, "Requesting image");
        match self.post(&self.config.images_url, &body).await {
            Ok(text) => parse_image(&text),
            Err(reason) => GenerationResult::Failed(reason),
        }
    }
}

/// Extract the first choice's text from a completion response
///
/// The text is trimmed. An empty choice list is `NoResults`; anything that is
/// not the expected shape is `Malformed`.
pub fn parse_completion(body: &str) -> GenerationResult<String> {
    first_entry(body, "choices", "text").map(|text| text.trim().to_string())
}

/// Extract the first image URL from an image generation response
pub fn parse_image(body: &str) -> GenerationResult<String> {
    first_entry(body, "data", "url")
}

fn first_entry(body: &str, list: &str, field: &str) -> GenerationResult<String> {
    let data: Value = match serde_json::from_str(body) {
        Ok(data) => data,
        Err(e) => return GenerationResult::Failed(FailureReason::Malformed(e.to_string())),
    };

    let Some(entries) = data.get(list).and_then(Value::as_array) else {
        return GenerationResult::Failed(FailureReason::Malformed(format!(
            "missing `{list}` array"
        )));
    };

    let Some(first) = entries.first() else {
        return GenerationResult::Failed(FailureReason::NoResults);
    };

    match first.get(field).and_then(Value::as_str) {
        Some(value) => GenerationResult::Ok(value.to_string()),
        None => GenerationResult::Failed(FailureReason::Malformed(format!(
            "first `{list}` entry has no `{field}` string"
        ))),
    }
}
