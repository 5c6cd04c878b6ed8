// AI implementation using Gemini
//
// This is the infrastructure implementation of BaseAI.

use anyhow::{Context, Result};
use async_trait::async_trait;
use gemini_client::{GeminiClient, GenerateRequest};
use tracing::debug;

use super::BaseAI;

/// Gemini implementation of AI capabilities
#[derive(Clone)]
pub struct GeminiAI {
    client: GeminiClient,
    model: String,
}

impl GeminiAI {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: GeminiClient::new(api_key),
            model: model.into(),
        }
    }
}

#[async_trait]
impl BaseAI for GeminiAI {
    async fn complete(&self, prompt: &str) -> Result<String> {
        debug!(model = %self.model, prompt_len = prompt.len(), "Gemini completion");
        self.client
            .generate_text(&self.model, GenerateRequest::prompt(prompt))
            .await
            .context("Gemini completion failed")
    }

    async fn complete_json(&self, prompt: &str) -> Result<String> {
        debug!(model = %self.model, prompt_len = prompt.len(), "Gemini JSON completion");
        self.client
            .generate_text(&self.model, GenerateRequest::prompt(prompt).json())
            .await
            .context("Gemini JSON completion failed")
    }
}
