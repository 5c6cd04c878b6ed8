// Mock implementations for testing
//
// Injected into ServerDeps so classification runs without network access.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use super::BaseAI;

// =============================================================================
// Mock AI
// =============================================================================

/// Replays queued responses in order; once the queue is empty it answers
/// with the fallback (or fails if none is set).
#[derive(Clone, Default)]
pub struct MockAI {
    responses: Arc<Mutex<VecDeque<Result<String, String>>>>,
    fallback: Option<String>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockAI {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every prompt with the same text
    pub fn always(response: &str) -> Self {
        Self {
            fallback: Some(response.to_string()),
            ..Self::default()
        }
    }

    /// Queue one successful response
    pub fn with_response(self, response: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(response.to_string()));
        self
    }

    /// Queue one failure
    pub fn with_failure(self, message: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
        self
    }

    /// All prompts received so far
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl BaseAI for MockAI {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        let queued = self.responses.lock().unwrap().pop_front();
        match queued {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(anyhow!(message)),
            None => self
                .fallback
                .clone()
                .ok_or_else(|| anyhow!("MockAI has no response queued")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replays_in_order_then_fallback() {
        let ai = MockAI::always("fallback")
            .with_response("first")
            .with_failure("boom");

        assert_eq!(ai.complete("a").await.unwrap(), "first");
        assert!(ai.complete("b").await.is_err());
        assert_eq!(ai.complete_json("c").await.unwrap(), "fallback");
        assert_eq!(ai.prompts(), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_empty_mock_fails() {
        let ai = MockAI::new();
        assert!(ai.complete("anything").await.is_err());
        assert_eq!(ai.call_count(), 1);
    }
}
