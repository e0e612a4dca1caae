//! Canned provider for tests. Lives outside `#[cfg(test)]` so
//! integration tests can build an app around it.

use std::sync::Mutex;

use async_trait::async_trait;

use super::{ModelProvider, ProviderError};

#[derive(Default)]
pub struct MockProvider {
    replies: Mutex<Vec<String>>,
    pub fail: bool,
    prompts: Mutex<Vec<String>>,
}

impl MockProvider {
    /// Replies are returned in order; the last one repeats.
    pub fn with_replies(replies: Vec<String>) -> Self {
        Self {
            replies: Mutex::new(replies),
            fail: false,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Prompts seen so far, for asserting on prompt contents.
    pub fn recorded_prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelProvider for MockProvider {
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if self.fail {
            return Err(ProviderError::Api("mock failure".to_string()));
        }
        let mut replies = self.replies.lock().unwrap();
        if replies.is_empty() {
            return Err(ProviderError::MalformedResponse("no canned reply".to_string()));
        }
        if replies.len() == 1 {
            Ok(replies[0].clone())
        } else {
            Ok(replies.remove(0))
        }
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        if self.fail {
            return Err(ProviderError::Api("mock failure".to_string()));
        }
        // Deterministic bag-of-letters vector so similarity ordering is
        // stable across runs.
        let mut vector = vec![0.0f32; 16];
        for byte in text.bytes() {
            vector[(byte as usize) % 16] += 1.0;
        }
        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }
        Ok(vector)
    }
}
