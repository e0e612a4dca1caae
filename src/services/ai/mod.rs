//! Model provider abstraction.
//!
//! A trait seam between the services and whichever OpenAI-compatible
//! backend is configured, so tests can swap in a mock and the server
//! can run with no provider at all.

pub mod mock;
pub mod openai;

use async_trait::async_trait;
use thiserror::Error;

pub use mock::MockProvider;
pub use openai::OpenAiProvider;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("provider not configured")]
    NotConfigured,

    #[error("API error: {0}")]
    Api(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// A text-completion and embedding backend.
///
/// Prompt assembly and response parsing stay in the services; the
/// provider only moves strings and vectors.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Run a chat completion and return the raw reply text.
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError>;

    /// Embed a single text for similarity search.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError>;
}

/// Pull the first JSON object out of a model reply. Models routinely
/// wrap JSON in prose or markdown fences.
pub fn extract_json_object(text: &str) -> Option<serde_json::Value> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    serde_json::from_str(&text[start..=end]).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_json_from_fenced_reply() {
        let reply = "Here you go:\n```json\n{\"health_score\": 72, \"issues\": []}\n```";
        let value = extract_json_object(reply).unwrap();
        assert_eq!(value["health_score"], 72);
    }

    #[test]
    fn extract_returns_none_without_object() {
        assert!(extract_json_object("no json here").is_none());
        assert!(extract_json_object("} backwards {").is_none());
    }
}
