//! LLM provider trait for generating answers

use async_trait::async_trait;
use crate::error::Result;
use crate::types::ChatMessage;

/// Trait for chat-style answer generation
///
/// Implementations:
/// - `OllamaLlm`: Local Ollama server (llama3.2, phi3, etc.)
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate the assistant reply to a conversation
    async fn chat(&self, messages: &[ChatMessage]) -> Result<String>;

    /// Check if the provider is healthy and available
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;

    /// Get the model being used
    fn model(&self) -> &str;
}
