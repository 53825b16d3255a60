//! Ollama-based providers for embeddings and LLM
//!
//! Wraps the OllamaClient to implement the provider traits.

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::{EmbeddingConfig, LlmConfig};
use crate::error::Result;
use crate::generation::OllamaClient;
use crate::types::ChatMessage;

use super::embedding::{embed_buffered, EmbeddingProvider};
use super::llm::LlmProvider;

/// Ollama embedding provider using nomic-embed-text or similar models
pub struct OllamaEmbedder {
    client: Arc<OllamaClient>,
    dimensions: usize,
    parallel_requests: usize,
}

impl OllamaEmbedder {
    /// Create a new Ollama embedder
    pub fn new(llm: &LlmConfig, embeddings: &EmbeddingConfig) -> Result<Self> {
        Ok(Self::from_client(Arc::new(OllamaClient::new(llm)?), embeddings))
    }

    /// Create from existing OllamaClient
    pub fn from_client(client: Arc<OllamaClient>, embeddings: &EmbeddingConfig) -> Self {
        Self {
            client,
            dimensions: embeddings.dimensions,
            parallel_requests: embeddings.parallel_requests.max(1),
        }
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.client.embed(text).await
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        // Ollama has no batch endpoint
        embed_buffered(texts, self.parallel_requests, |text| {
            let client = Arc::clone(&self.client);
            async move { client.embed(&text).await }
        })
        .await
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn health_check(&self) -> Result<bool> {
        self.client.health_check().await
    }

    fn name(&self) -> &str {
        "ollama"
    }
}

/// Ollama LLM provider for answer generation
pub struct OllamaLlm {
    client: Arc<OllamaClient>,
    model: String,
}

impl OllamaLlm {
    /// Create a new Ollama LLM provider
    pub fn new(config: &LlmConfig) -> Result<Self> {
        Ok(Self::from_client(Arc::new(OllamaClient::new(config)?)))
    }

    /// Create from existing OllamaClient
    pub fn from_client(client: Arc<OllamaClient>) -> Self {
        let model = client.config().chat_model.clone();
        Self { client, model }
    }
}

#[async_trait]
impl LlmProvider for OllamaLlm {
    async fn chat(&self, messages: &[ChatMessage]) -> Result<String> {
        self.client.chat(messages).await
    }

    async fn health_check(&self) -> Result<bool> {
        self.client.health_check().await
    }

    fn name(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Combined Ollama provider that shares a single client for both embeddings and LLM
pub struct OllamaProvider {
    embedder: OllamaEmbedder,
    llm: OllamaLlm,
}

impl OllamaProvider {
    /// Create a new combined Ollama provider
    pub fn new(llm: &LlmConfig, embeddings: &EmbeddingConfig) -> Result<Self> {
        let client = Arc::new(OllamaClient::new(llm)?);
        Ok(Self {
            embedder: OllamaEmbedder::from_client(Arc::clone(&client), embeddings),
            llm: OllamaLlm::from_client(client),
        })
    }

    /// Split into separate providers
    pub fn split(self) -> (OllamaEmbedder, OllamaLlm) {
        (self.embedder, self.llm)
    }
}
