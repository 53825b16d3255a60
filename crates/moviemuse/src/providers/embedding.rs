//! Embedding provider trait for generating text embeddings

use async_trait::async_trait;
use futures::{stream, StreamExt, TryStreamExt};
use std::future::Future;

use crate::error::Result;

/// Trait for generating text embeddings
///
/// Implementations:
/// - `OllamaEmbedder`: Local Ollama server (nomic-embed-text)
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate embedding for a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embeddings for multiple texts (batch)
    ///
    /// Output order matches input order. The default implementation calls
    /// `embed` sequentially.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            embeddings.push(self.embed(text).await?);
        }
        Ok(embeddings)
    }

    /// Get embedding dimensions (e.g., 768 for nomic-embed-text)
    fn dimensions(&self) -> usize;

    /// Check if the provider is healthy and available
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}

/// Embed `texts` with at most `parallel` requests in flight.
///
/// Results keep input order; the first failure is returned.
pub async fn embed_buffered<F, Fut>(texts: &[String], parallel: usize, embed: F) -> Result<Vec<Vec<f32>>>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<Vec<f32>>>,
{
    stream::iter(texts.iter().cloned())
        .map(embed)
        .buffered(parallel.max(1))
        .try_collect()
        .await
}
