//! Vector store provider trait for storing and searching embeddings

use async_trait::async_trait;
use crate::error::Result;
use crate::types::{EmbeddedSegment, TextSegment};

/// Search result from vector store
#[derive(Debug, Clone)]
pub struct VectorSearchResult {
    /// The matched segment
    pub segment: TextSegment,
    /// Similarity score (0.0 to 1.0, higher is more similar)
    pub similarity: f32,
}

/// Trait for vector storage and similarity search
///
/// Implementations:
/// - `InMemoryVectorStore`: in-process exhaustive cosine search
#[async_trait]
pub trait VectorStoreProvider: Send + Sync {
    /// Insert a segment with its embedding
    async fn insert_segment(&self, segment: EmbeddedSegment) -> Result<()>;

    /// Insert multiple segments (batch)
    async fn insert_segments(&self, segments: Vec<EmbeddedSegment>) -> Result<()> {
        for segment in segments {
            self.insert_segment(segment).await?;
        }
        Ok(())
    }

    /// Search for the `top_k` most similar segments, best first
    async fn search(&self, query_embedding: &[f32], top_k: usize) -> Result<Vec<VectorSearchResult>>;

    /// Get total number of vectors stored
    async fn len(&self) -> Result<usize>;

    /// Check if store is empty
    async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }

    /// Remove every stored vector
    async fn clear(&self) -> Result<()>;

    /// Check if the provider is healthy
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
