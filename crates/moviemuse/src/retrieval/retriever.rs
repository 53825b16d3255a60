//! Retriever abstraction and its embedding-store implementation

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::RetrievalConfig;
use crate::error::Result;
use crate::providers::{EmbeddingProvider, VectorSearchResult, VectorStoreProvider};
use crate::types::TextSegment;

/// Finds the segments relevant to a query.
///
/// The chat service depends only on this capability, so any backend
/// (in-memory, Redis, a hosted vector database) can sit behind it.
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Relevant segments, most relevant first
    async fn find_relevant(&self, query: &str) -> Result<Vec<TextSegment>>;
}

/// Embeds the query and searches a vector store
pub struct EmbeddingStoreRetriever {
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStoreProvider>,
    max_results: usize,
    min_score: f32,
}

impl EmbeddingStoreRetriever {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStoreProvider>,
        max_results: usize,
    ) -> Self {
        Self {
            embedder,
            store,
            max_results,
            min_score: 0.0,
        }
    }

    pub fn from_config(
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStoreProvider>,
        config: &RetrievalConfig,
    ) -> Self {
        Self::new(embedder, store, config.max_results).with_min_score(config.min_score)
    }

    /// Drop results scoring below `min_score`
    pub fn with_min_score(mut self, min_score: f32) -> Self {
        self.min_score = min_score;
        self
    }

    /// Search results with their similarity scores
    pub async fn find_relevant_scored(&self, query: &str) -> Result<Vec<VectorSearchResult>> {
        let query_embedding = self.embedder.embed(query).await?;

        let mut results = self.store.search(&query_embedding, self.max_results).await?;
        results.retain(|r| r.similarity >= self.min_score);

        tracing::debug!(
            "Retrieved {} segments (best score: {:?})",
            results.len(),
            results.first().map(|r| r.similarity)
        );

        Ok(results)
    }
}

#[async_trait]
impl Retriever for EmbeddingStoreRetriever {
    async fn find_relevant(&self, query: &str) -> Result<Vec<TextSegment>> {
        Ok(self
            .find_relevant_scored(query)
            .await?
            .into_iter()
            .map(|r| r.segment)
            .collect())
    }
}
