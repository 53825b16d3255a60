//! In-process vector store
//!
//! Stands in for an external vector database; every query is an exhaustive
//! cosine scan, which is plenty for a table of a few hundred rows.

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::{Error, Result};
use crate::types::EmbeddedSegment;

use super::vector_store::{VectorSearchResult, VectorStoreProvider};

/// Thread-safe in-memory vector store
pub struct InMemoryVectorStore {
    entries: RwLock<Vec<EmbeddedSegment>>,
    dimensions: usize,
}

impl InMemoryVectorStore {
    /// Create a store accepting vectors of `dimensions` length
    pub fn new(dimensions: usize) -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            dimensions,
        }
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn check_dimensions(&self, vector: &[f32]) -> Result<()> {
        if vector.len() != self.dimensions {
            return Err(Error::vector_db(format!(
                "Dimension mismatch: expected {}, got {}",
                self.dimensions,
                vector.len()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl VectorStoreProvider for InMemoryVectorStore {
    async fn insert_segment(&self, segment: EmbeddedSegment) -> Result<()> {
        self.check_dimensions(&segment.embedding)?;
        self.entries.write().push(segment);
        Ok(())
    }

    async fn insert_segments(&self, segments: Vec<EmbeddedSegment>) -> Result<()> {
        for segment in &segments {
            self.check_dimensions(&segment.embedding)?;
        }
        self.entries.write().extend(segments);
        Ok(())
    }

    async fn search(&self, query_embedding: &[f32], top_k: usize) -> Result<Vec<VectorSearchResult>> {
        self.check_dimensions(query_embedding)?;

        let entries = self.entries.read();
        let mut results: Vec<VectorSearchResult> = entries
            .iter()
            .map(|entry| VectorSearchResult {
                segment: entry.segment.clone(),
                // Map cosine [-1, 1] onto [0, 1]
                similarity: (cosine_similarity(query_embedding, &entry.embedding) + 1.0) / 2.0,
            })
            .collect();

        results.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        results.truncate(top_k);

        Ok(results)
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.entries.read().len())
    }

    async fn clear(&self) -> Result<()> {
        self.entries.write().clear();
        Ok(())
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "in-memory"
    }
}

/// Cosine similarity; zero vectors score 0.0
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}
