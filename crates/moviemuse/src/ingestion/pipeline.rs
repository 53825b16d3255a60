//! Ingestion pipeline orchestration: split, embed, store

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::{Error, Result};
use crate::providers::{EmbeddingProvider, VectorStoreProvider};
use crate::types::{Document, EmbeddedSegment};

use super::splitter::DocumentSplitter;

/// Summary of one ingestion run
#[derive(Debug, Clone, PartialEq)]
pub struct IngestReport {
    pub documents: usize,
    pub segments: usize,
    pub elapsed: Duration,
}

/// Main ingestion pipeline
pub struct IngestionPipeline {
    splitter: DocumentSplitter,
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStoreProvider>,
}

impl IngestionPipeline {
    pub fn new(
        splitter: DocumentSplitter,
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStoreProvider>,
    ) -> Self {
        Self {
            splitter,
            embedder,
            store,
        }
    }

    /// Split every document, embed the segments and persist them.
    ///
    /// Embedding and store errors are returned unchanged; nothing is written
    /// to the store unless every segment was embedded.
    pub async fn ingest(&self, documents: &[Document]) -> Result<IngestReport> {
        let start = Instant::now();

        let segments = self.splitter.split_all(documents);
        tracing::info!(
            "Split {} documents into {} segments",
            documents.len(),
            segments.len()
        );

        let texts: Vec<String> = segments.iter().map(|s| s.text.clone()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;

        if embeddings.len() != segments.len() {
            return Err(Error::embedding(format!(
                "{} returned {} embeddings for {} segments",
                self.embedder.name(),
                embeddings.len(),
                segments.len()
            )));
        }

        let embedded: Vec<EmbeddedSegment> = segments
            .into_iter()
            .zip(embeddings)
            .map(|(segment, embedding)| EmbeddedSegment { segment, embedding })
            .collect();
        let segment_count = embedded.len();

        self.store.insert_segments(embedded).await?;

        let report = IngestReport {
            documents: documents.len(),
            segments: segment_count,
            elapsed: start.elapsed(),
        };
        tracing::info!(
            "Ingested {} segments into {} in {:?}",
            report.segments,
            self.store.name(),
            report.elapsed
        );

        Ok(report)
    }
}
