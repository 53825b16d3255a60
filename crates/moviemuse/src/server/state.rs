//! Application state for the MovieMuse server

use parking_lot::RwLock;
use std::sync::Arc;

use crate::chat::ChatService;
use crate::config::RagConfig;
use crate::ingestion::IngestReport;
use crate::providers::{EmbeddingProvider, VectorStoreProvider};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: RagConfig,
    /// Retrieval-augmented chat
    chat: ChatService,
    /// Embedding provider used for ingestion and queries
    embedder: Arc<dyn EmbeddingProvider>,
    /// Vector store holding the movie segments
    vector_store: Arc<dyn VectorStoreProvider>,
    /// Documents ingested at startup
    documents: RwLock<usize>,
    /// Ready state
    ready: RwLock<bool>,
}

impl AppState {
    /// Create state that is not ready until [`AppState::mark_ingested`]
    pub fn new(
        config: RagConfig,
        chat: ChatService,
        embedder: Arc<dyn EmbeddingProvider>,
        vector_store: Arc<dyn VectorStoreProvider>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                chat,
                embedder,
                vector_store,
                documents: RwLock::new(0),
                ready: RwLock::new(false),
            }),
        }
    }

    /// Get configuration
    pub fn config(&self) -> &RagConfig {
        &self.inner.config
    }

    /// Get the chat service
    pub fn chat(&self) -> &ChatService {
        &self.inner.chat
    }

    pub fn embedding_provider(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.inner.embedder
    }

    pub fn vector_store(&self) -> &Arc<dyn VectorStoreProvider> {
        &self.inner.vector_store
    }

    /// Number of documents ingested at startup
    pub fn document_count(&self) -> usize {
        *self.inner.documents.read()
    }

    /// Record a finished ingestion run and start accepting chat requests
    pub fn mark_ingested(&self, report: &IngestReport) {
        *self.inner.documents.write() = report.documents;
        self.set_ready(true);
    }

    /// Check if the server is ready
    pub fn is_ready(&self) -> bool {
        *self.inner.ready.read()
    }

    /// Set ready state
    pub fn set_ready(&self, ready: bool) {
        *self.inner.ready.write() = ready;
    }
}
