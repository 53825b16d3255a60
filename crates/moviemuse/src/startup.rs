//! Composition root: wires providers, ingests the dataset, returns a ready state

use std::sync::Arc;

use crate::chat::ChatService;
use crate::config::RagConfig;
use crate::error::Result;
use crate::ingestion::{CsvDocumentLoader, DocumentSplitter, IngestionPipeline};
use crate::providers::{
    ChatMemoryStore, EmbeddingProvider, InMemoryChatMemory, InMemoryVectorStore, LlmProvider,
    OllamaProvider, VectorStoreProvider,
};
use crate::retrieval::EmbeddingStoreRetriever;
use crate::server::state::AppState;

/// Build the default stack (Ollama, in-process store and memory) and ingest the dataset
pub async fn bootstrap(config: RagConfig) -> Result<AppState> {
    let (embedder, llm) = OllamaProvider::new(&config.llm, &config.embeddings)?.split();
    tracing::info!(
        "Ollama providers initialized (embeddings: {}, chat: {})",
        config.llm.embed_model,
        config.llm.chat_model
    );

    let store = Arc::new(InMemoryVectorStore::new(config.embeddings.dimensions));
    let memory = Arc::new(InMemoryChatMemory::from_config(&config.memory));

    bootstrap_with(config, Arc::new(embedder), store, Arc::new(llm), memory).await
}

/// Load and ingest the dataset using the given collaborators.
///
/// A missing dataset aborts startup with `Error::ResourceNotFound`.
pub async fn bootstrap_with(
    config: RagConfig,
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStoreProvider>,
    llm: Arc<dyn LlmProvider>,
    memory: Arc<dyn ChatMemoryStore>,
) -> Result<AppState> {
    let documents = CsvDocumentLoader::from_config(&config.dataset).load_from_path(&config.dataset.path)?;

    let pipeline = IngestionPipeline::new(
        DocumentSplitter::from_config(&config.chunking),
        Arc::clone(&embedder),
        Arc::clone(&store),
    );

    let retriever = Arc::new(EmbeddingStoreRetriever::from_config(
        Arc::clone(&embedder),
        Arc::clone(&store),
        &config.retrieval,
    ));
    let chat = ChatService::new(retriever, llm, memory);
    let state = AppState::new(config, chat, embedder, Arc::clone(&store));

    let report = pipeline.ingest(&documents).await?;
    state.mark_ingested(&report);

    tracing::info!(
        "MovieMuse ready: {} documents, {} segments in {} store",
        report.documents,
        report.segments,
        store.name()
    );

    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::providers::llm::MockLlmProvider;
    use crate::testing::KeywordEmbedder;
    use crate::types::SessionId;
    use std::io::Write;

    fn dataset(rows: &[&str]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "index,movie_name,year_of_release,category,run_time,genre,imdb_rating,votes,gross_total"
        )
        .unwrap();
        for row in rows {
            writeln!(file, "{}", row).unwrap();
        }
        file
    }

    fn config_for(path: &std::path::Path) -> RagConfig {
        let mut config = RagConfig::default();
        config.dataset.path = path.to_path_buf();
        config
    }

    #[tokio::test]
    async fn test_bootstrap_with_ingests_and_marks_ready() {
        let file = dataset(&[
            "1,The Godfather,1972,Movies,175,Crime,9.2,1900000,134966411",
            "2,Spirited Away,2001,Movies,125,\"Animation, Adventure, Family\",8.6,800000,10055859",
        ]);
        let embedder = Arc::new(KeywordEmbedder::new());
        let store = Arc::new(InMemoryVectorStore::new(64));

        let mut llm = MockLlmProvider::new();
        llm.expect_chat()
            .withf(|messages| messages.last().is_some_and(|m| m.content.contains("Spirited Away")))
            .returning(|_| Ok("Spirited Away.".to_string()));

        let state = bootstrap_with(
            config_for(file.path()),
            embedder.clone(),
            store.clone(),
            Arc::new(llm),
            Arc::new(InMemoryChatMemory::new(10)),
        )
        .await
        .unwrap();

        assert!(state.is_ready());
        assert_eq!(state.document_count(), 2);
        assert_eq!(store.len().await.unwrap(), 2);
        assert_eq!(embedder.calls(), 2);

        let answer = state
            .chat()
            .chat(&SessionId::from("s1"), "Recommend an animation for the family")
            .await
            .unwrap();
        assert_eq!(answer, "Spirited Away.");
    }

    #[tokio::test]
    async fn test_missing_dataset_aborts_before_embedding() {
        let dir = tempfile::tempdir().unwrap();
        let embedder = Arc::new(KeywordEmbedder::new());

        let err = bootstrap_with(
            config_for(&dir.path().join("movies.csv")),
            embedder.clone(),
            Arc::new(InMemoryVectorStore::new(64)),
            Arc::new(MockLlmProvider::new()),
            Arc::new(InMemoryChatMemory::new(10)),
        )
        .await
        .err()
        .unwrap();

        assert!(matches!(err, Error::ResourceNotFound { .. }));
        assert_eq!(embedder.calls(), 0);
    }

    #[tokio::test]
    async fn test_embedding_failure_aborts_startup() {
        let file = dataset(&["1,The Godfather,1972,Movies,175,Crime,9.2,1900000,134966411"]);

        let err = bootstrap_with(
            config_for(file.path()),
            Arc::new(KeywordEmbedder::new().failing_after(0)),
            Arc::new(InMemoryVectorStore::new(64)),
            Arc::new(MockLlmProvider::new()),
            Arc::new(InMemoryChatMemory::new(10)),
        )
        .await
        .err()
        .unwrap();

        assert!(matches!(err, Error::Embedding(_)));
    }
}
