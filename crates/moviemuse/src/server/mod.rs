//! HTTP server for MovieMuse

pub mod routes;
pub mod state;

use axum::{extract::State, http::StatusCode, routing::get, Router};
use std::net::SocketAddr;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::error::{Error, Result};
use state::AppState;

/// MovieMuse HTTP server
pub struct RagServer {
    state: AppState,
}

impl RagServer {
    /// Serve an already bootstrapped state
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Build the router with all routes
    pub fn build_router(&self) -> Router {
        let router = Router::new()
            .route("/health", get(health_check))
            .route("/ready", get(readiness))
            .nest("/api", routes::api_routes())
            .with_state(self.state.clone())
            .layer(TraceLayer::new_for_http());

        if self.state.config().server.enable_cors {
            router.layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            )
        } else {
            router
        }
    }

    /// Start the server
    pub async fn start(self) -> Result<()> {
        let addr: SocketAddr = self
            .address()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid address: {}", e)))?;

        let router = self.build_router();

        tracing::info!("Starting MovieMuse server on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| Error::Config(format!("Failed to bind: {}", e)))?;

        axum::serve(listener, router)
            .await
            .map_err(|e| Error::internal(format!("Server error: {}", e)))?;

        Ok(())
    }

    /// Get the server address
    pub fn address(&self) -> String {
        let server = &self.state.config().server;
        format!("{}:{}", server.host, server.port)
    }
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Readiness check endpoint
async fn readiness(State(state): State<AppState>) -> StatusCode {
    if state.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::ChatService;
    use crate::config::RagConfig;
    use crate::ingestion::{CsvDocumentLoader, DocumentSplitter, IngestionPipeline};
    use crate::providers::llm::MockLlmProvider;
    use crate::providers::{ChatMemoryStore, InMemoryChatMemory, InMemoryVectorStore};
    use crate::retrieval::EmbeddingStoreRetriever;
    use crate::testing::KeywordEmbedder;
    use crate::types::ChatResponse;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use std::sync::Arc;
    use tower::ServiceExt;

    const CSV: &str = "\
index,movie_name,year_of_release,category,run_time,genre,imdb_rating,votes,gross_total
1,The Shawshank Redemption,1994,Movies,142,Drama,9.3,2800000,28341469
2,The Dark Knight,2008,Movies,152,\"Action, Crime, Drama\",9.0,2800000,534858444
";

    async fn test_state(llm: MockLlmProvider, ingest: bool) -> AppState {
        let memory = Arc::new(InMemoryChatMemory::from_config(&RagConfig::default().memory));
        test_state_with_memory(llm, memory, ingest).await
    }

    async fn test_state_with_memory(
        llm: MockLlmProvider,
        memory: Arc<InMemoryChatMemory>,
        ingest: bool,
    ) -> AppState {
        let config = RagConfig::default();
        let embedder = Arc::new(KeywordEmbedder::new());
        let store = Arc::new(InMemoryVectorStore::new(64));

        let retriever = Arc::new(EmbeddingStoreRetriever::from_config(
            embedder.clone(),
            store.clone(),
            &config.retrieval,
        ));
        let chat = ChatService::new(retriever, Arc::new(llm), memory);
        let state = AppState::new(config, chat, embedder.clone(), store.clone());

        if ingest {
            let documents = CsvDocumentLoader::new("movies.csv")
                .load_from_reader(CSV.as_bytes())
                .unwrap();
            let report = IngestionPipeline::new(DocumentSplitter::new(500, 0), embedder, store)
                .ingest(&documents)
                .await
                .unwrap();
            state.mark_ingested(&report);
        }

        state
    }

    fn chat_request(body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/chat")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let router = RagServer::new(test_state(MockLlmProvider::new(), false).await).build_router();
        let response = router
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_ready_reflects_ingestion() {
        let pending = RagServer::new(test_state(MockLlmProvider::new(), false).await).build_router();
        let response = pending
            .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let ready = RagServer::new(test_state(MockLlmProvider::new(), true).await).build_router();
        let response = ready
            .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_chat_round_trip_generates_session() {
        let mut llm = MockLlmProvider::new();
        llm.expect_chat()
            .withf(|messages| messages.last().is_some_and(|m| m.content.contains("The Dark Knight")))
            .times(1)
            .returning(|_| Ok("The Dark Knight.".to_string()));

        let router = RagServer::new(test_state(llm, true).await).build_router();
        let response = router
            .oneshot(chat_request(serde_json::json!({
                "question": "Which action movie should I watch?"
            })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: ChatResponse = serde_json::from_value(json_body(response).await).unwrap();
        assert_eq!(body.answer, "The Dark Knight.");
        assert_eq!(body.segments_retrieved, 2);
        assert!(!body.session_id.as_str().is_empty());
    }

    #[tokio::test]
    async fn test_chat_echoes_given_session() {
        let mut llm = MockLlmProvider::new();
        llm.expect_chat().returning(|_| Ok("ok".to_string()));

        let router = RagServer::new(test_state(llm, true).await).build_router();
        let response = router
            .oneshot(chat_request(serde_json::json!({
                "session_id": "user-42",
                "question": "Any drama?"
            })))
            .await
            .unwrap();

        let body = json_body(response).await;
        assert_eq!(body["session_id"], "user-42");
    }

    #[tokio::test]
    async fn test_blank_question_is_bad_request() {
        let mut llm = MockLlmProvider::new();
        llm.expect_chat().never();

        let router = RagServer::new(test_state(llm, true).await).build_router();
        let response = router
            .oneshot(chat_request(serde_json::json!({ "question": "  " })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = json_body(response).await;
        assert_eq!(body["error"]["type"], "invalid_request");
    }

    #[tokio::test]
    async fn test_missing_question_uses_error_envelope() {
        let mut llm = MockLlmProvider::new();
        llm.expect_chat().never();

        let router = RagServer::new(test_state(llm, true).await).build_router();
        let response = router
            .oneshot(chat_request(serde_json::json!({ "session_id": "x" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = json_body(response).await;
        assert_eq!(body["error"]["type"], "invalid_request");
        assert!(body["error"]["message"].as_str().unwrap().contains("question"));
    }

    #[tokio::test]
    async fn test_invalid_json_uses_error_envelope() {
        let router = RagServer::new(test_state(MockLlmProvider::new(), true).await).build_router();
        let request = Request::builder()
            .method("POST")
            .uri("/api/chat")
            .header("content-type", "application/json")
            .body(Body::from("{\"question\": "))
            .unwrap();

        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"]["type"], "invalid_request");
    }

    #[tokio::test]
    async fn test_anonymous_sessions_are_capped() {
        let mut llm = MockLlmProvider::new();
        llm.expect_chat().returning(|_| Ok("ok".to_string()));

        let memory = Arc::new(InMemoryChatMemory::new(10).with_max_sessions(3));
        let router =
            RagServer::new(test_state_with_memory(llm, memory.clone(), true).await).build_router();

        for _ in 0..20 {
            let response = router
                .clone()
                .oneshot(chat_request(serde_json::json!({ "question": "Any drama?" })))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        assert_eq!(memory.session_count(), 3);
    }

    #[tokio::test]
    async fn test_info_reports_index_counts() {
        let router = RagServer::new(test_state(MockLlmProvider::new(), true).await).build_router();
        let response = router
            .oneshot(Request::builder().uri("/api/info").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["name"], "moviemuse");
        assert_eq!(body["models"]["chat"], "llama3.2:3b");
        assert_eq!(body["models"]["embedding_provider"], "keyword");
        assert_eq!(body["index"]["documents"], 2);
        assert_eq!(body["index"]["segments"], 2);
    }
}
