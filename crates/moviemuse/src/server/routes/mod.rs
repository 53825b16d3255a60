//! API routes for the MovieMuse server

pub mod chat;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use crate::error::Result;
use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/chat", post(chat::chat))
        .route("/info", get(info))
}

/// GET /api/info - Service, model and index summary
async fn info(State(state): State<AppState>) -> Result<Json<Value>> {
    let segments = state.vector_store().len().await?;

    Ok(Json(json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Movie Q&A over the IMDb top movies dataset",
        "models": {
            "embedding": state.config().llm.embed_model,
            "embedding_provider": state.embedding_provider().name(),
            "chat": state.config().llm.chat_model,
        },
        "index": {
            "documents": state.document_count(),
            "segments": segments,
        },
        "endpoints": {
            "POST /api/chat": "Ask a question (optionally continuing a session)",
            "GET /api/info": "Service information",
            "GET /health": "Liveness",
            "GET /ready": "Readiness (200 once the dataset is ingested)"
        }
    })))
}
