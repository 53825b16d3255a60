//! Chat endpoint

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use std::time::Instant;

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::{ChatRequest, ChatResponse, SessionId};

/// POST /api/chat - Ask MovieMuse a question
pub async fn chat(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>> {
    let start = Instant::now();
    let Json(request) = payload.map_err(|rejection| Error::invalid_request(rejection.body_text()))?;
    let session_id = request.session_id.unwrap_or_else(SessionId::generate);

    tracing::info!("Chat [{}]: \"{}\"", session_id, request.question);

    let outcome = state
        .chat()
        .chat_with_details(&session_id, &request.question)
        .await?;

    let processing_time_ms = start.elapsed().as_millis() as u64;
    tracing::info!(
        "Answered [{}] using {} segments in {}ms",
        session_id,
        outcome.segments_retrieved,
        processing_time_ms
    );

    Ok(Json(ChatResponse {
        session_id,
        answer: outcome.answer,
        segments_retrieved: outcome.segments_retrieved,
        processing_time_ms,
    }))
}
