//! moviemuse: movie Q&A chat service with retrieval-augmented answers
//!
//! At startup the bundled top-movies CSV is turned into one document per row,
//! split into segments, embedded and stored in a vector store. Each chat
//! request retrieves the most relevant segments, combines them with the
//! MovieMuse system prompt and the session's recent messages, and asks the
//! chat model for an answer.

pub mod chat;
pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod startup;
#[cfg(any(test, feature = "test-util"))]
pub mod testing;
pub mod types;

pub use chat::{ChatOutcome, ChatService};
pub use config::RagConfig;
pub use error::{Error, Result};
pub use server::{state::AppState, RagServer};
pub use types::{ChatMessage, ChatRequest, ChatResponse, Document, Metadata, SessionId, TextSegment};
