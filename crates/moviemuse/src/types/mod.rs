//! Core types for the MovieMuse service

pub mod chat;
pub mod document;

pub use chat::{ChatMessage, ChatRequest, ChatResponse, Role, SessionId};
pub use document::{Document, EmbeddedSegment, Metadata, TextSegment, SEGMENT_INDEX_KEY};
