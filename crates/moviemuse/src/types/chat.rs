//! Chat message and API payload types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque token scoping conversational memory to one conversation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh random session ID
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SessionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for SessionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One message of a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Chat request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Conversation to continue; a new one is started when absent
    #[serde(default)]
    pub session_id: Option<SessionId>,
    /// The user's question, forwarded verbatim
    pub question: String,
}

/// Chat response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Session the answer belongs to
    pub session_id: SessionId,
    /// Generated answer
    pub answer: String,
    /// Number of segments used as context
    pub segments_retrieved: usize,
    /// Processing time in milliseconds
    pub processing_time_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_without_session() {
        let req: ChatRequest =
            serde_json::from_str(r#"{"question": "Which movie won?"}"#).unwrap();
        assert!(req.session_id.is_none());
        assert_eq!(req.question, "Which movie won?");
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_string(&ChatMessage::assistant("hi")).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"hi"}"#);
    }

    #[test]
    fn test_generated_sessions_differ() {
        assert_ne!(SessionId::generate(), SessionId::generate());
    }
}
