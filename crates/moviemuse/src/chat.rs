//! MovieMuse chat: retrieval, prompt assembly, generation and session memory

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::generation::PromptBuilder;
use crate::providers::{ChatMemoryStore, LlmProvider};
use crate::retrieval::Retriever;
use crate::types::{ChatMessage, SessionId};

/// Answer plus what went into it
#[derive(Debug, Clone, PartialEq)]
pub struct ChatOutcome {
    pub answer: String,
    pub segments_retrieved: usize,
}

/// Retrieval-augmented chat over the ingested movies
pub struct ChatService {
    retriever: Arc<dyn Retriever>,
    llm: Arc<dyn LlmProvider>,
    memory: Arc<dyn ChatMemoryStore>,
}

impl ChatService {
    pub fn new(
        retriever: Arc<dyn Retriever>,
        llm: Arc<dyn LlmProvider>,
        memory: Arc<dyn ChatMemoryStore>,
    ) -> Self {
        Self {
            retriever,
            llm,
            memory,
        }
    }

    /// Answer `question` within the conversation identified by `session`
    pub async fn chat(&self, session: &SessionId, question: &str) -> Result<String> {
        Ok(self.chat_with_details(session, question).await?.answer)
    }

    /// Like [`ChatService::chat`], also reporting how many segments were used.
    ///
    /// The question is forwarded verbatim. Memory is only updated when the
    /// model produced an answer.
    pub async fn chat_with_details(&self, session: &SessionId, question: &str) -> Result<ChatOutcome> {
        if question.trim().is_empty() {
            return Err(Error::invalid_request("question must not be empty"));
        }

        let segments = self.retriever.find_relevant(question).await?;
        let history = self.memory.messages(session);
        let messages = PromptBuilder::build_messages(&history, question, &segments);

        tracing::debug!(
            "Session {}: {} remembered messages, {} segments",
            session,
            history.len(),
            segments.len()
        );

        let answer = self.llm.chat(&messages).await?;

        self.memory.append(session, ChatMessage::user(question));
        self.memory.append(session, ChatMessage::assistant(answer.clone()));

        Ok(ChatOutcome {
            answer,
            segments_retrieved: segments.len(),
        })
    }

    /// Forget a conversation
    pub fn end_session(&self, session: &SessionId) {
        self.memory.clear(session);
    }
}
