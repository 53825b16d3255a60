//! Prompt templates for MovieMuse chat

use crate::types::{ChatMessage, TextSegment};

/// Fixed system message of the assistant
pub const SYSTEM_PROMPT: &str = r#"You are MovieMuse, an AI answering questions about the top 100 movies from IMDB.
Your response must be polite, use the same language as the question, and be relevant to the question.

Introduce yourself with: "Hello, I'm MovieMuse, how can I help you?""#;

/// Prompt builder for retrieval-augmented chat
pub struct PromptBuilder;

impl PromptBuilder {
    /// Append retrieved segments to the user's question.
    ///
    /// The question text itself is kept verbatim; with no segments it is returned unchanged.
    pub fn augment_question(question: &str, segments: &[TextSegment]) -> String {
        if segments.is_empty() {
            return question.to_string();
        }

        let information = segments
            .iter()
            .map(|segment| segment.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        format!(
            "{question}\n\nAnswer using the following information:\n{information}",
            question = question,
            information = information
        )
    }

    /// Build the full message list: system prompt, remembered history, augmented question
    pub fn build_messages(
        history: &[ChatMessage],
        question: &str,
        segments: &[TextSegment],
    ) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage::system(SYSTEM_PROMPT));
        messages.extend_from_slice(history);
        messages.push(ChatMessage::user(Self::augment_question(question, segments)));
        messages
    }
}
