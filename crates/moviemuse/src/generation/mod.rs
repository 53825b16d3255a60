//! Answer generation with the Ollama chat API

pub mod ollama;
pub mod prompt;

pub use ollama::OllamaClient;
pub use prompt::{PromptBuilder, SYSTEM_PROMPT};
