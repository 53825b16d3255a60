//! Provider abstractions for embeddings, LLM, vector storage, and chat memory
//!
//! Each external collaborator sits behind a trait so the local adapters
//! (Ollama, in-process store and memory) can be swapped for other backends.

pub mod embedding;
pub mod llm;
pub mod local;
pub mod memory;
pub mod ollama;
pub mod vector_store;

pub use embedding::EmbeddingProvider;
pub use llm::LlmProvider;
pub use local::InMemoryVectorStore;
pub use memory::{ChatMemoryStore, InMemoryChatMemory};
pub use ollama::{OllamaEmbedder, OllamaLlm, OllamaProvider};
pub use vector_store::{VectorSearchResult, VectorStoreProvider};
