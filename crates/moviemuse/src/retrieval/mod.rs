//! Relevant-segment lookup

mod retriever;

pub use retriever::{EmbeddingStoreRetriever, Retriever};
