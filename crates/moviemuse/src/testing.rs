//! Deterministic in-process collaborators for tests and offline runs

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{Error, Result};
use crate::providers::EmbeddingProvider;

/// Bag-of-words embedder: every lowercase alphanumeric token bumps one hashed dimension.
///
/// Texts sharing words end up close; texts without common words are orthogonal
/// unless two tokens happen to hash to the same dimension.
pub struct KeywordEmbedder {
    dimensions: usize,
    calls: AtomicUsize,
    fail_after: Option<usize>,
}

impl KeywordEmbedder {
    pub fn new() -> Self {
        Self::with_dimensions(64)
    }

    pub fn with_dimensions(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
            calls: AtomicUsize::new(0),
            fail_after: None,
        }
    }

    /// Fail every call after the first `calls` succeed
    pub fn failing_after(mut self, calls: usize) -> Self {
        self.fail_after = Some(calls);
        self
    }

    /// Number of `embed` calls so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn vectorize(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0; self.dimensions];
        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let slot = (fnv1a(&token.to_lowercase()) % self.dimensions as u64) as usize;
            vector[slot] += 1.0;
        }
        vector
    }
}

impl Default for KeywordEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmbeddingProvider for KeywordEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if matches!(self.fail_after, Some(limit) if call >= limit) {
            return Err(Error::embedding("keyword embedder failure"));
        }
        Ok(self.vectorize(text))
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "keyword"
    }
}

fn fnv1a(text: &str) -> u64 {
    let mut hash: u64 = 0xcbf29ce484222325;
    for byte in text.bytes() {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}
