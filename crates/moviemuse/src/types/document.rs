//! Document and segment types with key-value metadata

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// String key-value metadata attached to documents and segments
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(HashMap<String, String>);

impl Metadata {
    /// Create empty metadata
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    /// Insert or replace a value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Get a value by key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over all entries (unordered)
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Copy every entry of `other` into self, overwriting duplicates
    pub fn merge(&mut self, other: &Metadata) {
        for (key, value) in other.iter() {
            self.insert(key, value);
        }
    }
}

impl From<HashMap<String, String>> for Metadata {
    fn from(map: HashMap<String, String>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Metadata {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// A unit of ingestible text plus structured metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Text body
    pub text: String,
    /// Metadata
    pub metadata: Metadata,
}

impl Document {
    pub fn new(text: impl Into<String>, metadata: Metadata) -> Self {
        Self {
            text: text.into(),
            metadata,
        }
    }
}

/// A slice of a document body, sized for the embedding model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSegment {
    /// Unique segment ID
    pub id: Uuid,
    /// Text content
    pub text: String,
    /// Parent document metadata plus `segment_index`
    pub metadata: Metadata,
}

impl TextSegment {
    /// Create a segment of `document`; `index` is its position within the document
    pub fn from_document(document: &Document, text: impl Into<String>, index: usize) -> Self {
        let mut metadata = document.metadata.clone();
        metadata.insert(SEGMENT_INDEX_KEY, index.to_string());
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            metadata,
        }
    }

    /// Create a standalone segment
    pub fn new(text: impl Into<String>, metadata: Metadata) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            metadata,
        }
    }
}

/// Metadata key holding a segment's position within its document
pub const SEGMENT_INDEX_KEY: &str = "segment_index";

/// A segment paired with its embedding vector
#[derive(Debug, Clone)]
pub struct EmbeddedSegment {
    pub segment: TextSegment,
    pub embedding: Vec<f32>,
}
