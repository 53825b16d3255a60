//! Configuration for the MovieMuse service

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Upper bound for `llm.max_retries`
pub const MAX_RETRIES: u32 = 10;

/// Main service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RagConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Dataset (CSV resource) configuration
    pub dataset: DatasetConfig,
    /// Embedding configuration
    pub embeddings: EmbeddingConfig,
    /// Document splitting configuration
    pub chunking: ChunkingConfig,
    /// Ollama/LLM configuration
    pub llm: LlmConfig,
    /// Retrieval configuration
    pub retrieval: RetrievalConfig,
    /// Chat memory configuration
    pub memory: MemoryConfig,
}

impl RagConfig {
    /// Load configuration from an optional TOML file, then apply environment overrides.
    ///
    /// Sections missing from the file keep their defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&raw)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Apply `MOVIEMUSE_*` / `OLLAMA_BASE_URL` environment overrides
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("MOVIEMUSE_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("MOVIEMUSE_PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!("Ignoring invalid MOVIEMUSE_PORT value: {}", port),
            }
        }
        if let Some(path) = lookup("MOVIEMUSE_DATASET") {
            self.dataset.path = PathBuf::from(path);
        }
        if let Some(url) = lookup("OLLAMA_BASE_URL") {
            self.llm.base_url = url;
        }
        if let Some(model) = lookup("MOVIEMUSE_EMBED_MODEL") {
            self.llm.embed_model = model;
        }
        if let Some(model) = lookup("MOVIEMUSE_CHAT_MODEL") {
            self.llm.chat_model = model;
        }
    }

    /// Reject settings the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.chunking.max_segment_size == 0 {
            return Err(Error::Config("chunking.max_segment_size must be > 0".to_string()));
        }
        if self.chunking.segment_overlap >= self.chunking.max_segment_size {
            return Err(Error::Config(
                "chunking.segment_overlap must be smaller than chunking.max_segment_size".to_string(),
            ));
        }
        if self.retrieval.max_results == 0 {
            return Err(Error::Config("retrieval.max_results must be > 0".to_string()));
        }
        if !(0.0..=1.0).contains(&self.retrieval.min_score) {
            return Err(Error::Config("retrieval.min_score must be within 0.0..=1.0".to_string()));
        }
        if self.llm.max_retries > MAX_RETRIES {
            return Err(Error::Config(format!("llm.max_retries must be at most {}", MAX_RETRIES)));
        }
        if self.memory.max_sessions == 0 {
            return Err(Error::Config("memory.max_sessions must be > 0".to_string()));
        }
        if self.embeddings.parallel_requests == 0 {
            return Err(Error::Config("embeddings.parallel_requests must be > 0".to_string()));
        }
        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            enable_cors: true,
        }
    }
}

/// Dataset configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Path to the movies CSV
    pub path: PathBuf,
    /// Name recorded in each document's `source` metadata
    pub source_name: String,
    /// Data rows dropped after the header (1 reproduces the legacy double skip)
    pub skip_leading_rows: usize,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/resources/movies.csv")),
            source_name: crate::ingestion::DEFAULT_SOURCE_NAME.to_string(),
            skip_leading_rows: 0,
        }
    }
}

/// Embedding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Embedding dimensions (768 for nomic-embed-text)
    pub dimensions: usize,
    /// Concurrent embedding requests during ingestion
    pub parallel_requests: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            dimensions: 768,
            parallel_requests: 4,
        }
    }
}

/// Document splitting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Maximum segment size in characters
    pub max_segment_size: usize,
    /// Overlap between consecutive segments in characters
    pub segment_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_segment_size: 500,
            segment_overlap: 0,
        }
    }
}

/// LLM (Ollama) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Ollama base URL
    pub base_url: String,
    /// Embedding model name
    pub embed_model: String,
    /// Chat model name
    pub chat_model: String,
    /// Temperature for generation
    pub temperature: f32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Number of retries for failed requests
    pub max_retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            embed_model: "nomic-embed-text".to_string(),
            chat_model: "llama3.2:3b".to_string(),
            temperature: 0.3,
            timeout_secs: 120,
            max_retries: 2,
        }
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Number of segments handed to the model per question
    pub max_results: usize,
    /// Minimum similarity (0.0-1.0) for a segment to be used
    pub min_score: f32,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            max_results: 10,
            min_score: 0.0,
        }
    }
}

/// Chat memory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Messages kept per session (user and assistant turns both count)
    pub max_messages: usize,
    /// Sessions kept before the least recently used one is forgotten
    pub max_sessions: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            max_messages: 10,
            max_sessions: 10_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults_match_recommended_pipeline() {
        let config = RagConfig::default();
        assert_eq!(config.chunking.max_segment_size, 500);
        assert_eq!(config.chunking.segment_overlap, 0);
        assert_eq!(config.retrieval.max_results, 10);
        assert_eq!(config.dataset.skip_leading_rows, 0);
        assert_eq!(config.dataset.source_name, "movies.csv");
        assert!(config.dataset.path.ends_with("resources/movies.csv"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = RagConfig::from_toml_str(
            r#"
            [server]
            port = 9090

            [dataset]
            skip_leading_rows = 1
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.dataset.skip_leading_rows, 1);
        assert_eq!(config.llm.embed_model, "nomic-embed-text");
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[llm]\nchat_model = \"mistral\"").unwrap();

        let config = RagConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.llm.chat_model, "mistral");
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = RagConfig::from_file(Path::new("/nonexistent/moviemuse.toml")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("MOVIEMUSE_PORT", "3000"),
            ("MOVIEMUSE_DATASET", "/data/movies.csv"),
            ("OLLAMA_BASE_URL", "http://ollama:11434"),
            ("MOVIEMUSE_CHAT_MODEL", "phi3"),
        ]
        .into_iter()
        .collect();

        let mut config = RagConfig::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.dataset.path, PathBuf::from("/data/movies.csv"));
        assert_eq!(config.llm.base_url, "http://ollama:11434");
        assert_eq!(config.llm.chat_model, "phi3");
        assert_eq!(config.llm.embed_model, "nomic-embed-text");
    }

    #[test]
    fn test_invalid_port_is_ignored() {
        let mut config = RagConfig::default();
        config.apply_overrides(|key| (key == "MOVIEMUSE_PORT").then(|| "not-a-port".to_string()));
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_validate_bounds_retries_and_sessions() {
        let mut config = RagConfig::default();
        config.llm.max_retries = MAX_RETRIES + 1;
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let mut config = RagConfig::default();
        config.memory.max_sessions = 0;
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_rejects_overlap_not_below_size() {
        let mut config = RagConfig::default();
        config.chunking.segment_overlap = 500;
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }
}
