//! Ollama API client for embeddings and chat with retry logic

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;

use crate::config::LlmConfig;
use crate::error::{Error, Result};
use crate::types::ChatMessage;

/// Ollama API client with automatic retry
pub struct OllamaClient {
    /// HTTP client
    client: Client,
    /// Configuration
    config: LlmConfig,
    /// Base delay of the exponential back-off
    retry_base_delay: Duration,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
    options: ChatOptions,
}

#[derive(Serialize)]
struct ChatOptions {
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ChatMessage,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embedding: Vec<f32>,
}

impl OllamaClient {
    /// Create a new Ollama client with retry support
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(5)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config: config.clone(),
            retry_base_delay: Duration::from_secs(1),
        })
    }

    /// Override the back-off base delay
    pub fn with_retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// Delay before retrying after the given failed attempt (0-based)
    fn backoff_delay(&self, attempt: u32) -> Duration {
        self.retry_base_delay
            .saturating_mul(2u32.saturating_pow(attempt))
    }

    /// Retry a request with exponential backoff
    async fn retry_request<F, Fut, T>(&self, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let max_retries = self.config.max_retries;
        let mut last_error = None;

        for attempt in 0..=max_retries {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    if attempt < max_retries {
                        let delay = self.backoff_delay(attempt);
                        tracing::warn!(
                            "Request failed (attempt {}/{}): {}; retrying in {:?}",
                            attempt + 1,
                            max_retries + 1,
                            e,
                            delay
                        );
                        sleep(delay).await;
                    }
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| Error::llm("Unknown error")))
    }

    /// Check if Ollama is available
    pub async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/api/tags", self.config.base_url);

        match self.client.get(&url).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    /// Generate an embedding using Ollama with retry
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let url = format!("{}/api/embeddings", self.config.base_url);
        let request = EmbedRequest {
            model: &self.config.embed_model,
            prompt: text,
        };
        let (client, url, request) = (&self.client, url.as_str(), &request);

        self.retry_request(|| async move {
            let response = client
                .post(url)
                .json(request)
                .send()
                .await
                .map_err(|e| Error::embedding(format!("Embedding request failed: {}", e)))?;

            if !response.status().is_success() {
                return Err(Error::embedding(format!(
                    "Embedding failed: HTTP {}",
                    response.status()
                )));
            }

            let embed_response: EmbedResponse = response
                .json()
                .await
                .map_err(|e| Error::embedding(format!("Failed to parse embedding response: {}", e)))?;

            Ok(embed_response.embedding)
        })
        .await
    }

    /// Send a conversation to the chat model and return the reply
    pub async fn chat(&self, messages: &[ChatMessage]) -> Result<String> {
        let url = format!("{}/api/chat", self.config.base_url);
        let request = ChatRequest {
            model: &self.config.chat_model,
            messages,
            stream: false,
            options: ChatOptions {
                temperature: self.config.temperature,
            },
        };

        tracing::info!(
            "Generating answer with model: {} ({} messages)",
            self.config.chat_model,
            messages.len()
        );

        let (client, url, request) = (&self.client, url.as_str(), &request);

        self.retry_request(|| async move {
            let response = client
                .post(url)
                .json(request)
                .send()
                .await
                .map_err(|e| Error::llm(format!("Chat request failed: {}", e)))?;

            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                return Err(Error::llm(format!("Chat failed: HTTP {} - {}", status, body)));
            }

            let chat_response: ChatResponse = response
                .json()
                .await
                .map_err(|e| Error::llm(format!("Failed to parse chat response: {}", e)))?;

            Ok(chat_response.message.content)
        })
        .await
    }
}
