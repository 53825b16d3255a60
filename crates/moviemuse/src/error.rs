//! Error types for the MovieMuse service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for MovieMuse operations
pub type Result<T> = std::result::Result<T, Error>;

/// Service errors
#[derive(Debug, Error)]
pub enum Error {
    /// The dataset resource could not be located or opened
    #[error("Resource not found: {resource}")]
    ResourceNotFound { resource: String },

    /// A dataset row could not be parsed
    #[error("Malformed row {row}: {message}")]
    MalformedRow { row: u64, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Rejected client input
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Embedding error
    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    /// Vector store error
    #[error("Vector store error: {0}")]
    VectorDb(String),

    /// Ollama/LLM error
    #[error("LLM error: {0}")]
    Llm(String),

    /// TOML config error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a resource-not-found error
    pub fn resource_not_found(resource: impl Into<String>) -> Self {
        Self::ResourceNotFound {
            resource: resource.into(),
        }
    }

    /// Create a malformed-row error
    pub fn malformed_row(row: u64, message: impl Into<String>) -> Self {
        Self::MalformedRow {
            row,
            message: message.into(),
        }
    }

    /// Create an embedding error
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding(message.into())
    }

    /// Create a vector store error
    pub fn vector_db(message: impl Into<String>) -> Self {
        Self::VectorDb(message.into())
    }

    /// Create an LLM error
    pub fn llm(message: impl Into<String>) -> Self {
        Self::Llm(message.into())
    }

    /// Create an invalid request error
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Short machine-readable kind, used in API error bodies
    pub fn kind(&self) -> &'static str {
        match self {
            Error::ResourceNotFound { .. } => "resource_not_found",
            Error::MalformedRow { .. } => "malformed_row",
            Error::Config(_) => "config_error",
            Error::InvalidRequest(_) => "invalid_request",
            Error::Embedding(_) => "embedding_error",
            Error::VectorDb(_) => "vector_db_error",
            Error::Llm(_) => "llm_error",
            Error::Toml(_) => "toml_error",
            Error::Internal(_) => "internal_error",
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Error::Llm(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }

        let body = Json(json!({
            "error": {
                "type": self.kind(),
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_request_maps_to_bad_request() {
        let response = Error::invalid_request("question must not be empty").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_llm_error_maps_to_service_unavailable() {
        let response = Error::llm("model offline").into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_display_includes_resource_name() {
        let err = Error::resource_not_found("movies.csv");
        assert_eq!(err.to_string(), "Resource not found: movies.csv");
        assert_eq!(err.kind(), "resource_not_found");
    }
}
