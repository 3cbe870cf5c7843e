//! Ollama API client
//!
//! Backs both collaborators the workshop needs:
//! - completion: POST /api/generate, streamed NDJSON accumulated into one string
//! - embedding:  POST /api/embeddings
//!
//! The client is constructed by the caller and handed to pipelines explicitly.

use crate::config::OllamaConfig;
use crate::errors::{RagError, Result};
use crate::llm::{CompletionModel, Embedder};
use crate::streaming::parser::JsonParser;
use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default Ollama API endpoint
pub const DEFAULT_OLLAMA_URL: &str = "http://127.0.0.1:11434";

/// Default completion model
pub const DEFAULT_MODEL: &str = "qwen2.5:7b-instruct";

/// Default embedding model
pub const DEFAULT_EMBEDDING_MODEL: &str = "nomic-embed-text";

/// Request timeout (60 seconds)
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Ollama client for completions and embeddings
#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
    embedding_model: String,
}

impl OllamaClient {
    /// Create new Ollama client with default settings
    pub fn new() -> Result<Self> {
        Self::with_config(DEFAULT_OLLAMA_URL, DEFAULT_MODEL, DEFAULT_EMBEDDING_MODEL)
    }

    /// Create Ollama client with custom configuration
    pub fn with_config(base_url: &str, model: &str, embedding_model: &str) -> Result<Self> {
        Self::build(base_url, model, embedding_model, REQUEST_TIMEOUT)
    }

    /// Create from the `[ollama]` config section
    pub fn from_config(config: &OllamaConfig) -> Result<Self> {
        Self::build(
            &config.base_url(),
            &config.completion_model,
            &config.embedding_model,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    fn build(base_url: &str, model: &str, embedding_model: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            embedding_model: embedding_model.to_string(),
        })
    }

    /// Generate streaming response from Ollama
    ///
    /// # Returns
    /// Stream of byte chunks
    pub async fn generate_stream(
        &self,
        prompt: String,
    ) -> Result<impl futures_util::Stream<Item = Result<Vec<u8>>>> {
        let url = format!("{}/api/generate", self.base_url);

        let request = OllamaGenerateRequest {
            model: self.model.clone(),
            prompt,
            stream: true,
            options: None,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(completion_transport_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(RagError::Completion {
                message: format!("HTTP {}: {}", status, error_text),
                recoverable: is_transient(status),
            });
        }

        let stream = response.bytes_stream().map(|result| {
            result
                .map(|bytes| bytes.to_vec())
                .map_err(completion_transport_error)
        });

        Ok(stream)
    }

    /// Embed a text with the configured embedding model
    pub async fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
        let url = format!("{}/api/embeddings", self.base_url);

        let request = OllamaEmbeddingRequest {
            model: &self.embedding_model,
            prompt: text,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| RagError::Embedding(format!("Failed to send request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(RagError::Embedding(format!("HTTP {}: {}", status, error_text)));
        }

        let body: OllamaEmbeddingResponse = response
            .json()
            .await
            .map_err(|e| RagError::Embedding(format!("Failed to parse embedding: {}", e)))?;

        if body.embedding.is_empty() {
            return Err(RagError::Embedding(format!(
                "Model '{}' returned an empty embedding",
                self.embedding_model
            )));
        }

        Ok(body.embedding)
    }

    /// Check if Ollama is available
    pub async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/api/version", self.base_url);

        match self.client.get(&url).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    /// List available models
    pub async fn list_models(&self) -> Result<Vec<String>> {
        let url = format!("{}/api/tags", self.base_url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(RagError::Completion {
                message: format!("Failed to retrieve model list: HTTP {}", response.status()),
                recoverable: false,
            });
        }

        let models_response: ModelsResponse = response.json().await?;

        Ok(models_response
            .models
            .into_iter()
            .map(|m| m.name)
            .collect())
    }

    /// Get completion model name
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Get embedding model name
    pub fn embedding_model(&self) -> &str {
        &self.embedding_model
    }

    /// Get base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl CompletionModel for OllamaClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let stream = self.generate_stream(prompt.to_string()).await?;
        let text = read_completion(Box::pin(stream)).await?;
        tracing::debug!(model = %self.model, chars = text.len(), "completion finished");
        Ok(text)
    }
}

/// Concatenate `response` fields of an `/api/generate` stream up to `done`
///
/// A stream that closes before `done` is a recoverable completion error.
async fn read_completion<S>(mut stream: S) -> Result<String>
where
    S: futures_util::Stream<Item = Result<Vec<u8>>> + Unpin,
{
    let mut parser = JsonParser::new();
    let mut text = String::new();

    while let Some(bytes) = stream.next().await {
        let bytes = bytes?;
        let mut next = parser.add_bytes(&bytes)?;

        while let Some(object) = next {
            let chunk = JsonParser::parse_generate_chunk(&object)?;
            if let Some(error) = chunk.error {
                return Err(RagError::Completion {
                    message: error,
                    recoverable: false,
                });
            }
            text.push_str(&chunk.response);
            if chunk.done {
                return Ok(text);
            }
            next = parser.next_object();
        }
    }

    tracing::warn!(chars = text.len(), "completion stream ended early");
    Err(RagError::Completion {
        message: format!("stream closed before completion ({} chars received)", text.len()),
        recoverable: true,
    })
}

#[async_trait]
impl Embedder for OllamaClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_text(text).await
    }
}

fn completion_transport_error(e: reqwest::Error) -> RagError {
    RagError::Completion {
        message: format!("Failed to reach Ollama: {}", e),
        recoverable: e.is_timeout(),
    }
}

fn is_transient(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// Ollama generate request
#[derive(Debug, Clone, Serialize)]
struct OllamaGenerateRequest {
    model: String,
    prompt: String,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<serde_json::Value>,
}

/// Ollama embeddings request
#[derive(Debug, Serialize)]
struct OllamaEmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

/// Ollama embeddings response
#[derive(Debug, Deserialize)]
struct OllamaEmbeddingResponse {
    #[serde(default)]
    embedding: Vec<f32>,
}

/// Ollama models list response
#[derive(Debug, Deserialize)]
struct ModelsResponse {
    models: Vec<ModelInfo>,
}

/// Model information
#[derive(Debug, Deserialize)]
struct ModelInfo {
    name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = OllamaClient::new().unwrap();
        assert_eq!(client.model(), DEFAULT_MODEL);
        assert_eq!(client.embedding_model(), DEFAULT_EMBEDDING_MODEL);
        assert_eq!(client.base_url(), DEFAULT_OLLAMA_URL);
    }

    #[test]
    fn test_client_with_config() {
        let client =
            OllamaClient::with_config("http://localhost:11434/", "llama3:8b", "mxbai-embed-large")
                .unwrap();
        assert_eq!(client.model(), "llama3:8b");
        assert_eq!(client.embedding_model(), "mxbai-embed-large");
        assert_eq!(client.base_url(), "http://localhost:11434");
    }

    #[test]
    fn test_client_from_config() {
        let config = OllamaConfig::default();
        let client = OllamaClient::from_config(&config).unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:11434");
    }

    #[test]
    fn test_transient_statuses() {
        assert!(is_transient(StatusCode::TOO_MANY_REQUESTS));
        assert!(is_transient(StatusCode::SERVICE_UNAVAILABLE));
        assert!(!is_transient(StatusCode::NOT_FOUND));
    }

    fn frames(frames: &[&str]) -> impl futures_util::Stream<Item = Result<Vec<u8>>> + Unpin {
        let items: Vec<Result<Vec<u8>>> = frames.iter().map(|f| Ok(f.as_bytes().to_vec())).collect();
        futures_util::stream::iter(items)
    }

    #[tokio::test]
    async fn test_read_completion_joins_until_done() {
        let stream = frames(&[
            "{\"response\":\"Hel\",\"done\":false}\n{\"resp",
            "onse\":\"lo\",\"done\":true}\n",
        ]);
        assert_eq!(read_completion(stream).await.unwrap(), "Hello");
    }

    #[tokio::test]
    async fn test_read_completion_rejects_truncated_stream() {
        let stream = frames(&["{\"response\":\"Hel\",\"done\":false}\n"]);
        let err = read_completion(stream).await.unwrap_err();

        assert!(matches!(err, RagError::Completion { recoverable: true, .. }));
    }

    #[tokio::test]
    async fn test_read_completion_surfaces_model_error() {
        let stream = frames(&["{\"error\":\"model not found\"}"]);
        let err = read_completion(stream).await.unwrap_err();

        assert!(matches!(err, RagError::Completion { recoverable: false, ref message } if message == "model not found"));
    }

    #[test]
    fn test_embedding_request_shape() {
        let request = OllamaEmbeddingRequest {
            model: "nomic-embed-text",
            prompt: "hello",
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "nomic-embed-text");
        assert_eq!(json["prompt"], "hello");
    }
}
