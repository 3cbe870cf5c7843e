//! Language-model collaborators
//!
//! Embedding and completion are consumed through these traits so every
//! pipeline receives its clients explicitly. `OllamaClient` implements both;
//! tests plug in deterministic stand-ins.

pub mod cache;

use crate::errors::Result;
use async_trait::async_trait;

pub use cache::CachedEmbedder;

/// Single-text embedding
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed one text into a fixed-length vector
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

/// Single free-form text completion
#[async_trait]
pub trait CompletionModel: Send + Sync {
    /// Complete a prompt and return the generated text
    async fn complete(&self, prompt: &str) -> Result<String>;
}

#[async_trait]
impl<T: Embedder + ?Sized> Embedder for std::sync::Arc<T> {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        (**self).embed(text).await
    }
}

#[async_trait]
impl<T: CompletionModel + ?Sized> CompletionModel for std::sync::Arc<T> {
    async fn complete(&self, prompt: &str) -> Result<String> {
        (**self).complete(prompt).await
    }
}
