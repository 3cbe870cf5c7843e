//! Memoising embedder
//!
//! Wraps another embedder and keeps vectors by exact text, so preprocessing
//! the same corpus twice yields identical stores without repeat calls.

use crate::errors::Result;
use crate::llm::Embedder;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Embedder with an in-memory text -> vector cache
pub struct CachedEmbedder<E> {
    inner: E,
    cache: Arc<RwLock<HashMap<String, Vec<f32>>>>,
}

impl<E: Embedder> CachedEmbedder<E> {
    pub fn new(inner: E) -> Self {
        Self {
            inner,
            cache: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of cached vectors
    pub async fn len(&self) -> usize {
        self.cache.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.cache.read().await.is_empty()
    }

    /// Drop every cached vector
    pub async fn clear(&self) {
        self.cache.write().await.clear();
    }
}

#[async_trait]
impl<E: Embedder> Embedder for CachedEmbedder<E> {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if let Some(vector) = self.cache.read().await.get(text) {
            tracing::trace!(chars = text.len(), "embedding cache hit");
            return Ok(vector.clone());
        }

        // Failures are not cached
        let vector = self.inner.embed(text).await?;
        self.cache
            .write()
            .await
            .entry(text.to_string())
            .or_insert_with(|| vector.clone());
        Ok(vector)
    }
}
