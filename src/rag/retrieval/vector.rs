//! Embedding retrieval
//!
//! Embeds the query once and ranks every stored vector by cosine similarity.

use super::{cosine_similarity_batch, rank, validate_query, Retriever};
use crate::errors::{RagError, Result};
use crate::llm::Embedder;
use crate::rag::store::KnowledgeStore;
use crate::types::RetrievalResult;
use async_trait::async_trait;
use std::sync::Arc;

/// Cosine-similarity retriever over an embedded store
#[derive(Clone)]
pub struct VectorRetriever {
    embedder: Arc<dyn Embedder>,
}

impl VectorRetriever {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self { embedder }
    }

    pub fn embedder(&self) -> &Arc<dyn Embedder> {
        &self.embedder
    }
}

#[async_trait]
impl Retriever for VectorRetriever {
    fn strategy(&self) -> &'static str {
        "vector"
    }

    async fn retrieve(
        &self,
        query: &str,
        store: &KnowledgeStore,
        top_k: usize,
    ) -> Result<RetrievalResult> {
        validate_query(query)?;
        if top_k == 0 || store.is_empty() {
            return Ok(RetrievalResult::empty(self.strategy()));
        }
        if !store.is_embedded() {
            return Err(RagError::InvalidInput(
                "vector retrieval needs an embedded store".to_string(),
            ));
        }

        let query_vector = self.embedder.embed(query).await?;

        let (ids, vectors): (Vec<&str>, Vec<&[f32]>) = store
            .iter()
            .filter_map(|chunk| {
                chunk
                    .embedding
                    .as_deref()
                    .map(|embedding| (chunk.id.as_str(), embedding))
            })
            .unzip();

        let similarities = cosine_similarity_batch(&query_vector, &vectors)?;
        let scored = ids.into_iter().zip(similarities).collect();

        let result = rank(self.strategy(), scored, top_k);
        tracing::debug!(query, returned = result.len(), "vector retrieval");
        Ok(result)
    }
}
