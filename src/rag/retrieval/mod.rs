//! Retrieval strategies
//!
//! Both strategies score every chunk in the store against the query and
//! return the top-K ids. Ranking is a stable descending sort, so equal scores
//! keep the store's insertion order.

pub mod lexical;
pub mod similarity;
pub mod vector;

use crate::errors::{RagError, Result};
use crate::rag::store::KnowledgeStore;
use crate::types::RetrievalResult;
use async_trait::async_trait;
use serde_json::Value;

pub use lexical::LexicalRetriever;
pub use similarity::{cosine_similarity, cosine_similarity_batch};
pub use vector::VectorRetriever;

/// Scores a store against a query
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Strategy name recorded in result metadata
    fn strategy(&self) -> &'static str;

    /// Return at most `top_k` ids ordered by descending relevance
    async fn retrieve(
        &self,
        query: &str,
        store: &KnowledgeStore,
        top_k: usize,
    ) -> Result<RetrievalResult>;
}

#[async_trait]
impl<T: Retriever + ?Sized> Retriever for std::sync::Arc<T> {
    fn strategy(&self) -> &'static str {
        (**self).strategy()
    }

    async fn retrieve(
        &self,
        query: &str,
        store: &KnowledgeStore,
        top_k: usize,
    ) -> Result<RetrievalResult> {
        (**self).retrieve(query, store, top_k).await
    }
}

/// Reject empty and whitespace-only queries
pub fn validate_query(query: &str) -> Result<()> {
    if query.trim().is_empty() {
        return Err(RagError::InvalidInput("query must not be empty".to_string()));
    }
    Ok(())
}

/// Stable top-K ranking of `(id, score)` pairs in store order
///
/// Scores are ordered with `total_cmp`; NaN ranks below every real score.
pub(crate) fn rank<S>(strategy: &str, mut scored: Vec<(&str, S)>, top_k: usize) -> RetrievalResult
where
    S: Copy + Into<f64>,
{
    let as_f64 = |score: S| -> f64 {
        let score: f64 = score.into();
        if score.is_nan() {
            f64::NEG_INFINITY
        } else {
            score
        }
    };
    scored.sort_by(|a, b| as_f64(b.1).total_cmp(&as_f64(a.1)));
    scored.truncate(top_k);

    let scores: Vec<Value> = scored.iter().map(|(_, s)| Value::from(as_f64(*s))).collect();
    let sources = scored.into_iter().map(|(id, _)| id.to_string()).collect();

    RetrievalResult::new(sources)
        .with_metadata("strategy", Value::from(strategy))
        .with_metadata("scores", Value::Array(scores))
}
