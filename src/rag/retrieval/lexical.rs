//! Word-overlap retrieval
//!
//! A chunk's score is the number of its tokens (with repetition) that appear
//! in the query's token set. Tokens are lowercased whitespace splits with no
//! punctuation stripping.

use super::{rank, validate_query, Retriever};
use crate::errors::Result;
use crate::rag::store::KnowledgeStore;
use crate::types::RetrievalResult;
use async_trait::async_trait;
use std::collections::HashSet;

/// Lexical overlap retriever
#[derive(Debug, Clone, Copy, Default)]
pub struct LexicalRetriever;

impl LexicalRetriever {
    pub fn new() -> Self {
        Self
    }

    /// Overlap score of `text` against a prepared query token set
    pub fn score(query_tokens: &HashSet<String>, text: &str) -> u32 {
        text.split_whitespace()
            .filter(|token| query_tokens.contains(&token.to_lowercase()))
            .count() as u32
    }

    /// Lowercased whitespace tokens as a set
    pub fn token_set(text: &str) -> HashSet<String> {
        text.split_whitespace().map(str::to_lowercase).collect()
    }

    /// Synchronous ranking, shared by the async trait method
    pub fn search(&self, query: &str, store: &KnowledgeStore, top_k: usize) -> Result<RetrievalResult> {
        validate_query(query)?;
        if top_k == 0 || store.is_empty() {
            return Ok(RetrievalResult::empty(self.strategy()));
        }

        let query_tokens = Self::token_set(query);
        let scored = store
            .iter()
            .map(|chunk| (chunk.id.as_str(), Self::score(&query_tokens, &chunk.content)))
            .collect();

        let result = rank(self.strategy(), scored, top_k);
        tracing::debug!(query, returned = result.len(), "lexical retrieval");
        Ok(result)
    }
}

#[async_trait]
impl Retriever for LexicalRetriever {
    fn strategy(&self) -> &'static str {
        "lexical"
    }

    async fn retrieve(
        &self,
        query: &str,
        store: &KnowledgeStore,
        top_k: usize,
    ) -> Result<RetrievalResult> {
        self.search(query, store, top_k)
    }
}
