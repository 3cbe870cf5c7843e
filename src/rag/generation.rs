//! Single-shot retrieval-augmented generation
//!
//! retrieve once -> join chunk texts -> fill template -> complete once

use std::sync::Arc;

use serde_json::Value;

use crate::errors::Result;
use crate::llm::CompletionModel;
use crate::rag::context::ContextBuilder;
use crate::rag::retrieval::Retriever;
use crate::rag::store::KnowledgeStore;
use crate::types::GenerationResult;

/// Default number of chunks placed in the prompt
pub const DEFAULT_GENERATION_TOP_K: usize = 3;

/// Retrieve-then-complete generator
#[derive(Clone)]
pub struct SimpleGenerator {
    retriever: Arc<dyn Retriever>,
    completion: Arc<dyn CompletionModel>,
    context_builder: ContextBuilder,
    top_k: usize,
}

impl SimpleGenerator {
    pub fn new(retriever: Arc<dyn Retriever>, completion: Arc<dyn CompletionModel>) -> Self {
        Self {
            retriever,
            completion,
            context_builder: ContextBuilder::new(),
            top_k: DEFAULT_GENERATION_TOP_K,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Answer `question` from one retrieval. Collaborator errors propagate.
    pub async fn generate(&self, question: &str, store: &KnowledgeStore) -> Result<GenerationResult> {
        let retrieved = self.retriever.retrieve(question, store, self.top_k).await?;
        let context = self.context_builder.build(store, &retrieved.sources)?;
        let prompt = self.context_builder.augment_prompt(question, &context.text);

        tracing::debug!(
            chunks = context.document_count,
            prompt_chars = prompt.len(),
            "simple generation prompt ready"
        );

        let answer = self.completion.complete(&prompt).await?;

        Ok(GenerationResult::new(answer.trim())
            .with_sources(context.document_ids)
            .with_metadata("strategy", Value::from("simple"))
            .with_metadata("searches", Value::from(1))
            .with_metadata("incomplete", Value::from(false)))
    }
}
