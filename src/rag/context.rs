//! Context builder for retrieval-augmented prompts

use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::rag::store::KnowledgeStore;

/// Separator between chunk texts in a context block
pub const CONTEXT_SEPARATOR: &str = "\n\n";

/// Assembled context for prompt augmentation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssembledContext {
    /// Chunk texts joined in ranked order
    pub text: String,
    /// Number of chunks included
    pub document_count: usize,
    /// Chunk ids included, same order as `text`
    pub document_ids: Vec<String>,
}

impl AssembledContext {
    pub fn is_empty(&self) -> bool {
        self.document_count == 0
    }
}

/// Builds context blocks and the answer prompt
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextBuilder;

impl ContextBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Look up `ids` in `store` and join their texts
    ///
    /// Every id must exist in the store.
    pub fn build(&self, store: &KnowledgeStore, ids: &[String]) -> Result<AssembledContext> {
        let texts = store.contents_of(ids)?;

        Ok(AssembledContext {
            text: Self::join(&texts),
            document_count: texts.len(),
            document_ids: ids.to_vec(),
        })
    }

    /// Join texts with a blank line between them
    pub fn join<S: AsRef<str>>(texts: &[S]) -> String {
        texts
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(CONTEXT_SEPARATOR)
    }

    /// Fill the answer template with a context block and question
    pub fn augment_prompt(&self, question: &str, context: &str) -> String {
        format!(
            "Here is relevant information:\n\n{}\n\nQuestion: {}\n\nAnswer:",
            context, question
        )
    }
}
