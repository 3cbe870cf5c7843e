//! Knowledge-base search tool
//!
//! Wraps a retriever as the named tool the agent calls. Output is the
//! retrieved chunk texts joined by blank lines.

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::sync::Arc;

use crate::errors::{RagError, Result};
use crate::rag::context::ContextBuilder;
use crate::rag::retrieval::Retriever;
use crate::tools::types::{ToolContext, ToolHandler, ToolOutput, ToolSchema};

/// Registered name of the search tool
pub const SEARCH_TOOL_NAME: &str = "search_knowledge_base";

/// Description shown to the decision step
pub const SEARCH_TOOL_DESCRIPTION: &str = "Search the knowledge base for information relevant to a query. Returns text content from the most relevant chunks. Call multiple times with different queries to gather more context.";

/// Output when a search matches nothing
pub const NO_RESULTS: &str = "No relevant information found.";

/// `search_knowledge_base(query)`
#[derive(Clone)]
pub struct SearchKnowledgeBase {
    retriever: Arc<dyn Retriever>,
    top_k: usize,
}

impl SearchKnowledgeBase {
    pub fn new(retriever: Arc<dyn Retriever>, top_k: usize) -> Self {
        Self { retriever, top_k }
    }

    pub fn schema() -> ToolSchema {
        ToolSchema::new(
            SEARCH_TOOL_NAME,
            SEARCH_TOOL_DESCRIPTION,
            json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "What to look for in the knowledge base"
                    }
                },
                "required": ["query"]
            }),
            true,
        )
    }
}

#[async_trait]
impl ToolHandler for SearchKnowledgeBase {
    async fn invoke(&self, args: &Map<String, Value>, ctx: &ToolContext<'_>) -> Result<ToolOutput> {
        let query = args
            .get("query")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|query| !query.is_empty())
            .ok_or_else(|| RagError::InvalidInput("missing or empty 'query' argument".to_string()))?;

        let retrieved = self.retriever.retrieve(query, ctx.store, self.top_k).await?;
        if retrieved.is_empty() {
            return Ok(ToolOutput::new(NO_RESULTS, Vec::new()));
        }

        let texts = ctx.store.contents_of(&retrieved.sources)?;
        Ok(ToolOutput::new(ContextBuilder::join(&texts), retrieved.sources))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rag::retrieval::LexicalRetriever;
    use crate::rag::store::KnowledgeStore;
    use crate::types::RawChunk;

    fn store() -> KnowledgeStore {
        KnowledgeStore::lexical(&[
            RawChunk::new("1", "cats are mammals"),
            RawChunk::new("2", "dogs are pets"),
            RawChunk::new("3", "cats purr loudly"),
        ])
        .unwrap()
    }

    fn args(query: &str) -> Map<String, Value> {
        let mut args = Map::new();
        args.insert("query".to_string(), Value::from(query));
        args
    }

    #[test]
    fn test_schema() {
        let schema = SearchKnowledgeBase::schema();
        assert_eq!(schema.name, "search_knowledge_base");
        assert!(schema.description.starts_with("Search the knowledge base"));
        assert_eq!(schema.required_params(), vec!["query"]);
    }

    #[tokio::test]
    async fn test_search_joins_texts() {
        let store = store();
        let tool = SearchKnowledgeBase::new(Arc::new(LexicalRetriever::new()), 2);

        let output = tool.invoke(&args("cats"), &ToolContext::new(&store)).await.unwrap();
        assert_eq!(output.text, "cats are mammals\n\ncats purr loudly");
        assert_eq!(output.sources, vec!["1", "3"]);
    }

    #[tokio::test]
    async fn test_missing_query_rejected() {
        let store = store();
        let tool = SearchKnowledgeBase::new(Arc::new(LexicalRetriever::new()), 2);

        let err = tool.invoke(&Map::new(), &ToolContext::new(&store)).await.unwrap_err();
        assert!(matches!(err, RagError::InvalidInput(_)));

        let err = tool.invoke(&args("  "), &ToolContext::new(&store)).await.unwrap_err();
        assert!(matches!(err, RagError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_empty_store_reports_no_results() {
        let store = KnowledgeStore::new();
        let tool = SearchKnowledgeBase::new(Arc::new(LexicalRetriever::new()), 3);

        let output = tool.invoke(&args("cats"), &ToolContext::new(&store)).await.unwrap();
        assert_eq!(output.text, NO_RESULTS);
        assert!(output.sources.is_empty());
    }
}
