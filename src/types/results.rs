//! Retrieval and generation results

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Ranked chunk ids returned by a retriever
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RetrievalResult {
    /// Chunk ids ordered by descending relevance
    pub sources: Vec<String>,

    /// Strategy-specific details (strategy name, scores)
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl RetrievalResult {
    pub fn new(sources: Vec<String>) -> Self {
        Self {
            sources,
            metadata: Map::new(),
        }
    }

    /// Empty result tagged with its strategy
    pub fn empty(strategy: &str) -> Self {
        Self::new(Vec::new()).with_metadata("strategy", Value::from(strategy))
    }

    pub fn with_metadata(mut self, key: &str, value: Value) -> Self {
        self.metadata.insert(key.to_string(), value);
        self
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

/// Answer produced by a generation pipeline
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    /// Natural-language answer
    pub answer: String,

    /// Every chunk id retrieved while answering, first-seen order, no duplicates
    #[serde(default)]
    pub sources: Vec<String>,

    /// strategy, searches, incomplete
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl GenerationResult {
    pub fn new(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            sources: Vec::new(),
            metadata: Map::new(),
        }
    }

    /// Record retrieved ids, skipping ones already present
    pub fn with_sources<I, S>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for source in sources {
            let source = source.into();
            if !self.sources.contains(&source) {
                self.sources.push(source);
            }
        }
        self
    }

    pub fn with_metadata(mut self, key: &str, value: Value) -> Self {
        self.metadata.insert(key.to_string(), value);
        self
    }

    /// True when the agent ran out of budget before a final decision
    pub fn is_incomplete(&self) -> bool {
        self.metadata
            .get("incomplete")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}
