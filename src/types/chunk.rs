//! Chunk types
//!
//! A chunk is the atomic retrievable unit: a stable id plus its text and,
//! for vector stores, a precomputed embedding.

use serde::{Deserialize, Serialize};

/// Corpus entry before preprocessing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawChunk {
    pub chunk_id: String,
    pub chunk_content: String,
}

impl RawChunk {
    pub fn new(chunk_id: impl Into<String>, chunk_content: impl Into<String>) -> Self {
        Self {
            chunk_id: chunk_id.into(),
            chunk_content: chunk_content.into(),
        }
    }
}

/// Preprocessed chunk held by the knowledge store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Stable identifier
    pub id: String,

    /// Original text
    pub content: String,

    /// Embedding vector (vector stores only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
}

impl Chunk {
    /// Chunk without an embedding (lexical stores)
    pub fn text(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            embedding: None,
        }
    }

    /// Chunk with a precomputed embedding
    pub fn embedded(id: impl Into<String>, content: impl Into<String>, embedding: Vec<f32>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            embedding: Some(embedding),
        }
    }

    pub fn has_embedding(&self) -> bool {
        self.embedding.is_some()
    }
}

impl From<RawChunk> for Chunk {
    fn from(raw: RawChunk) -> Self {
        Chunk::text(raw.chunk_id, raw.chunk_content)
    }
}
