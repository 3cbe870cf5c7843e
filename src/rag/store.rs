//! In-memory knowledge store
//!
//! Insertion-ordered map from chunk id to chunk. Built once by a
//! preprocessing step and read-only afterwards, so a single store can be
//! shared across concurrent questions behind an `Arc`.

use crate::errors::{RagError, Result};
use crate::llm::Embedder;
use crate::types::{Chunk, RawChunk};
use futures_util::{stream, StreamExt, TryStreamExt};
use std::collections::{HashMap, HashSet};

/// Read-only chunk store
#[derive(Debug, Clone, Default)]
pub struct KnowledgeStore {
    /// Chunks in insertion order (iteration order for tie-breaking)
    chunks: Vec<Chunk>,

    /// id -> position in `chunks`
    index: HashMap<String, usize>,
}

impl KnowledgeStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from prepared chunks, rejecting duplicate ids
    pub fn from_chunks(chunks: Vec<Chunk>) -> Result<Self> {
        let mut index = HashMap::with_capacity(chunks.len());
        for (position, chunk) in chunks.iter().enumerate() {
            if index.insert(chunk.id.clone(), position).is_some() {
                return Err(RagError::DuplicateChunk(chunk.id.clone()));
            }
        }

        let store = Self { chunks, index };
        store.check_dimensions()?;
        Ok(store)
    }

    /// Lexical preprocessing: identity transform
    pub fn lexical(raw: &[RawChunk]) -> Result<Self> {
        let store = Self::from_chunks(raw.iter().cloned().map(Chunk::from).collect())?;
        tracing::debug!(chunks = store.len(), "lexical store ready");
        Ok(store)
    }

    /// Vector preprocessing: one embedding call per chunk
    ///
    /// Calls run concurrently (at most `concurrency` in flight) and results
    /// are assembled in input order. Any failure fails the whole store.
    pub async fn embedded<E>(raw: &[RawChunk], embedder: &E, concurrency: usize) -> Result<Self>
    where
        E: Embedder + ?Sized,
    {
        // Fail fast on duplicates before spending embedding calls
        let mut seen = HashSet::with_capacity(raw.len());
        for chunk in raw {
            if !seen.insert(chunk.chunk_id.as_str()) {
                return Err(RagError::DuplicateChunk(chunk.chunk_id.clone()));
            }
        }

        let pending: Vec<_> = raw
            .iter()
            .map(|chunk| embedder.embed(&chunk.chunk_content))
            .collect();

        let embeddings: Vec<Vec<f32>> = stream::iter(pending)
            .buffered(concurrency.max(1))
            .try_collect()
            .await?;

        let chunks = raw
            .iter()
            .zip(embeddings)
            .map(|(chunk, embedding)| {
                Chunk::embedded(chunk.chunk_id.clone(), chunk.chunk_content.clone(), embedding)
            })
            .collect();

        let store = Self::from_chunks(chunks)?;
        tracing::debug!(
            chunks = store.len(),
            dimension = store.dimension().unwrap_or(0),
            "vector store ready"
        );
        Ok(store)
    }

    /// Every embedded chunk must share one dimension
    fn check_dimensions(&self) -> Result<()> {
        let mut expected: Option<usize> = None;
        for embedding in self.chunks.iter().filter_map(|c| c.embedding.as_ref()) {
            match expected {
                None => expected = Some(embedding.len()),
                Some(dim) if dim != embedding.len() => {
                    return Err(RagError::DimensionMismatch {
                        expected: dim,
                        actual: embedding.len(),
                    });
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    /// Get chunk by id
    pub fn get(&self, id: &str) -> Option<&Chunk> {
        self.index.get(id).map(|&position| &self.chunks[position])
    }

    /// Get chunk text by id
    pub fn content(&self, id: &str) -> Option<&str> {
        self.get(id).map(|chunk| chunk.content.as_str())
    }

    /// Texts for `ids` in the given order
    pub fn contents_of<S: AsRef<str>>(&self, ids: &[S]) -> Result<Vec<&str>> {
        ids.iter()
            .map(|id| {
                self.content(id.as_ref())
                    .ok_or_else(|| RagError::UnknownChunk(id.as_ref().to_string()))
            })
            .collect()
    }

    /// Check if chunk exists
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Chunks in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.iter()
    }

    /// Chunk ids in insertion order
    pub fn ids(&self) -> Vec<&str> {
        self.chunks.iter().map(|c| c.id.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// True when every chunk carries an embedding
    pub fn is_embedded(&self) -> bool {
        self.chunks.iter().all(Chunk::has_embedding)
    }

    /// Embedding dimension, if any chunk is embedded
    pub fn dimension(&self) -> Option<usize> {
        self.chunks
            .iter()
            .find_map(|c| c.embedding.as_ref().map(Vec::len))
    }
}
