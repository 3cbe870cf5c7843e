//! Exercise pipelines
//!
//! Every exercise exposes `preprocess` and `retrieve`; the generation
//! exercises add `generate`. Retrieval-only exercises keep the default
//! `generate`, which reports `Unimplemented` so the harness can tell
//! "not provided" apart from "wrong answer".

use async_trait::async_trait;
use std::sync::Arc;

use crate::agent::ReactAgent;
use crate::errors::{RagError, Result};
use crate::llm::Embedder;
use crate::rag::generation::SimpleGenerator;
use crate::rag::retrieval::{LexicalRetriever, Retriever, VectorRetriever};
use crate::rag::store::KnowledgeStore;
use crate::types::{GenerationResult, RawChunk, RetrievalResult};

/// Default number of embedding calls in flight during preprocessing
pub const DEFAULT_EMBED_CONCURRENCY: usize = 8;

/// What an exercise is graded on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineKind {
    /// Graded on `retrieve`
    Retrieval,
    /// Graded on `generate`
    Generation,
}

/// One workshop exercise
#[async_trait]
pub trait RagPipeline: Send + Sync {
    /// Exercise name, used in error messages and reports
    fn name(&self) -> &'static str;

    fn kind(&self) -> PipelineKind;

    /// Build the knowledge store for this exercise
    async fn preprocess(&self, chunks: &[RawChunk]) -> Result<KnowledgeStore>;

    /// Top-K chunk ids for `query`
    async fn retrieve(
        &self,
        query: &str,
        store: &KnowledgeStore,
        top_k: usize,
    ) -> Result<RetrievalResult>;

    /// Answer `question` from `store`
    async fn generate(&self, question: &str, store: &KnowledgeStore) -> Result<GenerationResult> {
        tracing::debug!(question, chunks = store.len(), "generate called on retrieval exercise");
        Err(RagError::unimplemented(self.name(), "generate"))
    }
}

/// Exercise 1: word-overlap retrieval
#[derive(Debug, Clone, Copy, Default)]
pub struct WordOverlapPipeline {
    retriever: LexicalRetriever,
}

impl WordOverlapPipeline {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RagPipeline for WordOverlapPipeline {
    fn name(&self) -> &'static str {
        "word-overlap"
    }

    fn kind(&self) -> PipelineKind {
        PipelineKind::Retrieval
    }

    async fn preprocess(&self, chunks: &[RawChunk]) -> Result<KnowledgeStore> {
        KnowledgeStore::lexical(chunks)
    }

    async fn retrieve(
        &self,
        query: &str,
        store: &KnowledgeStore,
        top_k: usize,
    ) -> Result<RetrievalResult> {
        self.retriever.retrieve(query, store, top_k).await
    }
}

/// Exercise 2: embedding retrieval
#[derive(Clone)]
pub struct EmbeddingPipeline {
    embedder: Arc<dyn Embedder>,
    retriever: Arc<VectorRetriever>,
    concurrency: usize,
}

impl EmbeddingPipeline {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            retriever: Arc::new(VectorRetriever::new(embedder.clone())),
            embedder,
            concurrency: DEFAULT_EMBED_CONCURRENCY,
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Shared vector retriever, for layering generation on top
    pub fn retriever(&self) -> Arc<VectorRetriever> {
        self.retriever.clone()
    }
}

#[async_trait]
impl RagPipeline for EmbeddingPipeline {
    fn name(&self) -> &'static str {
        "embedding"
    }

    fn kind(&self) -> PipelineKind {
        PipelineKind::Retrieval
    }

    async fn preprocess(&self, chunks: &[RawChunk]) -> Result<KnowledgeStore> {
        KnowledgeStore::embedded(chunks, self.embedder.as_ref(), self.concurrency).await
    }

    async fn retrieve(
        &self,
        query: &str,
        store: &KnowledgeStore,
        top_k: usize,
    ) -> Result<RetrievalResult> {
        self.retriever.retrieve(query, store, top_k).await
    }
}

/// Step 2, exercise 1: retrieve once, then complete
#[derive(Clone)]
pub struct SimpleRagPipeline {
    embedding: EmbeddingPipeline,
    generator: SimpleGenerator,
}

impl SimpleRagPipeline {
    pub fn new(embedding: EmbeddingPipeline, generator: SimpleGenerator) -> Self {
        Self { embedding, generator }
    }
}

#[async_trait]
impl RagPipeline for SimpleRagPipeline {
    fn name(&self) -> &'static str {
        "simple-rag"
    }

    fn kind(&self) -> PipelineKind {
        PipelineKind::Generation
    }

    async fn preprocess(&self, chunks: &[RawChunk]) -> Result<KnowledgeStore> {
        self.embedding.preprocess(chunks).await
    }

    async fn retrieve(
        &self,
        query: &str,
        store: &KnowledgeStore,
        top_k: usize,
    ) -> Result<RetrievalResult> {
        self.embedding.retrieve(query, store, top_k).await
    }

    async fn generate(&self, question: &str, store: &KnowledgeStore) -> Result<GenerationResult> {
        self.generator.generate(question, store).await
    }
}

/// Step 2, exercise 2: ReAct agent with a search tool
#[derive(Clone)]
pub struct AgenticRagPipeline {
    embedding: EmbeddingPipeline,
    agent: ReactAgent,
}

impl AgenticRagPipeline {
    pub fn new(embedding: EmbeddingPipeline, agent: ReactAgent) -> Self {
        Self { embedding, agent }
    }

    pub fn agent(&self) -> &ReactAgent {
        &self.agent
    }
}

#[async_trait]
impl RagPipeline for AgenticRagPipeline {
    fn name(&self) -> &'static str {
        "agentic-rag"
    }

    fn kind(&self) -> PipelineKind {
        PipelineKind::Generation
    }

    async fn preprocess(&self, chunks: &[RawChunk]) -> Result<KnowledgeStore> {
        self.embedding.preprocess(chunks).await
    }

    async fn retrieve(
        &self,
        query: &str,
        store: &KnowledgeStore,
        top_k: usize,
    ) -> Result<RetrievalResult> {
        tracing::info!(query, "agent retrieval");
        self.embedding.retrieve(query, store, top_k).await
    }

    async fn generate(&self, question: &str, store: &KnowledgeStore) -> Result<GenerationResult> {
        self.agent.generate(question, store).await
    }
}
