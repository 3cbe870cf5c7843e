//! Retrieval-augmented generation
//!
//! Components:
//! - Store: read-only chunk store built by preprocessing
//! - Retrieval: lexical and vector retrievers
//! - Context: context blocks and the answer prompt
//! - Generation: single-shot retrieve-then-complete
//! - Pipeline: the four workshop exercises

pub mod context;
pub mod generation;
pub mod pipeline;
pub mod retrieval;
pub mod store;

// Re-export key types
pub use context::{AssembledContext, ContextBuilder};
pub use generation::SimpleGenerator;
pub use pipeline::{
    AgenticRagPipeline, EmbeddingPipeline, PipelineKind, RagPipeline, SimpleRagPipeline,
    WordOverlapPipeline,
};
pub use retrieval::{LexicalRetriever, Retriever, VectorRetriever};
pub use store::KnowledgeStore;
