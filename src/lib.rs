//! ragworkshop - retrieval-augmented generation, one exercise at a time
//!
//! # Architecture
//!
//! - **Retrieval**: word-overlap and embedding retrievers over a [`rag::KnowledgeStore`]
//! - **Generation**: one-shot retrieve-then-complete ([`rag::SimpleGenerator`])
//! - **Agentic**: a bounded ReAct loop ([`agent::ReactAgent`]) that searches through a tool registry
//! - **Harness**: grades each exercise against a corpus's test cases

pub mod errors;
pub mod types;
pub mod config;
pub mod llm;
pub mod streaming;
pub mod rag;
pub mod tools;
pub mod agent;
pub mod harness;
pub mod workshop;

// Command-line surface
pub mod cli;
pub mod doctor;

pub use errors::{RagError, Result};
