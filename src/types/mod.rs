//! Type definitions module
//!
//! Core data model: chunks, retrieval/generation results and the
//! structured decisions exchanged with the agent's decision step.

pub mod chunk;
pub mod messages;
pub mod results;

// Re-export commonly used types
pub use chunk::{Chunk, RawChunk};
pub use messages::Decision;
pub use results::{GenerationResult, RetrievalResult};
