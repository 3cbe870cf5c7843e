//! Streaming client module
//!
//! Provides the Ollama API client and the incremental JSON parser.

pub mod client;
pub mod parser;

// Re-export commonly used types
pub use client::{OllamaClient, DEFAULT_EMBEDDING_MODEL, DEFAULT_MODEL, DEFAULT_OLLAMA_URL};
pub use parser::{extract_first_object, GenerateChunk, JsonParser, MAX_BUFFER_SIZE};
