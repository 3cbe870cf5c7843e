//! Error types for the RAG workshop
//!
//! One error enum covers every layer: collaborators (embedding, completion),
//! retrieval input validation, the agent state machine and the harness.

use thiserror::Error;

/// Main error type for workshop pipelines
#[derive(Error, Debug)]
pub enum RagError {
    /// Operation not provided by this exercise (reported as "not implemented", not "failed")
    #[error("{exercise}: {operation}() is not implemented")]
    Unimplemented {
        exercise: String,
        operation: String,
    },

    /// Embedding collaborator errors
    #[error("Embedding failed: {0}")]
    Embedding(String),

    /// Completion collaborator errors
    #[error("Completion failed: {message}")]
    Completion { message: String, recoverable: bool },

    /// Model reply did not contain a usable decision
    #[error("Could not parse agent decision: {0}")]
    DecisionFormat(String),

    /// Invalid caller input (blank query, malformed arguments)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Two chunks share an identifier
    #[error("Duplicate chunk id: {0}")]
    DuplicateChunk(String),

    /// Chunk id not present in the store
    #[error("Unknown chunk id: {0}")]
    UnknownChunk(String),

    /// Embedding vectors of different lengths
    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// State machine transition errors
    #[error("Invalid state transition from {from} to {to}: {reason}")]
    InvalidTransition {
        from: String,
        to: String,
        reason: String,
    },

    /// Tool invocation errors
    #[error("Tool '{tool}' failed: {message}")]
    ToolFailure { tool: String, message: String },

    /// HTTP client errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Corpus loading and validation errors
    #[error("Corpus error: {0}")]
    Corpus(String),
}

impl RagError {
    /// Build an `Unimplemented` error for an exercise operation
    pub fn unimplemented(exercise: impl Into<String>, operation: impl Into<String>) -> Self {
        RagError::Unimplemented {
            exercise: exercise.into(),
            operation: operation.into(),
        }
    }

    /// Whether the harness should report this as "not implemented"
    pub fn is_unimplemented(&self) -> bool {
        matches!(self, RagError::Unimplemented { .. })
    }

    /// Whether the agent loop may keep going after this error
    ///
    /// Completion errors carry their own flag. Transport errors are treated as
    /// unrecoverable since the decision step cannot run without the model.
    pub fn is_recoverable(&self) -> bool {
        match self {
            RagError::Completion { recoverable, .. } => *recoverable,
            RagError::Embedding(_)
            | RagError::InvalidInput(_)
            | RagError::UnknownChunk(_)
            | RagError::DimensionMismatch { .. }
            | RagError::ToolFailure { .. }
            | RagError::DecisionFormat(_) => true,
            _ => false,
        }
    }
}

/// Result type alias for workshop operations
pub type Result<T> = std::result::Result<T, RagError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RagError::DimensionMismatch {
            expected: 768,
            actual: 384,
        };
        assert!(err.to_string().contains("768"));
        assert!(err.to_string().contains("384"));
    }

    #[test]
    fn test_unimplemented_is_distinct() {
        let err = RagError::unimplemented("word-overlap", "generate");
        assert!(err.is_unimplemented());
        assert_eq!(err.to_string(), "word-overlap: generate() is not implemented");

        let err = RagError::Embedding("timeout".to_string());
        assert!(!err.is_unimplemented());
    }

    #[test]
    fn test_recoverability() {
        assert!(RagError::Embedding("down".into()).is_recoverable());
        assert!(RagError::Completion {
            message: "rate limited".into(),
            recoverable: true
        }
        .is_recoverable());
        assert!(!RagError::Completion {
            message: "model missing".into(),
            recoverable: false
        }
        .is_recoverable());
        assert!(!RagError::Config("bad".into()).is_recoverable());
    }

    #[test]
    fn test_invalid_transition_error() {
        let err = RagError::InvalidTransition {
            from: "Acting".to_string(),
            to: "Final".to_string(),
            reason: "Observation pending".to_string(),
        };
        assert!(err.to_string().contains("Acting"));
        assert!(err.to_string().contains("Final"));
    }
}
