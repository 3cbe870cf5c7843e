//! Agentic retrieval
//!
//! State machine, per-run transcript, decision step, and the bounded ReAct
//! loop that ties them to the tool registry.

pub mod decision;
pub mod orchestrator;
pub mod state;
pub mod transcript;

// Re-export commonly used types
pub use decision::{DecisionMaker, LlmDecisionMaker};
pub use orchestrator::{AgentOutcome, ReactAgent};
pub use state::{AgentState, StateEvent};
pub use transcript::{Transcript, TranscriptEntry};
