//! Agent state machine
//!
//! Deterministic finite state machine for one ReAct run:
//! - Safety: invalid transitions are rejected, never silently taken
//! - Liveness: every run ends in Final, Exhausted, or Error
//! - Determinism: unique next state per (state, event)

use crate::errors::{RagError, Result};
use serde::{Deserialize, Serialize};

/// Agent execution states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentState {
    /// Run created, nothing decided yet
    Init,

    /// Waiting on the decision step
    Thinking,

    /// A tool call is in flight
    Acting,

    /// Final answer produced (terminal)
    Final,

    /// Iteration budget spent without a final answer (terminal)
    Exhausted,

    /// Unrecoverable error (terminal)
    Error,
}

/// Events that trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateEvent {
    /// Run started
    StartSession,

    /// Decision step chose a tool
    ToolCall,

    /// Observation appended to the transcript
    ObservationRecorded,

    /// Decision step produced a final answer
    AnswerReady,

    /// Iteration budget spent
    BudgetExhausted,

    /// Unrecoverable error
    UnrecoverableError,
}

impl AgentState {
    /// Check if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, AgentState::Final | AgentState::Exhausted | AgentState::Error)
    }

    /// Attempt state transition with validation
    ///
    /// Valid transitions:
    /// 1. Init      → Thinking  (on: StartSession)
    /// 2. Thinking  → Acting    (on: ToolCall)
    /// 3. Thinking  → Thinking  (on: ObservationRecorded, unusable decision)
    /// 4. Thinking  → Final     (on: AnswerReady)
    /// 5. Thinking  → Exhausted (on: BudgetExhausted)
    /// 6. Acting    → Thinking  (on: ObservationRecorded)
    /// 7. non-terminal → Error  (on: UnrecoverableError)
    /// 8. terminal  → itself    (any event)
    pub fn transition(&self, event: StateEvent) -> Result<AgentState> {
        use AgentState::*;
        use StateEvent::*;

        let next_state = match (self, event) {
            (Final, _) => Final,
            (Exhausted, _) => Exhausted,
            (Error, _) => Error,

            (_, UnrecoverableError) => Error,

            (Init, StartSession) => Thinking,

            (Thinking, ToolCall) => Acting,
            (Thinking, ObservationRecorded) => Thinking,
            (Thinking, AnswerReady) => Final,
            (Thinking, BudgetExhausted) => Exhausted,

            (Acting, ObservationRecorded) => Thinking,

            (from, event) => {
                return Err(RagError::InvalidTransition {
                    from: format!("{:?}", from),
                    to: format!("(via {:?})", event),
                    reason: format!("No valid transition from {:?} on {:?}", from, event),
                });
            }
        };

        Ok(next_state)
    }

    /// Get all valid events from this state
    pub fn valid_events(&self) -> Vec<StateEvent> {
        use AgentState::*;
        use StateEvent::*;

        match self {
            Init => vec![StartSession, UnrecoverableError],
            Thinking => vec![
                ToolCall,
                ObservationRecorded,
                AnswerReady,
                BudgetExhausted,
                UnrecoverableError,
            ],
            Acting => vec![ObservationRecorded, UnrecoverableError],
            Final | Exhausted | Error => vec![],
        }
    }

    /// Human-readable state name
    pub fn display_name(&self) -> &'static str {
        match self {
            AgentState::Init => "Initializing",
            AgentState::Thinking => "Thinking",
            AgentState::Acting => "Searching",
            AgentState::Final => "Answered",
            AgentState::Exhausted => "Out of steps",
            AgentState::Error => "Error",
        }
    }
}
