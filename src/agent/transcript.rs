//! Per-run transcript
//!
//! Ordered record of what the agent searched for and what came back.
//! Owned by a single run and dropped with it.

use serde::{Deserialize, Serialize};

use crate::rag::context::ContextBuilder;
use crate::tools::ToolResult;

/// One transcript entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TranscriptEntry {
    /// A tool call and its observation
    Action {
        tool: String,
        query_issued: String,
        retrieved_text: String,
        #[serde(default)]
        sources: Vec<String>,
        failed: bool,
    },

    /// A reply the decision step could not turn into a decision
    InvalidDecision { reason: String },

    /// The decision step hit a transient model error
    DecisionFailed { error: String },
}

impl TranscriptEntry {
    /// Observation text shown to the decision step
    pub fn observation(&self) -> String {
        match self {
            TranscriptEntry::Action { retrieved_text, .. } => retrieved_text.clone(),
            TranscriptEntry::InvalidDecision { reason } => format!(
                "Your last reply was not a valid JSON action ({}). Reply with one JSON object.",
                reason
            ),
            TranscriptEntry::DecisionFailed { error } => format!(
                "The model call failed ({}). Try again.",
                error
            ),
        }
    }
}

/// Accumulated history of one agent run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a tool invocation; failed calls keep their error as the observation
    pub fn record_action(&mut self, query_issued: impl Into<String>, result: &ToolResult) {
        self.entries.push(TranscriptEntry::Action {
            tool: result.tool.clone(),
            query_issued: query_issued.into(),
            retrieved_text: result.observation(),
            sources: result.sources.clone(),
            failed: !result.success,
        });
    }

    /// Append a recoverable decision-step failure
    pub fn record_failed_decision(&mut self, error: impl Into<String>) {
        self.entries.push(TranscriptEntry::DecisionFailed {
            error: error.into(),
        });
    }

    /// Append an unusable decision
    pub fn record_invalid(&mut self, reason: impl Into<String>) {
        self.entries.push(TranscriptEntry::InvalidDecision {
            reason: reason.into(),
        });
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of tool calls, failed or not
    pub fn searches(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| matches!(entry, TranscriptEntry::Action { .. }))
            .count()
    }

    /// Queries issued, in order
    pub fn queries(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter_map(|entry| match entry {
                TranscriptEntry::Action { query_issued, .. } => Some(query_issued.as_str()),
                TranscriptEntry::InvalidDecision { .. } | TranscriptEntry::DecisionFailed { .. } => {
                    None
                }
            })
            .collect()
    }

    /// Every retrieved chunk id, first-seen order, no duplicates
    pub fn sources(&self) -> Vec<String> {
        let mut sources: Vec<String> = Vec::new();
        for entry in &self.entries {
            if let TranscriptEntry::Action { sources: ids, .. } = entry {
                for id in ids {
                    if !sources.contains(id) {
                        sources.push(id.clone());
                    }
                }
            }
        }
        sources
    }

    /// Retrieved text from successful searches, joined like a context block
    pub fn gathered_context(&self) -> String {
        let texts: Vec<&str> = self
            .entries
            .iter()
            .filter_map(|entry| match entry {
                TranscriptEntry::Action {
                    retrieved_text,
                    failed: false,
                    sources,
                    ..
                } if !sources.is_empty() => Some(retrieved_text.as_str()),
                _ => None,
            })
            .collect();
        ContextBuilder::join(&texts)
    }

    /// Render as numbered thought/observation steps for a prompt
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let action = match entry {
                    TranscriptEntry::Action {
                        tool, query_issued, ..
                    } => format!("{}({:?})", tool, query_issued),
                    TranscriptEntry::InvalidDecision { .. } => "(invalid reply)".to_string(),
                    TranscriptEntry::DecisionFailed { .. } => "(model error)".to_string(),
                };
                format!("Step {}: {}\nObservation: {}", i + 1, action, entry.observation())
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
