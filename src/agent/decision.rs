//! Decision step
//!
//! Given the question, the transcript so far, and the available tools, pick
//! the next action. `LlmDecisionMaker` asks a completion model for one JSON
//! object and parses it.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use crate::agent::transcript::Transcript;
use crate::errors::Result;
use crate::llm::CompletionModel;
use crate::streaming::JsonParser;
use crate::tools::ToolSchema;
use crate::types::Decision;

/// Chooses the next action or the final answer
#[async_trait]
pub trait DecisionMaker: Send + Sync {
    /// A reply that cannot be read as a decision is `RagError::DecisionFormat`
    async fn decide(
        &self,
        question: &str,
        transcript: &Transcript,
        tools: &[ToolSchema],
    ) -> Result<Decision>;
}

/// ReAct prompting over a completion model
#[derive(Clone)]
pub struct LlmDecisionMaker {
    completion: Arc<dyn CompletionModel>,
}

impl LlmDecisionMaker {
    pub fn new(completion: Arc<dyn CompletionModel>) -> Self {
        Self { completion }
    }

    /// Render the full decision prompt
    pub fn build_prompt(question: &str, transcript: &Transcript, tools: &[ToolSchema]) -> String {
        let tools_formatted = tools
            .iter()
            .map(describe_tool)
            .collect::<Vec<_>>()
            .join("\n  ");

        let history = if transcript.is_empty() {
            "(nothing yet)".to_string()
        } else {
            transcript.render()
        };

        format!(
            r#"You answer questions using a knowledge base you can only see through tools.
Search, read each observation, and search again with different wording when an observation mentions something you have not looked up yet.

RESPONSE FORMAT - You MUST respond with valid JSON only:

Tool call format:
{{"type": "tool_call", "tool": "tool_name", "args": {{"query": "what to search for"}}, "thought": "why"}}

Final answer format:
{{"type": "final", "answer": "your answer"}}

AVAILABLE TOOLS:
  {}

RULES:
1. Output ONLY one JSON object
2. Use exact tool names from the list above
3. Answer only from information found in observations

QUESTION: {}

HISTORY:
{}

Next action:"#,
            tools_formatted, question, history
        )
    }
}

#[async_trait]
impl DecisionMaker for LlmDecisionMaker {
    async fn decide(
        &self,
        question: &str,
        transcript: &Transcript,
        tools: &[ToolSchema],
    ) -> Result<Decision> {
        let prompt = Self::build_prompt(question, transcript, tools);
        let reply = self.completion.complete(&prompt).await?;
        tracing::trace!(reply = %reply, "decision reply");
        JsonParser::parse_decision(&reply)
    }
}

/// `name: description Args: query (string, required)`
fn describe_tool(schema: &ToolSchema) -> String {
    let required = schema.required_params();
    let args = schema
        .parameters
        .get("properties")
        .and_then(Value::as_object)
        .map(|properties| {
            properties
                .iter()
                .map(|(name, spec)| {
                    let kind = spec.get("type").and_then(Value::as_str).unwrap_or("any");
                    let need = if required.contains(&name.as_str()) {
                        "required"
                    } else {
                        "optional"
                    };
                    format!("{} ({}, {})", name, kind, need)
                })
                .collect::<Vec<_>>()
                .join(", ")
        })
        .unwrap_or_default();

    format!("{}: {} Args: {}", schema.name, schema.description, args)
}
