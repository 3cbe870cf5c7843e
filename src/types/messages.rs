//! Decision messages for the agent loop
//!
//! Defines the structured decisions the model emits at each Thinking step.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Decision parsed from model output
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Decision {
    /// Model requests a tool invocation
    ToolCall {
        tool: String,
        #[serde(default)]
        args: Map<String, Value>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        thought: Option<String>,
    },

    /// Model has enough information to answer
    Final {
        #[serde(alias = "result")]
        answer: String,
    },
}

impl Decision {
    /// Tool call with a single `query` argument
    pub fn tool_call(tool: impl Into<String>, query: impl Into<String>) -> Self {
        let mut args = Map::new();
        args.insert("query".to_string(), Value::String(query.into()));
        Decision::ToolCall {
            tool: tool.into(),
            args,
            thought: None,
        }
    }

    /// Final answer
    pub fn final_answer(answer: impl Into<String>) -> Self {
        Decision::Final {
            answer: answer.into(),
        }
    }

    pub fn is_final(&self) -> bool {
        matches!(self, Decision::Final { .. })
    }
}
