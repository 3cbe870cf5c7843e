//! Tool execution types
//!
//! Core types for tool dispatch, results, and schemas.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;

use crate::errors::Result;
use crate::rag::store::KnowledgeStore;

/// Result of one tool invocation, as seen by the agent loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    /// Tool name that was invoked
    pub tool: String,

    /// Text handed back to the decision step
    pub output: String,

    /// Whether the invocation succeeded
    pub success: bool,

    /// Invocation duration in milliseconds
    pub duration_ms: u64,

    /// Error message if failed
    pub error: Option<String>,

    /// Chunk ids the output was built from
    #[serde(default)]
    pub sources: Vec<String>,
}

impl ToolResult {
    /// Create successful result
    pub fn success(tool: impl Into<String>, output: ToolOutput, duration: Duration) -> Self {
        Self {
            tool: tool.into(),
            output: output.text,
            success: true,
            duration_ms: duration.as_millis() as u64,
            error: None,
            sources: output.sources,
        }
    }

    /// Create failed result
    pub fn failure(tool: impl Into<String>, error: impl Into<String>, duration: Duration) -> Self {
        Self {
            tool: tool.into(),
            output: String::new(),
            success: false,
            duration_ms: duration.as_millis() as u64,
            error: Some(error.into()),
            sources: Vec::new(),
        }
    }

    /// Text recorded as the observation for this call
    pub fn observation(&self) -> String {
        match (&self.error, self.success) {
            (Some(error), false) => format!("search failed: {}", error),
            _ => self.output.clone(),
        }
    }
}

/// Handler output before timing is attached
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolOutput {
    pub text: String,
    pub sources: Vec<String>,
}

impl ToolOutput {
    pub fn new(text: impl Into<String>, sources: Vec<String>) -> Self {
        Self {
            text: text.into(),
            sources,
        }
    }
}

/// Read-only state a tool may consult during one invocation
#[derive(Debug, Clone, Copy)]
pub struct ToolContext<'a> {
    pub store: &'a KnowledgeStore,
}

impl<'a> ToolContext<'a> {
    pub fn new(store: &'a KnowledgeStore) -> Self {
        Self { store }
    }
}

/// Callable behind a registered tool name
#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn invoke(&self, args: &Map<String, Value>, ctx: &ToolContext<'_>) -> Result<ToolOutput>;
}

/// Tool schema definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSchema {
    /// Tool name
    pub name: String,

    /// Tool description
    pub description: String,

    /// Parameter schema (JSON Schema)
    pub parameters: Value,

    /// Whether tool is read-only
    pub read_only: bool,
}

impl ToolSchema {
    /// Create new tool schema
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: Value,
        read_only: bool,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
            read_only,
        }
    }

    /// Names of required parameters, in schema order
    pub fn required_params(&self) -> Vec<&str> {
        self.parameters
            .get("required")
            .and_then(Value::as_array)
            .map(|required| required.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }
}
