//! Tool registry
//!
//! Tagged map from tool name to `{schema, handler}`. The decision step names
//! a tool; the registry looks it up and dispatches. Unknown names and
//! recoverable handler errors come back as failed results so the agent can
//! observe them and try again.

use crate::errors::Result;
use crate::tools::types::{ToolContext, ToolHandler, ToolResult, ToolSchema};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

/// Registered tool: schema plus handler
#[derive(Clone)]
pub struct RegisteredTool {
    pub schema: ToolSchema,
    pub handler: Arc<dyn ToolHandler>,
}

/// Tool registry
#[derive(Clone, Default)]
pub struct ToolRegistry {
    /// Map of tool name to registered tool
    tools: HashMap<String, RegisteredTool>,
}

impl ToolRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool under its schema name, replacing any previous one
    pub fn register(&mut self, schema: ToolSchema, handler: Arc<dyn ToolHandler>) {
        self.tools
            .insert(schema.name.clone(), RegisteredTool { schema, handler });
    }

    /// Get tool schema by name
    pub fn get(&self, name: &str) -> Option<&ToolSchema> {
        self.tools.get(name).map(|tool| &tool.schema)
    }

    /// Check if tool exists
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Get all tool names, sorted
    pub fn tool_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// Get all tool schemas, sorted by name
    pub fn schemas(&self) -> Vec<ToolSchema> {
        let mut schemas: Vec<ToolSchema> =
            self.tools.values().map(|tool| tool.schema.clone()).collect();
        schemas.sort_by(|a, b| a.name.cmp(&b.name));
        schemas
    }

    /// Get total number of tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Dispatch `name` with `args`
    ///
    /// Only unrecoverable handler errors are returned as `Err`.
    pub async fn invoke(
        &self,
        name: &str,
        args: &Map<String, Value>,
        ctx: &ToolContext<'_>,
    ) -> Result<ToolResult> {
        let start = Instant::now();

        let Some(tool) = self.tools.get(name) else {
            tracing::warn!(tool = name, "unknown tool requested");
            return Ok(ToolResult::failure(
                name,
                format!(
                    "unknown tool '{}'. Available tools: {}",
                    name,
                    self.tool_names().join(", ")
                ),
                start.elapsed(),
            ));
        };

        match tool.handler.invoke(args, ctx).await {
            Ok(output) => {
                let result = ToolResult::success(name, output, start.elapsed());
                tracing::debug!(tool = name, duration_ms = result.duration_ms, "tool succeeded");
                Ok(result)
            }
            Err(e) if e.is_recoverable() => {
                tracing::warn!(tool = name, error = %e, "tool failed");
                Ok(ToolResult::failure(name, e.to_string(), start.elapsed()))
            }
            Err(e) => Err(e),
        }
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.tool_names())
            .finish()
    }
}
