//! Tools the agent can call by name
//!
//! - `types`: results, schemas, and the handler trait
//! - `registry`: name -> {schema, handler} dispatch
//! - `search`: the knowledge-base search tool

pub mod registry;
pub mod search;
pub mod types;

pub use registry::{RegisteredTool, ToolRegistry};
pub use search::{SearchKnowledgeBase, SEARCH_TOOL_DESCRIPTION, SEARCH_TOOL_NAME};
pub use types::{ToolContext, ToolHandler, ToolOutput, ToolResult, ToolSchema};
