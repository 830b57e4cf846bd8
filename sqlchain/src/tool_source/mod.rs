//! Tool collaborator abstraction: list tools and call a tool.
//!
//! Agent steps offer their tool source's specs to the LLM and execute the calls it
//! requests. Implementations: `MockToolSource` (tests), `SqliteToolSource`
//! (feature `sqlite`: schema metadata and read-only query execution).

mod mock;
#[cfg(feature = "sqlite")]
mod sqlite;

pub use mock::MockToolSource;
#[cfg(feature = "sqlite")]
pub use sqlite::{SqliteToolSource, DEFAULT_ROW_LIMIT};

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Tool name: schema metadata as a JSON list of column records.
pub const TOOL_FETCH_METADATA: &str = "fetch_metadata_as_json";

/// Tool name: run one read-only SQL statement and return its rows as JSON.
pub const TOOL_EXECUTE_SQL: &str = "execute_sql";

/// Tool specification offered to the LLM as a function definition.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolSpec {
    /// Tool name (function name seen by the model).
    pub name: String,
    /// Human-readable description for the LLM.
    pub description: Option<String>,
    /// JSON Schema for arguments.
    pub input_schema: Value,
}

/// Result of a single tool call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCallContent {
    /// Result text (JSON for the SQL tools).
    pub text: String,
}

/// Errors from listing or calling tools.
///
/// **Interaction**: Agents map these to `AgentError::ExecutionFailed`.
#[derive(Debug, Error)]
pub enum ToolSourceError {
    #[error("tool not found: {0}")]
    NotFound(String),
    #[error("invalid arguments: {0}")]
    InvalidInput(String),
    #[error("tool execution failed: {0}")]
    Execution(String),
}

/// Tool source: list tools and call a tool.
#[async_trait]
pub trait ToolSource: Send + Sync {
    /// Tools available to a step.
    async fn list_tools(&self) -> Result<Vec<ToolSpec>, ToolSourceError>;

    /// Call a tool by name with JSON arguments.
    async fn call_tool(&self, name: &str, arguments: Value)
        -> Result<ToolCallContent, ToolSourceError>;
}
