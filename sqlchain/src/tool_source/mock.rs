//! Mock ToolSource for tests.
//!
//! Fixed tool list, per-tool canned results or failures, and a record of every call.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{
    ToolCallContent, ToolSource, ToolSourceError, ToolSpec, TOOL_EXECUTE_SQL, TOOL_FETCH_METADATA,
};

enum Canned {
    Text(String),
    Fail(String),
}

/// Mock tool source: lists the configured tools, answers each with its canned result.
///
/// Calling an unlisted tool yields `ToolSourceError::NotFound`.
pub struct MockToolSource {
    tools: Vec<ToolSpec>,
    results: HashMap<String, Canned>,
    calls: Mutex<Vec<(String, Value)>>,
}

impl MockToolSource {
    /// Creates a mock listing `tools`, each answering with an empty string until configured.
    pub fn new(tools: Vec<ToolSpec>) -> Self {
        Self {
            tools,
            results: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A mock offering the metadata and execute_sql tools with small canned results.
    pub fn sql_example() -> Self {
        Self::new(vec![
            ToolSpec {
                name: TOOL_FETCH_METADATA.to_string(),
                description: Some("Fetch database metadata as JSON.".to_string()),
                input_schema: json!({ "type": "object", "properties": {} }),
            },
            ToolSpec {
                name: TOOL_EXECUTE_SQL.to_string(),
                description: Some("Execute a read-only SQL query.".to_string()),
                input_schema: json!({
                    "type": "object",
                    "properties": { "query": { "type": "string" } },
                    "required": ["query"]
                }),
            },
        ])
        .with_result(
            TOOL_FETCH_METADATA,
            json!([{
                "schema_name": "main",
                "table_name": "sales",
                "column_name": "region",
                "data_type": "TEXT",
                "column_description": null,
                "constraint_name": null,
                "constraint_type": null
            }])
            .to_string(),
        )
        .with_result(
            TOOL_EXECUTE_SQL,
            json!({
                "columns": ["region", "total"],
                "rows": [{"region": "EMEA", "total": 120}],
                "truncated": false
            })
            .to_string(),
        )
    }

    /// Sets the text returned by `name` (builder style).
    pub fn with_result(mut self, name: &str, text: impl Into<String>) -> Self {
        self.results.insert(name.to_string(), Canned::Text(text.into()));
        self
    }

    /// Makes `name` fail with `ToolSourceError::Execution(message)`.
    pub fn with_failure(mut self, name: &str, message: impl Into<String>) -> Self {
        self.results.insert(name.to_string(), Canned::Fail(message.into()));
        self
    }

    /// Calls received so far: (tool name, arguments).
    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ToolSource for MockToolSource {
    async fn list_tools(&self) -> Result<Vec<ToolSpec>, ToolSourceError> {
        Ok(self.tools.clone())
    }

    async fn call_tool(
        &self,
        name: &str,
        arguments: Value,
    ) -> Result<ToolCallContent, ToolSourceError> {
        if !self.tools.iter().any(|t| t.name == name) {
            return Err(ToolSourceError::NotFound(name.to_string()));
        }
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((name.to_string(), arguments));
        }
        match self.results.get(name) {
            Some(Canned::Text(text)) => Ok(ToolCallContent { text: text.clone() }),
            Some(Canned::Fail(msg)) => Err(ToolSourceError::Execution(msg.clone())),
            None => Ok(ToolCallContent {
                text: String::new(),
            }),
        }
    }
}
