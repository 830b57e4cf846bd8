//! Reasoning collaborator abstraction.
//!
//! Agent and supervisor steps call an `LlmClient` with their rendered prompt and the
//! tools they may use; this module defines the trait, the response types and a
//! scripted mock. `ChatOpenAI` (feature `openai`) talks to an OpenAI-compatible API.

mod mock;

#[cfg(feature = "openai")]
mod openai;

pub use mock::{MockCall, MockLlm};

#[cfg(feature = "openai")]
pub use openai::ChatOpenAI;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AgentError;
use crate::message::Message;
use crate::tool_source::ToolSpec;

/// Tool choice mode for chat completions: when tools are present, controls whether
/// the model may choose (auto), must not use (none), or must use (required).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ToolChoiceMode {
    /// Model can pick between message or tool calls. Default when tools are present.
    #[default]
    Auto,
    /// Model will not call any tool.
    None,
    /// Model must call one or more tools.
    Required,
}

impl std::str::FromStr for ToolChoiceMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "none" => Ok(Self::None),
            "required" => Ok(Self::Required),
            _ => Err(format!(
                "unknown tool_choice: {} (use auto, none, or required)",
                s
            )),
        }
    }
}

/// One function call requested by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Provider-assigned call id, when the API returns one.
    pub id: Option<String>,
    pub name: String,
    /// Arguments as a JSON string (as returned by the API).
    pub arguments: String,
}

/// Response from an LLM completion: assistant text and optional tool calls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LlmResponse {
    /// Assistant message content (plain text).
    pub content: String,
    /// Tool calls from this turn; empty means the model answered directly.
    pub tool_calls: Vec<ToolCall>,
}

impl LlmResponse {
    /// Plain text answer, no tool calls.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            tool_calls: vec![],
        }
    }

    /// A single tool call with JSON arguments.
    pub fn tool_call(name: impl Into<String>, arguments: serde_json::Value) -> Self {
        Self {
            content: String::new(),
            tool_calls: vec![ToolCall {
                id: None,
                name: name.into(),
                arguments: arguments.to_string(),
            }],
        }
    }
}

/// LLM client: given messages and the tools on offer, returns text and optional tool calls.
///
/// Implementations: `MockLlm` (scripted responses), `ChatOpenAI` (real API, feature `openai`).
///
/// **Interaction**: Used by `AgentNode` and `SupervisorNode`. Failures are reported as
/// `AgentError::ExecutionFailed` and abort the run; the core never retries.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Invoke one turn. `tools` may be empty.
    async fn invoke(
        &self,
        messages: &[Message],
        tools: &[ToolSpec],
    ) -> Result<LlmResponse, AgentError>;
}
