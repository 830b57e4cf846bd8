//! Scripted LLM for tests and offline runs.
//!
//! Returns queued responses in order and records every request so tests can assert on
//! the rendered prompts and offered tools.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::AgentError;
use crate::llm::{LlmClient, LlmResponse};
use crate::message::Message;
use crate::tool_source::ToolSpec;

/// One recorded call: the messages sent and the names of the tools offered.
#[derive(Debug, Clone)]
pub struct MockCall {
    pub messages: Vec<Message>,
    pub tool_names: Vec<String>,
}

/// Mock LLM: pops one scripted response per call.
///
/// When the script runs out, `invoke` fails with `ExecutionFailed`, which exercises the
/// collaborator-failure path. `repeating` builds a mock that never runs out.
///
/// **Interaction**: Implements `LlmClient`; used by pipeline and node tests.
pub struct MockLlm {
    script: Mutex<VecDeque<LlmResponse>>,
    repeat: Option<LlmResponse>,
    calls: Mutex<Vec<MockCall>>,
}

impl MockLlm {
    /// Responses returned in order, one per call.
    pub fn new(responses: impl IntoIterator<Item = LlmResponse>) -> Self {
        Self {
            script: Mutex::new(responses.into_iter().collect()),
            repeat: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Text-only responses returned in order.
    pub fn scripted<I, T>(contents: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self::new(contents.into_iter().map(LlmResponse::text))
    }

    /// Always answers with `content`.
    pub fn repeating(content: impl Into<String>) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            repeat: Some(LlmResponse::text(content)),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far.
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Scripted responses not yet consumed.
    pub fn remaining(&self) -> usize {
        self.script.lock().map(|s| s.len()).unwrap_or(0)
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn invoke(
        &self,
        messages: &[Message],
        tools: &[ToolSpec],
    ) -> Result<LlmResponse, AgentError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(MockCall {
                messages: messages.to_vec(),
                tool_names: tools.iter().map(|t| t.name.clone()).collect(),
            });
        }
        let next = self
            .script
            .lock()
            .map_err(|_| AgentError::ExecutionFailed("mock llm lock poisoned".into()))?
            .pop_front();
        next.or_else(|| self.repeat.clone())
            .ok_or_else(|| AgentError::ExecutionFailed("mock llm script exhausted".into()))
    }
}
