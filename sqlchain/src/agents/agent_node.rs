//! Agent step: render a prompt, consult the LLM (with a bounded tool loop), append
//! one message and fill the step's output field.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::error::AgentError;
use crate::graph::Node;
use crate::llm::{LlmClient, ToolCall};
use crate::message::Message;
use crate::state::{strip_code_fence, DataRequirements, PipelineState, PipelineUpdate};
use crate::tool_source::{ToolSource, ToolSpec};

use super::prompt;

/// Tool-call rounds an agent may run before it must answer.
pub const DEFAULT_MAX_TOOL_ROUNDS: usize = 5;

/// Truncates a string for logging, appending "..." if longer than max_len.
fn truncate_for_log(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", s.chars().take(max_len).collect::<String>())
    }
}

/// State field an agent's final answer is written to, besides the message it appends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputField {
    /// `data_requirements`, only when the answer parses as the requirements JSON.
    DataRequirements,
    /// `generated_prompt`.
    GeneratedPrompt,
    /// `sql_query`, with a surrounding code fence removed.
    SqlQuery,
    /// `execution_results`: parsed JSON, or the raw text as a JSON string.
    ExecutionResults,
    /// Nothing besides the message.
    MessageOnly,
}

impl OutputField {
    fn apply(self, answer: &str, update: &mut PipelineUpdate) {
        match self {
            Self::DataRequirements => update.data_requirements = DataRequirements::parse(answer),
            Self::GeneratedPrompt => update.generated_prompt = Some(answer.trim().to_string()),
            Self::SqlQuery => update.sql_query = Some(strip_code_fence(answer).to_string()),
            Self::ExecutionResults => {
                let body = strip_code_fence(answer);
                let value = serde_json::from_str(body)
                    .unwrap_or_else(|_| Value::String(body.to_string()));
                update.execution_results = Some(value);
            }
            Self::MessageOnly => {}
        }
    }
}

/// A conversational worker step of the pipeline.
///
/// Sends `[system prompt, run messages...]` to the LLM, offering the tools named in
/// `with_tools`. While the model requests tool calls, each call is executed and its
/// observation appended to the agent's private conversation (not to the state); after
/// `max_tool_rounds` rounds a further request fails the run. The final answer is
/// appended to the state as one message named after the step.
///
/// **Interaction**: Implements `Node<PipelineState>`; built by `data_team` / `sql_team`
/// and registered by `SqlChain::build_graph`.
pub struct AgentNode {
    name: String,
    template: String,
    llm: Arc<dyn LlmClient>,
    tools: Option<Arc<dyn ToolSource>>,
    tool_names: Vec<String>,
    output: OutputField,
    max_tool_rounds: usize,
}

impl AgentNode {
    /// Agent with no tools.
    pub fn new(
        name: impl Into<String>,
        template: impl Into<String>,
        llm: Arc<dyn LlmClient>,
        output: OutputField,
    ) -> Self {
        Self {
            name: name.into(),
            template: template.into(),
            llm,
            tools: None,
            tool_names: Vec::new(),
            output,
            max_tool_rounds: DEFAULT_MAX_TOOL_ROUNDS,
        }
    }

    /// Offers the tools `names` of `source` to the model.
    pub fn with_tools<I, T>(mut self, source: Arc<dyn ToolSource>, names: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.tools = Some(source);
        self.tool_names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_max_tool_rounds(mut self, rounds: usize) -> Self {
        self.max_tool_rounds = rounds;
        self
    }

    pub fn output(&self) -> OutputField {
        self.output
    }

    async fn offered_tools(&self) -> Result<Vec<ToolSpec>, AgentError> {
        let Some(source) = &self.tools else {
            return Ok(Vec::new());
        };
        let specs = source
            .list_tools()
            .await
            .map_err(|e| AgentError::ExecutionFailed(format!("{}: list tools: {}", self.name, e)))?;
        Ok(specs
            .into_iter()
            .filter(|s| self.tool_names.iter().any(|n| n == &s.name))
            .collect())
    }

    async fn call_tool(&self, offered: &[ToolSpec], call: &ToolCall) -> Result<String, AgentError> {
        let source = match &self.tools {
            Some(source) if offered.iter().any(|s| s.name == call.name) => source,
            _ => {
                return Err(AgentError::ExecutionFailed(format!(
                    "{} requested tool '{}' which it was not offered",
                    self.name, call.name
                )))
            }
        };
        let args: Value = if call.arguments.trim().is_empty() {
            Value::Object(Default::default())
        } else {
            serde_json::from_str(&call.arguments).map_err(|e| {
                AgentError::ExecutionFailed(format!(
                    "{}: invalid arguments for '{}': {}",
                    self.name, call.name, e
                ))
            })?
        };
        debug!(agent = %self.name, tool = %call.name, args = %args, "Calling tool");
        match source.call_tool(&call.name, args).await {
            Ok(content) => {
                trace!(tool = %call.name, result = %truncate_for_log(&content.text, 200), "Tool result");
                Ok(content.text)
            }
            Err(e) => {
                warn!(agent = %self.name, tool = %call.name, error = %e, "Tool call failed");
                Err(AgentError::ExecutionFailed(format!(
                    "{}: tool '{}' failed: {}",
                    self.name, call.name, e
                )))
            }
        }
    }
}

#[async_trait]
impl Node<PipelineState> for AgentNode {
    fn id(&self) -> &str {
        &self.name
    }

    async fn run(&self, state: &PipelineState) -> Result<PipelineUpdate, AgentError> {
        let system = prompt::render(&self.template, state, &[], &[]);
        let mut conversation = Vec::with_capacity(state.messages.len() + 1);
        conversation.push(Message::system(system));
        conversation.extend(state.messages.iter().cloned());

        let offered = self.offered_tools().await?;
        let mut rounds = 0;
        let answer = loop {
            let response = self.llm.invoke(&conversation, &offered).await?;
            if response.tool_calls.is_empty() {
                break response.content;
            }
            if rounds == self.max_tool_rounds {
                return Err(AgentError::ExecutionFailed(format!(
                    "{} exceeded {} tool rounds",
                    self.name, self.max_tool_rounds
                )));
            }
            rounds += 1;
            for call in &response.tool_calls {
                let observation = self.call_tool(&offered, call).await?;
                conversation.push(Message::assistant(format!(
                    "Calling tool {} with {}",
                    call.name, call.arguments
                )));
                conversation.push(Message::user(format!(
                    "Observation from tool {}: {}",
                    call.name, observation
                )));
            }
        };

        let mut update = PipelineUpdate::message(&self.name, answer.clone());
        self.output.apply(&answer, &mut update);
        Ok(update)
    }
}
