//! Supervisor step: asks the LLM which step acts next and records it in `next`.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::{AgentError, RoutingError};
use crate::graph::Node;
use crate::llm::{LlmClient, LlmResponse};
use crate::message::Message;
use crate::state::{PipelineState, PipelineUpdate};
use crate::tool_source::ToolSpec;

use super::prompt;

/// Name of the function a supervisor offers for structured answers.
pub const ROUTE_TOOL: &str = "route";

/// Routing step over a closed set of options.
///
/// The model may answer with plain text (trimmed, taken verbatim) or by calling the
/// offered `route` function with `{"next": <option>}`. Anything outside `options` fails
/// the run with `RoutingError`; there is no retry. A supervisor writes only `next` and
/// appends no message.
///
/// **Interaction**: Implements `Node<PipelineState>`; `route_options` lets
/// `StateGraph::compile` check the conditional edge on this node covers every option.
pub struct SupervisorNode {
    name: String,
    template: String,
    llm: Arc<dyn LlmClient>,
    members: Vec<String>,
    options: Vec<String>,
}

impl SupervisorNode {
    /// `members` is the roster described in the prompt; `options` the accepted answers.
    pub fn new(
        name: impl Into<String>,
        template: impl Into<String>,
        llm: Arc<dyn LlmClient>,
        members: Vec<String>,
        options: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            template: template.into(),
            llm,
            members,
            options,
        }
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    fn route_tool(&self) -> ToolSpec {
        ToolSpec {
            name: ROUTE_TOOL.to_string(),
            description: Some("Select the next role.".to_string()),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "next": { "type": "string", "enum": self.options }
                },
                "required": ["next"]
            }),
        }
    }

    /// Extracts the decision: `route` call argument, `{"next": ..}` JSON text, or the
    /// trimmed text itself.
    fn decision(response: &LlmResponse) -> String {
        if let Some(call) = response.tool_calls.iter().find(|c| c.name == ROUTE_TOOL) {
            return serde_json::from_str::<Value>(&call.arguments)
                .ok()
                .and_then(|v| v.get("next").and_then(Value::as_str).map(str::to_string))
                .unwrap_or_else(|| call.arguments.trim().to_string());
        }
        let text = response.content.trim();
        serde_json::from_str::<Value>(text)
            .ok()
            .and_then(|v| v.get("next").and_then(Value::as_str).map(str::to_string))
            .unwrap_or_else(|| text.to_string())
    }
}

#[async_trait]
impl Node<PipelineState> for SupervisorNode {
    fn id(&self) -> &str {
        &self.name
    }

    async fn run(&self, state: &PipelineState) -> Result<PipelineUpdate, AgentError> {
        let system = prompt::render(&self.template, state, &self.members, &self.options);
        let mut conversation = Vec::with_capacity(state.messages.len() + 2);
        conversation.push(Message::system(system));
        conversation.extend(state.messages.iter().cloned());
        conversation.push(Message::user(format!(
            "Given the conversation above, who should act next? Select one of: {}",
            self.options.join(", ")
        )));

        let response = self.llm.invoke(&conversation, &[self.route_tool()]).await?;
        let next = Self::decision(&response);
        if !self.options.contains(&next) {
            return Err(RoutingError::new(&self.name, next, self.options.clone()).into());
        }
        debug!(supervisor = %self.name, next = %next, "Supervisor decided");
        Ok(PipelineUpdate::route(next))
    }

    fn route_options(&self) -> Option<Vec<String>> {
        Some(self.options.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockLlm;
    use crate::state::FINISH;

    fn supervisor(llm: Arc<MockLlm>) -> SupervisorNode {
        SupervisorNode::new(
            "data_gather_supervisor",
            "Steps: {members}. Options: {options}",
            llm,
            vec!["data_gather_information".into(), "data_prompt_generator".into()],
            vec![
                "data_gather_information".into(),
                "data_prompt_generator".into(),
                FINISH.into(),
            ],
        )
    }

    /// **Scenario**: A trimmed plain-text answer inside the enumeration becomes `next`.
    #[tokio::test]
    async fn plain_text_answer_sets_next_without_message() {
        let llm = Arc::new(MockLlm::scripted(["  FINISH\n"]));
        let node = supervisor(llm.clone());
        let state = PipelineState::for_user_message("hi", vec![]);
        let update = node.run(&state).await.unwrap();
        assert_eq!(update.next.as_deref(), Some(FINISH));
        assert!(update.messages.is_empty());

        let call = &llm.calls()[0];
        assert_eq!(call.tool_names, vec![ROUTE_TOOL]);
        assert!(call.messages[0]
            .content()
            .contains("Options: data_gather_information, data_prompt_generator, FINISH"));
        assert!(call.messages.last().unwrap().content().contains("who should act next"));
    }

    #[tokio::test]
    async fn route_function_call_and_json_text_are_accepted() {
        let llm = Arc::new(MockLlm::new([
            LlmResponse::tool_call(ROUTE_TOOL, json!({"next": "data_prompt_generator"})),
            LlmResponse::text(r#"{"next": "data_gather_information"}"#),
        ]));
        let node = supervisor(llm);
        let state = PipelineState::default();
        assert_eq!(
            node.run(&state).await.unwrap().next.as_deref(),
            Some("data_prompt_generator")
        );
        assert_eq!(
            node.run(&state).await.unwrap().next.as_deref(),
            Some("data_gather_information")
        );
    }

    /// **Scenario**: An answer outside the enumeration fails with RoutingError naming it.
    #[tokio::test]
    async fn unknown_answer_is_routing_error() {
        let llm = Arc::new(MockLlm::scripted(["sql_generation"]));
        let node = supervisor(llm);
        match node.run(&PipelineState::default()).await {
            Err(AgentError::Routing(e)) => {
                assert_eq!(e.node, "data_gather_supervisor");
                assert_eq!(e.value, "sql_generation");
                assert_eq!(e.expected.len(), 3);
            }
            other => panic!("expected RoutingError, got {:?}", other),
        }
    }

    #[test]
    fn route_options_and_tool_schema_list_the_enumeration() {
        let node = supervisor(Arc::new(MockLlm::scripted(Vec::<String>::new())));
        assert_eq!(node.route_options().unwrap(), node.options().to_vec());
        let spec = node.route_tool();
        assert_eq!(spec.input_schema["properties"]["next"]["enum"][2], "FINISH");
    }
}
