//! State of the data-requirements → SQL pipeline and its partial update.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::message::Message;

use super::GraphState;

/// Parameters elicited from the user by `data_gather_information`.
///
/// Field names match the JSON object the gathering agent is asked to emit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataRequirements {
    /// Why the data is needed (decision or analysis it supports).
    pub purpose_of_data: String,
    /// Data points of interest (e.g. sales figures).
    pub specific_data_needs: String,
    /// Period of interest (e.g. last quarter).
    pub time_frame: String,
    /// Conditions to apply (e.g. region, product category).
    pub filters_criteria: String,
}

impl DataRequirements {
    /// Parses the gathering agent's output. Tolerates a surrounding code fence.
    ///
    /// Returns `None` when the output is not the requirements object (e.g. the agent
    /// asked the user a clarifying question instead).
    pub fn parse(output: &str) -> Option<Self> {
        let body = strip_code_fence(output);
        serde_json::from_str(body).ok()
    }
}

/// Removes one surrounding markdown code fence (with optional language tag).
pub(crate) fn strip_code_fence(s: &str) -> &str {
    let trimmed = s.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    match body.find('\n') {
        Some(nl) if !body[..nl].trim().contains(' ') => body[nl + 1..].trim(),
        _ => body.trim(),
    }
}

/// Shared state of one pipeline run.
///
/// Created by the driver, discarded at run end. `messages` only grows; all other
/// fields are replaced by whichever step writes them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineState {
    /// Conversation of this run; append-only.
    pub messages: Vec<Message>,
    /// Prior turns supplied by the caller; read-only during the run.
    pub chat_history: Vec<String>,
    /// Routing decision of the last supervisor (step name or `FINISH`).
    pub next: Option<String>,
    pub data_requirements: Option<DataRequirements>,
    pub generated_prompt: String,
    pub sql_query: String,
    pub execution_results: Option<Value>,
}

impl PipelineState {
    /// Fresh state for one run: a single user message plus the supplied history.
    pub fn for_user_message(message: impl Into<String>, chat_history: Vec<String>) -> Self {
        Self {
            messages: vec![Message::user(message)],
            chat_history,
            ..Self::default()
        }
    }

    /// Content of the last message, if any.
    pub fn last_message(&self) -> Option<&str> {
        self.messages.last().map(Message::content)
    }
}

/// Partial update returned by a pipeline step.
///
/// `messages` is appended; every `Some` field replaces the current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineUpdate {
    pub messages: Vec<Message>,
    pub next: Option<String>,
    pub data_requirements: Option<DataRequirements>,
    pub generated_prompt: Option<String>,
    pub sql_query: Option<String>,
    pub execution_results: Option<Value>,
}

impl PipelineUpdate {
    /// Update carrying one message attributed to `name`.
    pub fn message(name: &str, content: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::agent(name, content)],
            ..Self::default()
        }
    }

    /// Update carrying only a routing decision.
    pub fn route(next: impl Into<String>) -> Self {
        Self {
            next: Some(next.into()),
            ..Self::default()
        }
    }
}

impl GraphState for PipelineState {
    type Update = PipelineUpdate;

    fn merge(&mut self, update: PipelineUpdate) {
        let PipelineUpdate {
            messages,
            next,
            data_requirements,
            generated_prompt,
            sql_query,
            execution_results,
        } = update;

        self.messages.extend(messages);
        if let Some(next) = next {
            self.next = Some(next);
        }
        if let Some(req) = data_requirements {
            self.data_requirements = Some(req);
        }
        if let Some(prompt) = generated_prompt {
            self.generated_prompt = prompt;
        }
        if let Some(query) = sql_query {
            self.sql_query = query;
        }
        if let Some(results) = execution_results {
            self.execution_results = Some(results);
        }
    }
}
