//! Requirement-gathering team: gather, prompt generation and their supervisors.

use std::sync::Arc;

use crate::llm::LlmClient;
use crate::state::{
    TeamRoster, DATA_GATHER_INFORMATION, DATA_GATHER_SUPERVISOR, DATA_PROMPT_GENERATOR,
    DATA_PROMPT_SUPERVISOR, FINISH, SQL_GENERATION,
};
use crate::tool_source::{ToolSource, TOOL_FETCH_METADATA};

use super::agent_node::{AgentNode, OutputField};
use super::prompt;
use super::supervisor::SupervisorNode;

/// Builds the steps of the data team from shared collaborators.
pub struct DataTeam {
    llm: Arc<dyn LlmClient>,
    tools: Arc<dyn ToolSource>,
    roster: TeamRoster,
}

impl DataTeam {
    pub fn new(llm: Arc<dyn LlmClient>, tools: Arc<dyn ToolSource>, roster: TeamRoster) -> Self {
        Self { llm, tools, roster }
    }

    /// Collects the user's requirements; may look at schema metadata.
    pub fn data_gather_information(&self) -> AgentNode {
        AgentNode::new(
            DATA_GATHER_INFORMATION,
            prompt::DATA_GATHER_INFORMATION_PROMPT,
            self.llm.clone(),
            OutputField::DataRequirements,
        )
        .with_tools(self.tools.clone(), [TOOL_FETCH_METADATA])
    }

    pub fn data_prompt_generator(&self) -> AgentNode {
        AgentNode::new(
            DATA_PROMPT_GENERATOR,
            prompt::DATA_PROMPT_GENERATOR_PROMPT,
            self.llm.clone(),
            OutputField::GeneratedPrompt,
        )
    }

    /// Options: every data-team member, or FINISH to hand a question back to the user.
    pub fn data_gather_supervisor(&self) -> SupervisorNode {
        let mut options = self.roster.data_team_members.clone();
        options.push(FINISH.to_string());
        SupervisorNode::new(
            DATA_GATHER_SUPERVISOR,
            prompt::DATA_GATHER_SUPERVISOR_PROMPT,
            self.llm.clone(),
            self.roster.data_team_members.clone(),
            options,
        )
    }

    /// Options: rewrite the prompt, or hand over to SQL generation. No terminal outcome.
    pub fn data_prompt_supervisor(&self) -> SupervisorNode {
        SupervisorNode::new(
            DATA_PROMPT_SUPERVISOR,
            prompt::DATA_PROMPT_SUPERVISOR_PROMPT,
            self.llm.clone(),
            self.roster.team_members(),
            vec![DATA_PROMPT_GENERATOR.to_string(), SQL_GENERATION.to_string()],
        )
    }
}
