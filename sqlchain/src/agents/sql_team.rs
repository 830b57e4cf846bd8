//! SQL team: generation, execution, formatting and the team supervisor.

use std::sync::Arc;

use crate::llm::LlmClient;
use crate::state::{
    TeamRoster, FINISH, SQL_EXECUTION, SQL_GENERATION, SQL_RESULT_FORMATTING, SQL_SUPERVISOR,
};
use crate::tool_source::{ToolSource, TOOL_EXECUTE_SQL, TOOL_FETCH_METADATA};

use super::agent_node::{AgentNode, OutputField};
use super::prompt;
use super::supervisor::SupervisorNode;

/// Builds the steps of the SQL team from shared collaborators.
pub struct SqlTeam {
    llm: Arc<dyn LlmClient>,
    tools: Arc<dyn ToolSource>,
    roster: TeamRoster,
}

impl SqlTeam {
    pub fn new(llm: Arc<dyn LlmClient>, tools: Arc<dyn ToolSource>, roster: TeamRoster) -> Self {
        Self { llm, tools, roster }
    }

    pub fn sql_generation(&self) -> AgentNode {
        AgentNode::new(
            SQL_GENERATION,
            prompt::SQL_GENERATION_PROMPT,
            self.llm.clone(),
            OutputField::SqlQuery,
        )
        .with_tools(self.tools.clone(), [TOOL_FETCH_METADATA])
    }

    pub fn sql_execution(&self) -> AgentNode {
        AgentNode::new(
            SQL_EXECUTION,
            prompt::SQL_EXECUTION_PROMPT,
            self.llm.clone(),
            OutputField::ExecutionResults,
        )
        .with_tools(self.tools.clone(), [TOOL_EXECUTE_SQL])
    }

    pub fn sql_result_formatting(&self) -> AgentNode {
        AgentNode::new(
            SQL_RESULT_FORMATTING,
            prompt::SQL_RESULT_FORMATTING_PROMPT,
            self.llm.clone(),
            OutputField::MessageOnly,
        )
    }

    /// Options: every SQL-team member or FINISH. Its decision is recorded in `next`;
    /// the pipeline wires this step straight to END.
    pub fn sql_supervisor(&self) -> SupervisorNode {
        let mut options = self.roster.sql_team_members.clone();
        options.push(FINISH.to_string());
        SupervisorNode::new(
            SQL_SUPERVISOR,
            prompt::SQL_SUPERVISOR_PROMPT,
            self.llm.clone(),
            self.roster.sql_team_members.clone(),
            options,
        )
    }
}
