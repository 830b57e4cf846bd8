//! The data-requirements → SQL pipeline and its run-to-completion driver.
//!
//! `SqlChain` wires the team steps into the fixed topology:
//!
//! ```text
//! START -> data_gather_information -> data_gather_supervisor
//! data_gather_supervisor --next--> { FINISH: END, data_gather_information, data_prompt_generator }
//! data_prompt_generator -> data_prompt_supervisor
//! data_prompt_supervisor --next--> { data_prompt_generator, sql_generation }
//! sql_generation -> sql_execution -> sql_result_formatting -> sql_supervisor -> END
//! ```
//!
//! [`enter`] runs a compiled pipeline for one user message and returns the content of
//! the last message.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::info;

use crate::agents::{DataTeam, SqlTeam};
use crate::error::AgentError;
use crate::graph::{
    CompilationError, CompiledStateGraph, DuplicateNodeError, NodeMiddleware, Router, StateGraph,
    DEFAULT_RECURSION_LIMIT, END, START,
};
use crate::llm::LlmClient;
use crate::state::{
    PipelineState, TeamRoster, DATA_GATHER_INFORMATION, DATA_GATHER_SUPERVISOR,
    DATA_PROMPT_GENERATOR, DATA_PROMPT_SUPERVISOR, FINISH, SQL_EXECUTION, SQL_GENERATION,
    SQL_RESULT_FORMATTING, SQL_SUPERVISOR,
};
use crate::tool_source::ToolSource;

/// Answer returned when a run ends with no messages at all.
pub const NO_VALID_MESSAGES: &str = "No valid messages returned from the chain.";

/// Driver-level error: the pipeline could not be built, or the run aborted.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("graph construction failed: {0}")]
    Construction(#[from] DuplicateNodeError),

    #[error("graph compilation failed: {0}")]
    Compilation(#[from] CompilationError),

    #[error("run failed: {0}")]
    Execution(#[from] AgentError),
}

/// Routing function of both conditional edges: the `next` written by the supervisor.
///
/// An unset `next` yields the empty string, which no mapping contains.
pub fn route_by_next() -> Router<PipelineState> {
    Router::new("route_by_next", |state: &PipelineState| {
        state.next.clone().unwrap_or_default()
    })
}

/// The pipeline: roster, collaborators and run options.
///
/// **Interaction**: Built by the CLI from `ChatOpenAI` and `SqliteToolSource`; tests use
/// `MockLlm` and `MockToolSource`.
pub struct SqlChain {
    roster: TeamRoster,
    llm: Arc<dyn LlmClient>,
    tools: Arc<dyn ToolSource>,
    middleware: Option<Arc<dyn NodeMiddleware<PipelineState>>>,
    recursion_limit: usize,
    node_timeout: Option<Duration>,
}

impl SqlChain {
    pub fn new(llm: Arc<dyn LlmClient>, tools: Arc<dyn ToolSource>) -> Self {
        Self {
            roster: TeamRoster::default(),
            llm,
            tools,
            middleware: None,
            recursion_limit: DEFAULT_RECURSION_LIMIT,
            node_timeout: None,
        }
    }

    pub fn with_roster(mut self, roster: TeamRoster) -> Self {
        self.roster = roster;
        self
    }

    pub fn with_middleware(mut self, middleware: Arc<dyn NodeMiddleware<PipelineState>>) -> Self {
        self.middleware = Some(middleware);
        self
    }

    pub fn with_recursion_limit(mut self, limit: usize) -> Self {
        self.recursion_limit = limit;
        self
    }

    pub fn with_node_timeout(mut self, timeout: Duration) -> Self {
        self.node_timeout = Some(timeout);
        self
    }

    pub fn roster(&self) -> &TeamRoster {
        &self.roster
    }

    /// Registers every step and wires the fixed topology (uncompiled).
    pub fn build_graph(&self) -> Result<StateGraph<PipelineState>, DuplicateNodeError> {
        let data = DataTeam::new(self.llm.clone(), self.tools.clone(), self.roster.clone());
        let sql = SqlTeam::new(self.llm.clone(), self.tools.clone(), self.roster.clone());

        let mut graph = StateGraph::new().with_recursion_limit(self.recursion_limit);
        if let Some(middleware) = &self.middleware {
            graph = graph.with_middleware(middleware.clone());
        }
        if let Some(timeout) = self.node_timeout {
            graph = graph.with_node_timeout(timeout);
        }

        graph
            .add_node(DATA_GATHER_INFORMATION, Arc::new(data.data_gather_information()))?
            .add_node(DATA_GATHER_SUPERVISOR, Arc::new(data.data_gather_supervisor()))?
            .add_node(DATA_PROMPT_GENERATOR, Arc::new(data.data_prompt_generator()))?
            .add_node(DATA_PROMPT_SUPERVISOR, Arc::new(data.data_prompt_supervisor()))?
            .add_node(SQL_GENERATION, Arc::new(sql.sql_generation()))?
            .add_node(SQL_EXECUTION, Arc::new(sql.sql_execution()))?
            .add_node(SQL_RESULT_FORMATTING, Arc::new(sql.sql_result_formatting()))?
            .add_node(SQL_SUPERVISOR, Arc::new(sql.sql_supervisor()))?;

        graph
            .add_edge(START, DATA_GATHER_INFORMATION)
            .add_edge(DATA_GATHER_INFORMATION, DATA_GATHER_SUPERVISOR)
            .add_conditional_edges(
                DATA_GATHER_SUPERVISOR,
                route_by_next(),
                [
                    (FINISH, END),
                    (DATA_GATHER_INFORMATION, DATA_GATHER_INFORMATION),
                    (DATA_PROMPT_GENERATOR, DATA_PROMPT_GENERATOR),
                ],
            )
            .add_edge(DATA_PROMPT_GENERATOR, DATA_PROMPT_SUPERVISOR)
            .add_conditional_edges(
                DATA_PROMPT_SUPERVISOR,
                route_by_next(),
                [
                    (DATA_PROMPT_GENERATOR, DATA_PROMPT_GENERATOR),
                    (SQL_GENERATION, SQL_GENERATION),
                ],
            )
            .add_edge(SQL_GENERATION, SQL_EXECUTION)
            .add_edge(SQL_EXECUTION, SQL_RESULT_FORMATTING)
            .add_edge(SQL_RESULT_FORMATTING, SQL_SUPERVISOR)
            .add_edge(SQL_SUPERVISOR, END);
        Ok(graph)
    }

    /// Builds and validates the graph.
    pub fn compile_chain(&self) -> Result<CompiledStateGraph<PipelineState>, RunError> {
        Ok(self.build_graph()?.compile()?)
    }

    /// Compiles the pipeline and runs it once; see [`enter`].
    pub async fn enter_chain(
        &self,
        message: impl Into<String>,
        history: Vec<String>,
    ) -> Result<String, RunError> {
        let compiled = self.compile_chain()?;
        enter(message, &compiled, history).await
    }
}

/// Runs `compiled` for one user message and returns the content of the last message.
///
/// The initial state holds the user message and `history`; every derived field starts
/// empty. A run that ends with no messages yields [`NO_VALID_MESSAGES`], not an error.
pub async fn enter(
    message: impl Into<String>,
    compiled: &CompiledStateGraph<PipelineState>,
    history: Vec<String>,
) -> Result<String, RunError> {
    let state = PipelineState::for_user_message(message, history);
    let final_state = compiled.invoke(state).await?;
    info!(
        messages = final_state.messages.len(),
        next = ?final_state.next,
        "Pipeline run finished"
    );
    Ok(final_answer(&final_state))
}

/// Content of the last message of a finished run, or [`NO_VALID_MESSAGES`] when there is none.
pub fn final_answer(state: &PipelineState) -> String {
    state
        .last_message()
        .map(str::to_string)
        .unwrap_or_else(|| NO_VALID_MESSAGES.to_string())
}
