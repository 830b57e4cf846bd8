//! # sqlchain
//!
//! Supervisor-routed agent pipeline that turns a conversation into a SQL query and its
//! formatted results. Built on a small LangGraph-style core: one shared state type flows
//! through named steps, each step returns a partial update that is merged before the
//! next edge is resolved.
//!
//! ## Design Principles
//!
//! - **Typed state, declared merge**: `GraphState` fixes the update type and the merge
//!   policy once (`messages` append, other fields replace).
//! - **Named routing**: conditional edges bind a `Router` to an explicit mapping; a
//!   supervisor's declared options must all be mapped or `compile` fails.
//! - **Collaborators behind traits**: `LlmClient` and `ToolSource`, with mocks for tests.
//!
//! ## Main Modules
//!
//! - [`graph`]: `StateGraph`, `CompiledStateGraph`, `Node`, `Router`, middleware.
//! - [`state`]: `PipelineState`, `PipelineUpdate`, `TeamRoster` and step names.
//! - [`agents`]: `AgentNode`, `SupervisorNode` and the two teams.
//! - [`chain`]: `SqlChain` (fixed topology) and the [`enter`] driver.
//! - [`llm`]: `LlmClient`, `MockLlm`, optional `ChatOpenAI`.
//! - [`tool_source`]: `ToolSource`, `MockToolSource`, optional `SqliteToolSource`.
//!
//! ## Features
//!
//! - `sqlite` (default): `SqliteToolSource` (schema metadata, read-only execution).
//! - `openai`: `ChatOpenAI` via `async-openai`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use sqlchain::{enter, MockLlm, MockToolSource, SqlChain};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let llm = Arc::new(MockLlm::scripted(["Which region are you interested in?", "FINISH"]));
//! let chain = SqlChain::new(llm, Arc::new(MockToolSource::sql_example()));
//! let compiled = chain.compile_chain()?;
//! let answer = enter("I need last quarter's sales", &compiled, vec![]).await?;
//! assert_eq!(answer, "Which region are you interested in?");
//! # Ok(())
//! # }
//! ```

pub mod agents;
pub mod chain;
pub mod error;
pub mod graph;
pub mod llm;
pub mod message;
pub mod state;
pub mod stream;
pub mod tool_source;

pub use agents::{AgentNode, DataTeam, OutputField, SqlTeam, SupervisorNode};
pub use chain::{enter, final_answer, route_by_next, RunError, SqlChain, NO_VALID_MESSAGES};
pub use error::{AgentError, RoutingError};
pub use graph::{
    CompilationError, CompiledStateGraph, DuplicateNodeError, Next, Node, NodeMiddleware,
    Router, StateGraph, END, START,
};
#[cfg(feature = "openai")]
pub use llm::ChatOpenAI;
pub use llm::{LlmClient, LlmResponse, MockLlm, ToolCall, ToolChoiceMode};
pub use message::Message;
pub use state::{DataRequirements, GraphState, PipelineState, PipelineUpdate, TeamRoster, FINISH};
pub use stream::{StreamEvent, StreamMode};
#[cfg(feature = "sqlite")]
pub use tool_source::SqliteToolSource;
pub use tool_source::{MockToolSource, ToolCallContent, ToolSource, ToolSourceError, ToolSpec};
