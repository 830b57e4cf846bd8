//! Pipeline steps: LLM-backed agents and supervisors, grouped by team.
//!
//! `AgentNode` renders its prompt, may call tools, appends one named message and fills
//! its output field. `SupervisorNode` only writes `next`, chosen from a closed set.

mod agent_node;
mod data_team;
pub mod prompt;
mod sql_team;
mod supervisor;

pub use agent_node::{AgentNode, OutputField, DEFAULT_MAX_TOOL_ROUNDS};
pub use data_team::DataTeam;
pub use sql_team::SqlTeam;
pub use supervisor::{SupervisorNode, ROUTE_TOOL};
