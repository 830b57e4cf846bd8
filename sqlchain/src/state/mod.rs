//! Shared state threaded through a graph run, and its merge policy.
//!
//! Every node returns a partial update (`GraphState::Update`) instead of a whole new
//! state; the compiled graph merges it before resolving the next edge. The merge is
//! declared once per state type, not per edge.

mod pipeline_state;
mod roster;

pub(crate) use pipeline_state::strip_code_fence;
pub use pipeline_state::{DataRequirements, PipelineState, PipelineUpdate};
pub use roster::{
    TeamRoster, DATA_GATHER_INFORMATION, DATA_GATHER_SUPERVISOR, DATA_PROMPT_GENERATOR,
    DATA_PROMPT_SUPERVISOR, FINISH, SQL_EXECUTION, SQL_GENERATION, SQL_RESULT_FORMATTING,
    SQL_SUPERVISOR,
};

use std::fmt::Debug;

/// State type usable in a `StateGraph`.
///
/// `Update` is the closed set of fields a node may write; `merge` applies it with each
/// field's policy (e.g. append for message lists, replace for everything else).
pub trait GraphState: Clone + Send + Sync + Debug + 'static {
    /// Partial update returned by a node.
    type Update: Send + Debug + 'static;

    /// Folds `update` into `self`.
    fn merge(&mut self, update: Self::Update);
}
