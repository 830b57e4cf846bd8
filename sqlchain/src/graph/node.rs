//! Graph node trait: one step in a StateGraph.

use async_trait::async_trait;

use crate::error::AgentError;
use crate::state::GraphState;

/// One step in a graph: read the state, return a partial update.
///
/// The compiled graph merges the update (see `GraphState::merge`) and then follows the
/// node's outgoing edge; nodes never pick their successor directly.
///
/// **Interaction**: Registered with `StateGraph::add_node`; invoked by
/// `CompiledStateGraph::invoke` and `stream`.
#[async_trait]
pub trait Node<S>: Send + Sync
where
    S: GraphState,
{
    /// Node id (e.g. `"sql_generation"`).
    fn id(&self) -> &str;

    /// One step: state in, partial update out.
    async fn run(&self, state: &S) -> Result<S::Update, AgentError>;

    /// Closed set of routing outcomes this node can write, for nodes that make routing
    /// decisions (supervisors). `StateGraph::compile` checks a conditional edge on this
    /// node maps every one of them.
    fn route_options(&self) -> Option<Vec<String>> {
        None
    }
}
