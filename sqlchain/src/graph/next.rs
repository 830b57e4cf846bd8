//! Edge target: another node, or the end of the run.

use super::state_graph::END;

/// Where a transition leads.
///
/// **Interaction**: Stored in fixed edges and conditional-edge mappings; consumed by
/// `CompiledStateGraph::invoke` to pick the next node or stop.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum Next {
    /// Run the node with the given id next.
    Node(String),
    /// Stop and return the current state.
    End,
}

impl Next {
    /// Maps a target id to `Next`, treating `END` as the terminal signal.
    pub fn from_target(id: impl Into<String>) -> Self {
        let id = id.into();
        if id == END {
            Self::End
        } else {
            Self::Node(id)
        }
    }
}
