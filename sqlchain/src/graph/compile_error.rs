//! Graph construction and compilation errors.
//!
//! Both surface before any run starts: `DuplicateNodeError` from `add_node`,
//! `CompilationError` from `StateGraph::compile`.

use thiserror::Error;

/// `add_node` was called with an id already registered (or a reserved sentinel).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("duplicate node: {0}")]
pub struct DuplicateNodeError(pub String);

/// Malformed topology detected by `StateGraph::compile`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompilationError {
    /// An edge or conditional edge references an id that was never added.
    #[error("node not found: {0}")]
    NodeNotFound(String),

    /// No edge has from_id == START, or more than one such edge.
    #[error("graph must have exactly one edge from START")]
    MissingStart,

    /// A node has more than one outgoing transition (fixed and/or conditional).
    #[error("node '{0}' has more than one outgoing edge")]
    ConflictingEdges(String),

    /// A node reachable from the entry has no outgoing transition, so a run would stall.
    #[error("node '{0}' is reachable but has no outgoing edge")]
    DeadEnd(String),

    /// A routing node declares an outcome the conditional edge on it does not map.
    #[error("conditional edge from '{node}' does not map route '{route}'")]
    UncoveredRoute { node: String, route: String },
}
