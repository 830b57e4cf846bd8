//! Run-time error types.
//!
//! Used by `Node::run`, `CompiledStateGraph::invoke` and every step that talks to an
//! external collaborator. Structural errors live in `graph::compile_error`.

use thiserror::Error;

/// A routing decision named a target outside the declared enumeration.
///
/// Raised by a supervisor whose collaborator answered with an unknown option, or by a
/// conditional edge whose routing function produced a key missing from its mapping.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("routing error at node '{node}': '{value}' is not one of [{}]", .expected.join(", "))]
pub struct RoutingError {
    /// Node (supervisor or conditional-edge source) that produced the decision.
    pub node: String,
    /// The value received.
    pub value: String,
    /// The outcomes that would have been accepted.
    pub expected: Vec<String>,
}

impl RoutingError {
    pub fn new(node: impl Into<String>, value: impl Into<String>, expected: Vec<String>) -> Self {
        Self {
            node: node.into(),
            value: value.into(),
            expected,
        }
    }
}

/// Step execution error.
///
/// Returned by `Node::run` and by the compiled graph; aborts the in-progress run.
#[derive(Debug, Error)]
pub enum AgentError {
    /// An external collaborator (LLM or tool) failed. Propagated as-is, never retried.
    #[error("execution failed: {0}")]
    ExecutionFailed(String),

    /// A supervisor or conditional edge chose a target outside its enumeration.
    #[error(transparent)]
    Routing(#[from] RoutingError),

    /// The run took more step invocations than the compiled recursion limit.
    #[error("recursion limit of {0} steps reached without hitting END")]
    RecursionLimit(usize),

    /// A step did not finish within the compiled per-node timeout.
    #[error("node '{node}' timed out after {millis} ms")]
    Timeout { node: String, millis: u128 },
}
