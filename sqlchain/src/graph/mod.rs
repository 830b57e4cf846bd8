//! State graph: named nodes, fixed and conditional edges, compile and invoke.
//!
//! Aligns with LangGraph `StateGraph`: add nodes and edges, compile, then invoke with
//! an initial state. Nodes return partial updates which the compiled graph merges
//! through `GraphState::merge` before following the node's outgoing edge.

mod compile_error;
mod compiled;
pub(crate) mod logging;
mod next;
mod node;
mod node_middleware;
mod router;
mod state_graph;

pub use compile_error::{CompilationError, DuplicateNodeError};
pub use compiled::CompiledStateGraph;
pub use next::Next;
pub use node::Node;
pub use node_middleware::{NodeFuture, NodeMiddleware};
pub use router::{ConditionalEdge, Router};
pub use state_graph::{StateGraph, DEFAULT_RECURSION_LIMIT, END, START};
