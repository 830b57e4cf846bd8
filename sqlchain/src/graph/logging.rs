//! Logging helpers for graph execution.
//!
//! Structured `tracing` events for run start/finish, node execution, routing
//! decisions and aborted runs. Install a subscriber (e.g. `tracing-subscriber`) to
//! see them.

use tracing::{debug, error, info, warn};

use crate::error::AgentError;
use crate::graph::Next;

/// Log node execution start.
pub fn log_node_start(node_id: &str, step: usize) {
    debug!(node_id = node_id, step, "Starting node execution");
}

/// Log node execution completion with the resolved successor.
pub fn log_node_complete(node_id: &str, next: &Next) {
    debug!(node_id = node_id, ?next, "Node execution complete");
}

/// Log a conditional-edge decision.
pub fn log_route(node_id: &str, router: &str, outcome: &str) {
    debug!(node_id = node_id, router = router, outcome = outcome, "Routed");
}

/// Log a registered node that cannot be reached from the entry point.
pub fn log_unreachable_node(node_id: &str) {
    warn!(node_id = node_id, "Node is not reachable from START");
}

/// Log graph execution start.
pub fn log_graph_start(entry: &str) {
    info!(entry = entry, "Starting graph execution");
}

/// Log graph execution completion.
pub fn log_graph_complete(steps: usize) {
    info!(steps, "Graph execution complete");
}

/// Log graph execution error.
pub fn log_graph_error(error: &AgentError) {
    error!(%error, "Graph execution error");
}
