//! Compiled state graph: immutable, supports invoke and stream.
//!
//! Built by `StateGraph::compile`. Holds nodes, one outgoing transition per node, the
//! entry node and run options. Cheap to clone; clones share the topology, so one
//! compiled graph can serve many concurrent runs, each with its own state.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::error::AgentError;
use crate::state::GraphState;
use crate::stream::{StreamEvent, StreamMode};

use super::logging;
use super::node_middleware::{NodeFuture, NodeMiddleware};
use super::router::ConditionalEdge;
use super::{Next, Node};

/// Outgoing transition of a node.
pub(crate) enum Transition<S> {
    Fixed(Next),
    Conditional(ConditionalEdge<S>),
}

/// Compiled graph: immutable structure, supports invoke and stream.
///
/// Starts at the entry node; after each node merges its update into the state and
/// follows the node's transition (fixed target, or conditional edge resolved against
/// the merged state) until `END`.
pub struct CompiledStateGraph<S>
where
    S: GraphState,
{
    pub(super) nodes: Arc<HashMap<String, Arc<dyn Node<S>>>>,
    pub(super) transitions: Arc<HashMap<String, Transition<S>>>,
    pub(super) entry: String,
    pub(super) middleware: Option<Arc<dyn NodeMiddleware<S>>>,
    pub(super) recursion_limit: usize,
    pub(super) node_timeout: Option<Duration>,
}

impl<S> Clone for CompiledStateGraph<S>
where
    S: GraphState,
{
    fn clone(&self) -> Self {
        Self {
            nodes: Arc::clone(&self.nodes),
            transitions: Arc::clone(&self.transitions),
            entry: self.entry.clone(),
            middleware: self.middleware.clone(),
            recursion_limit: self.recursion_limit,
            node_timeout: self.node_timeout,
        }
    }
}

impl<S> std::fmt::Debug for CompiledStateGraph<S>
where
    S: GraphState,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut nodes: Vec<&String> = self.nodes.keys().collect();
        nodes.sort();
        f.debug_struct("CompiledStateGraph")
            .field("entry", &self.entry)
            .field("nodes", &nodes)
            .field("recursion_limit", &self.recursion_limit)
            .field("node_timeout", &self.node_timeout)
            .finish()
    }
}

impl<S> CompiledStateGraph<S>
where
    S: GraphState,
{
    /// Id of the node the run starts at.
    pub fn entry(&self) -> &str {
        &self.entry
    }

    pub fn recursion_limit(&self) -> usize {
        self.recursion_limit
    }

    /// Runs one node (through middleware and timeout when configured).
    async fn run_node(&self, node_id: &str, state: &S) -> Result<S::Update, AgentError> {
        let node = self
            .nodes
            .get(node_id)
            .cloned()
            .ok_or_else(|| AgentError::ExecutionFailed(format!("node not found: {}", node_id)))?;

        let call = async {
            match &self.middleware {
                Some(middleware) => {
                    let inner: Box<dyn FnOnce(S) -> NodeFuture<S::Update> + Send> =
                        Box::new(move |s: S| -> NodeFuture<S::Update> {
                            Box::pin(async move { node.run(&s).await })
                        });
                    middleware.around_run(node_id, state.clone(), inner).await
                }
                None => node.run(state).await,
            }
        };

        match self.node_timeout {
            Some(limit) => tokio::time::timeout(limit, call).await.map_err(|_| {
                AgentError::Timeout {
                    node: node_id.to_string(),
                    millis: limit.as_millis(),
                }
            })?,
            None => call.await,
        }
    }

    /// Resolves the successor of `node_id` against the merged state.
    fn resolve_next(&self, node_id: &str, state: &S) -> Result<Next, AgentError> {
        match self.transitions.get(node_id) {
            Some(Transition::Fixed(next)) => Ok(next.clone()),
            Some(Transition::Conditional(edge)) => {
                let (outcome, next) = edge.resolve(state)?;
                logging::log_route(node_id, edge.router().name(), &outcome);
                Ok(next)
            }
            None => Err(AgentError::ExecutionFailed(format!(
                "node '{}' has no outgoing edge",
                node_id
            ))),
        }
    }

    /// Shared run loop used by invoke() and stream(): steps through nodes until END.
    async fn run_loop(
        &self,
        state: &mut S,
        stream: Option<(&mpsc::Sender<StreamEvent<S>>, &HashSet<StreamMode>)>,
    ) -> Result<(), AgentError> {
        logging::log_graph_start(&self.entry);
        let mut current = self.entry.clone();
        let mut steps = 0usize;
        loop {
            if steps >= self.recursion_limit {
                return Err(AgentError::RecursionLimit(self.recursion_limit));
            }
            steps += 1;
            logging::log_node_start(&current, steps);

            let update = self.run_node(&current, state).await?;
            state.merge(update);

            if let Some((tx, modes)) = stream {
                if modes.contains(&StreamMode::Values) {
                    let _ = tx.send(StreamEvent::Values(state.clone())).await;
                }
                if modes.contains(&StreamMode::Updates) {
                    let _ = tx
                        .send(StreamEvent::Updates {
                            node_id: current.clone(),
                            state: state.clone(),
                        })
                        .await;
                }
            }

            let next = self.resolve_next(&current, state)?;
            logging::log_node_complete(&current, &next);
            match next {
                Next::End => {
                    logging::log_graph_complete(steps);
                    return Ok(());
                }
                Next::Node(id) => current = id,
            }
        }
    }

    /// Runs the graph to completion and returns the final state.
    ///
    /// Errors abort the run: collaborator failures (`ExecutionFailed`), routing outside
    /// a declared mapping (`Routing`), `RecursionLimit`, `Timeout`.
    pub async fn invoke(&self, state: S) -> Result<S, AgentError> {
        let mut state = state;
        if let Err(e) = self.run_loop(&mut state, None).await {
            logging::log_graph_error(&e);
            return Err(e);
        }
        Ok(state)
    }

    /// Streams graph execution, emitting events via a channel-backed Stream.
    ///
    /// The run happens on a spawned task; if it aborts, a final `StreamEvent::Error` is sent.
    pub fn stream(
        &self,
        state: S,
        stream_mode: impl Into<HashSet<StreamMode>>,
    ) -> ReceiverStream<StreamEvent<S>> {
        let (tx, rx) = mpsc::channel(128);
        let graph = self.clone();
        let modes: HashSet<StreamMode> = stream_mode.into();

        tokio::spawn(async move {
            let mut state = state;
            if let Err(e) = graph.run_loop(&mut state, Some((&tx, &modes))).await {
                logging::log_graph_error(&e);
                let _ = tx.send(StreamEvent::Error(e.to_string())).await;
            }
        });

        ReceiverStream::new(rx)
    }
}
