//! State graph builder: nodes, fixed edges and conditional edges.
//!
//! Add nodes with `add_node`, wire them with `add_edge(from, to)` (use `START` and `END`
//! for entry and exit) and `add_conditional_edges(from, router, mapping)`, then
//! `compile` to get a `CompiledStateGraph`. All structural checks happen in `compile`,
//! except duplicate node ids which `add_node` rejects immediately.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use crate::graph::compile_error::{CompilationError, DuplicateNodeError};
use crate::graph::compiled::{CompiledStateGraph, Transition};
use crate::graph::logging;
use crate::graph::node::Node;
use crate::graph::node_middleware::NodeMiddleware;
use crate::graph::router::{ConditionalEdge, Router};
use crate::graph::Next;
use crate::state::GraphState;

/// Sentinel for graph entry: use as `from_id` in `add_edge(START, first_node_id)`.
pub const START: &str = "__start__";

/// Sentinel for graph exit: use as `to_id` in `add_edge(last_node_id, END)` or as a
/// conditional-edge target.
pub const END: &str = "__end__";

/// Step invocations allowed per run before it is aborted.
pub const DEFAULT_RECURSION_LIMIT: usize = 25;

/// State graph: named nodes plus fixed and conditional edges.
///
/// Generic over the state type `S`; nodes return `S::Update` and the compiled graph
/// merges it. Middleware, recursion limit and node timeout are carried into the
/// compiled graph.
pub struct StateGraph<S>
where
    S: GraphState,
{
    nodes: HashMap<String, Arc<dyn Node<S>>>,
    /// Fixed edges (from_id, to_id), in insertion order.
    edges: Vec<(String, String)>,
    conditional_edges: Vec<ConditionalEdge<S>>,
    middleware: Option<Arc<dyn NodeMiddleware<S>>>,
    recursion_limit: usize,
    node_timeout: Option<Duration>,
}

impl<S> Default for StateGraph<S>
where
    S: GraphState,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<S> StateGraph<S>
where
    S: GraphState,
{
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            edges: Vec::new(),
            conditional_edges: Vec::new(),
            middleware: None,
            recursion_limit: DEFAULT_RECURSION_LIMIT,
            node_timeout: None,
        }
    }

    /// Wraps every node invocation of the compiled graph with `middleware`.
    pub fn with_middleware(self, middleware: Arc<dyn NodeMiddleware<S>>) -> Self {
        Self {
            middleware: Some(middleware),
            ..self
        }
    }

    /// Maximum number of step invocations per run (default `DEFAULT_RECURSION_LIMIT`).
    pub fn with_recursion_limit(self, limit: usize) -> Self {
        Self {
            recursion_limit: limit,
            ..self
        }
    }

    /// Per-node time budget. Unset by default: collaborator calls are awaited without bound.
    pub fn with_node_timeout(self, timeout: Duration) -> Self {
        Self {
            node_timeout: Some(timeout),
            ..self
        }
    }

    /// Registers a node under a unique id.
    ///
    /// Fails with `DuplicateNodeError` if the id is taken or is `START`/`END`.
    pub fn add_node(
        &mut self,
        id: impl Into<String>,
        node: Arc<dyn Node<S>>,
    ) -> Result<&mut Self, DuplicateNodeError> {
        let id = id.into();
        if id == START || id == END || self.nodes.contains_key(&id) {
            return Err(DuplicateNodeError(id));
        }
        self.nodes.insert(id, node);
        Ok(self)
    }

    /// Adds an unconditional edge from `from_id` to `to_id`.
    ///
    /// Ids are checked in `compile`.
    pub fn add_edge(&mut self, from_id: impl Into<String>, to_id: impl Into<String>) -> &mut Self {
        self.edges.push((from_id.into(), to_id.into()));
        self
    }

    /// Adds a conditional edge: after `from_id` runs, `router` is applied to the merged
    /// state and its outcome looked up in `mapping` (outcome → node id or `END`).
    ///
    /// An outcome missing from `mapping` fails the run with `RoutingError`.
    pub fn add_conditional_edges<K, V>(
        &mut self,
        from_id: impl Into<String>,
        router: Router<S>,
        mapping: impl IntoIterator<Item = (K, V)>,
    ) -> &mut Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let path_map: BTreeMap<String, Next> = mapping
            .into_iter()
            .map(|(k, v)| (k.into(), Next::from_target(v)))
            .collect();
        self.conditional_edges.push(ConditionalEdge {
            source: from_id.into(),
            router,
            path_map,
        });
        self
    }

    /// Validates the topology and builds the executable graph.
    ///
    /// Checks, in order: every referenced id is registered, exactly one edge leaves
    /// `START`, no node has two outgoing transitions, each routing node's declared
    /// outcomes are mapped, and every node reachable from the entry has a way out.
    pub fn compile(self) -> Result<CompiledStateGraph<S>, CompilationError> {
        for (from, to) in &self.edges {
            if from != START && !self.nodes.contains_key(from) {
                return Err(CompilationError::NodeNotFound(from.clone()));
            }
            if to != END && !self.nodes.contains_key(to) {
                return Err(CompilationError::NodeNotFound(to.clone()));
            }
        }
        for edge in &self.conditional_edges {
            if !self.nodes.contains_key(&edge.source) {
                return Err(CompilationError::NodeNotFound(edge.source.clone()));
            }
            for next in edge.path_map.values() {
                if let Next::Node(id) = next {
                    if !self.nodes.contains_key(id) {
                        return Err(CompilationError::NodeNotFound(id.clone()));
                    }
                }
            }
        }

        let mut entries = self
            .edges
            .iter()
            .filter(|(f, _)| f == START)
            .map(|(_, t)| t.clone());
        let entry = match (entries.next(), entries.next()) {
            (Some(first), None) if first != END => first,
            _ => return Err(CompilationError::MissingStart),
        };

        let mut transitions: HashMap<String, Transition<S>> = HashMap::new();
        for (from, to) in self.edges.into_iter().filter(|(f, _)| f != START) {
            if transitions.contains_key(&from) {
                return Err(CompilationError::ConflictingEdges(from));
            }
            transitions.insert(from, Transition::Fixed(Next::from_target(to)));
        }
        for edge in self.conditional_edges {
            if transitions.contains_key(&edge.source) {
                return Err(CompilationError::ConflictingEdges(edge.source));
            }
            if let Some(options) = self.nodes.get(&edge.source).and_then(|n| n.route_options()) {
                if let Some(route) = options.into_iter().find(|o| !edge.path_map.contains_key(o)) {
                    return Err(CompilationError::UncoveredRoute {
                        node: edge.source,
                        route,
                    });
                }
            }
            transitions.insert(edge.source.clone(), Transition::Conditional(edge));
        }

        let mut visited = HashSet::new();
        let mut queue = VecDeque::from([entry.clone()]);
        while let Some(id) = queue.pop_front() {
            if !visited.insert(id.clone()) {
                continue;
            }
            match transitions.get(&id) {
                None => return Err(CompilationError::DeadEnd(id)),
                Some(Transition::Fixed(Next::Node(to))) => queue.push_back(to.clone()),
                Some(Transition::Fixed(Next::End)) => {}
                Some(Transition::Conditional(edge)) => {
                    for next in edge.path_map.values() {
                        if let Next::Node(to) = next {
                            queue.push_back(to.clone());
                        }
                    }
                }
            }
        }
        for id in self.nodes.keys().filter(|id| !visited.contains(*id)) {
            logging::log_unreachable_node(id);
        }

        Ok(CompiledStateGraph {
            nodes: Arc::new(self.nodes),
            transitions: Arc::new(transitions),
            entry,
            middleware: self.middleware,
            recursion_limit: self.recursion_limit,
            node_timeout: self.node_timeout,
        })
    }
}
