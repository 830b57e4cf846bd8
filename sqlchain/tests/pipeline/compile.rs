//! Compile-time validation: the fixed pipeline and malformed custom graphs.

use std::sync::Arc;

use async_trait::async_trait;
use sqlchain::state::{DATA_GATHER_INFORMATION, DATA_GATHER_SUPERVISOR, FINISH};
use sqlchain::{
    route_by_next, AgentError, CompilationError, DuplicateNodeError, MockLlm, Node,
    PipelineState, PipelineUpdate, StateGraph, TeamRoster, END, START,
};

use super::common::mock_chain;

struct Say(&'static str);

#[async_trait]
impl Node<PipelineState> for Say {
    fn id(&self) -> &str {
        self.0
    }

    async fn run(&self, _state: &PipelineState) -> Result<PipelineUpdate, AgentError> {
        Ok(PipelineUpdate::message(self.0, "ok"))
    }
}

struct Decide(Vec<String>);

#[async_trait]
impl Node<PipelineState> for Decide {
    fn id(&self) -> &str {
        "decide"
    }

    async fn run(&self, _state: &PipelineState) -> Result<PipelineUpdate, AgentError> {
        Ok(PipelineUpdate::route(FINISH))
    }

    fn route_options(&self) -> Option<Vec<String>> {
        Some(self.0.clone())
    }
}

/// **Scenario**: Compiling the same pipeline twice gives graphs with identical entry and limits.
#[test]
fn compile_is_repeatable() {
    let chain = mock_chain(Arc::new(MockLlm::repeating("FINISH")));
    let a = chain.compile_chain().unwrap();
    let b = chain.compile_chain().unwrap();
    assert_eq!(a.entry(), b.entry());
    assert_eq!(a.entry(), DATA_GATHER_INFORMATION);
    assert_eq!(a.recursion_limit(), b.recursion_limit());
}

#[test]
fn build_graph_rejects_duplicate_registration() {
    let chain = mock_chain(Arc::new(MockLlm::repeating("FINISH")));
    let mut graph = chain.build_graph().unwrap();
    let err = graph
        .add_node(DATA_GATHER_SUPERVISOR, Arc::new(Say("again")))
        .err()
        .unwrap();
    assert_eq!(err, DuplicateNodeError(DATA_GATHER_SUPERVISOR.to_string()));
}

/// **Scenario**: Reserved ids cannot be registered as nodes.
#[test]
fn start_and_end_are_reserved() {
    let mut graph = StateGraph::<PipelineState>::new();
    assert!(graph.add_node(START, Arc::new(Say("a"))).is_err());
    assert!(graph.add_node(END, Arc::new(Say("a"))).is_err());
}

#[test]
fn edge_to_unknown_node_fails() {
    let mut graph = StateGraph::<PipelineState>::new();
    graph.add_node("a", Arc::new(Say("a"))).unwrap();
    graph.add_edge(START, "a").add_edge("a", "ghost");
    assert_eq!(
        graph.compile().err(),
        Some(CompilationError::NodeNotFound("ghost".into()))
    );
}

#[test]
fn missing_or_double_start_fails() {
    let mut graph = StateGraph::<PipelineState>::new();
    graph.add_node("a", Arc::new(Say("a"))).unwrap();
    graph.add_edge("a", END);
    assert_eq!(graph.compile().err(), Some(CompilationError::MissingStart));

    let mut graph = StateGraph::<PipelineState>::new();
    graph.add_node("a", Arc::new(Say("a"))).unwrap();
    graph.add_node("b", Arc::new(Say("b"))).unwrap();
    graph
        .add_edge(START, "a")
        .add_edge(START, "b")
        .add_edge("a", END)
        .add_edge("b", END);
    assert_eq!(graph.compile().err(), Some(CompilationError::MissingStart));
}

/// **Scenario**: A node with a fixed and a conditional edge is rejected.
#[test]
fn two_outgoing_transitions_fail() {
    let mut graph = StateGraph::<PipelineState>::new();
    graph.add_node("decide", Arc::new(Decide(vec![FINISH.into()]))).unwrap();
    graph
        .add_edge(START, "decide")
        .add_edge("decide", END)
        .add_conditional_edges("decide", route_by_next(), [(FINISH, END)]);
    assert_eq!(
        graph.compile().err(),
        Some(CompilationError::ConflictingEdges("decide".into()))
    );
}

/// **Scenario**: A reachable node without any outgoing transition is a dead end.
#[test]
fn reachable_node_without_exit_fails() {
    let mut graph = StateGraph::<PipelineState>::new();
    graph.add_node("a", Arc::new(Say("a"))).unwrap();
    graph.add_node("b", Arc::new(Say("b"))).unwrap();
    graph.add_edge(START, "a").add_edge("a", "b");
    assert_eq!(graph.compile().err(), Some(CompilationError::DeadEnd("b".into())));
}

/// **Scenario**: A supervisor option missing from its mapping fails at compile time.
#[test]
fn uncovered_supervisor_option_fails() {
    let mut graph = StateGraph::<PipelineState>::new();
    graph
        .add_node(
            "decide",
            Arc::new(Decide(vec!["a".into(), FINISH.into()])),
        )
        .unwrap();
    graph.add_node("a", Arc::new(Say("a"))).unwrap();
    graph
        .add_edge(START, "decide")
        .add_edge("a", END)
        .add_conditional_edges("decide", route_by_next(), [(FINISH, END)]);
    assert_eq!(
        graph.compile().err(),
        Some(CompilationError::UncoveredRoute {
            node: "decide".into(),
            route: "a".into(),
        })
    );
}

#[test]
fn default_roster_is_exposed() {
    let chain = mock_chain(Arc::new(MockLlm::repeating("FINISH")));
    assert_eq!(chain.roster(), &TeamRoster::default());
    assert_eq!(chain.roster().team_members().len(), 5);
}
