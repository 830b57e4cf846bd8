//! Unit tests for [`LoggingMiddleware`](crate::middleware::LoggingMiddleware) and
//! [`WithNodeLogging`](crate::middleware::WithNodeLogging).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use sqlchain::graph::NodeFuture;
use sqlchain::{
    enter, AgentError, MockLlm, MockToolSource, NodeMiddleware, PipelineState, PipelineUpdate,
    SqlChain,
};

use crate::middleware::{LoggingMiddleware, WithNodeLogging};

/// **Scenario**: around_run calls inner with the given state and returns inner's result.
#[tokio::test]
async fn logging_middleware_calls_inner_and_returns_result() {
    let called = Arc::new(AtomicBool::new(false));
    let called_clone = called.clone();
    let inner: Box<dyn FnOnce(PipelineState) -> NodeFuture<PipelineUpdate> + Send> =
        Box::new(move |s: PipelineState| -> NodeFuture<PipelineUpdate> {
            called_clone.store(true, Ordering::SeqCst);
            Box::pin(async move {
                Ok(PipelineUpdate::message("echo", s.last_message().unwrap_or_default()))
            })
        });
    let state = PipelineState::for_user_message("hi", vec![]);
    let update = LoggingMiddleware
        .around_run("echo", state, inner)
        .await
        .expect("inner succeeds");
    assert!(called.load(Ordering::SeqCst));
    assert_eq!(update.messages[0].content(), "hi");
}

/// **Scenario**: When inner returns Err, around_run propagates the error.
#[tokio::test]
async fn logging_middleware_propagates_error() {
    let inner: Box<dyn FnOnce(PipelineState) -> NodeFuture<PipelineUpdate> + Send> =
        Box::new(|_s: PipelineState| -> NodeFuture<PipelineUpdate> {
            Box::pin(async { Err(AgentError::ExecutionFailed("fail".into())) })
        });
    let result = LoggingMiddleware
        .around_run("broken", PipelineState::default(), inner)
        .await;
    assert!(matches!(result, Err(AgentError::ExecutionFailed(ref m)) if m == "fail"));
}

#[test]
fn exit_line_reports_route_or_message_count() {
    let routed = Ok(PipelineUpdate::route("FINISH"));
    assert_eq!(
        LoggingMiddleware::describe_exit("data_gather_supervisor", &routed),
        "[node] exit node=data_gather_supervisor next=FINISH"
    );
    let agent = Ok(PipelineUpdate::message("sql_generation", "SELECT 1"));
    assert_eq!(
        LoggingMiddleware::describe_exit("sql_generation", &agent),
        "[node] exit node=sql_generation messages+=1"
    );
}

/// **Scenario**: with_node_logging keeps the pipeline runnable end to end.
#[tokio::test]
async fn with_node_logging_attaches_middleware_and_runs() {
    let llm = Arc::new(MockLlm::scripted(["Which region?", "FINISH"]));
    let chain = SqlChain::new(llm, Arc::new(MockToolSource::sql_example())).with_node_logging();
    let compiled = chain.compile_chain().expect("compiles");
    let answer = enter("sales please", &compiled, vec![]).await.unwrap();
    assert_eq!(answer, "Which region?");
}
