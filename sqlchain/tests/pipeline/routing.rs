//! Supervisor decisions outside their enumeration, and collaborator failures.

use std::sync::Arc;

use sqlchain::{AgentError, LlmResponse, MockLlm, MockToolSource, RunError};

use super::common::{chain_with, happy_path, mock_chain};

/// **Scenario**: A supervisor answer outside its options aborts the run with RoutingError.
///
/// Given: data_gather_supervisor answers "banana"  
/// When: the pipeline is entered  
/// Then: RunError::Execution(Routing) names the supervisor and the value; nothing runs after
#[tokio::test]
async fn unknown_supervisor_answer_is_routing_error() {
    let llm = Arc::new(MockLlm::scripted(["Which region?", "banana", "unused"]));
    let chain = mock_chain(llm.clone());

    let err = chain.enter_chain("sales", vec![]).await.unwrap_err();

    match err {
        RunError::Execution(AgentError::Routing(e)) => {
            assert_eq!(e.node, "data_gather_supervisor");
            assert_eq!(e.value, "banana");
            assert!(e.to_string().contains("banana"));
        }
        other => panic!("expected routing error, got {:?}", other),
    }
    assert_eq!(llm.remaining(), 1);
}

/// **Scenario**: FINISH is not an option of the prompt supervisor.
#[tokio::test]
async fn prompt_supervisor_rejects_finish() {
    let mut answers = happy_path();
    answers.truncate(4);
    answers.push(LlmResponse::text("FINISH"));
    let llm = Arc::new(MockLlm::new(answers));

    let err = mock_chain(llm).enter_chain("sales", vec![]).await.unwrap_err();

    match err {
        RunError::Execution(AgentError::Routing(e)) => {
            assert_eq!(e.node, "data_prompt_supervisor");
            assert_eq!(e.expected, vec!["data_prompt_generator", "sql_generation"]);
        }
        other => panic!("expected routing error, got {:?}", other),
    }
}

/// **Scenario**: A tool failure is an execution failure, not retried.
#[tokio::test]
async fn tool_failure_aborts_run() {
    let llm = Arc::new(MockLlm::new(happy_path()));
    let tools = Arc::new(
        MockToolSource::sql_example()
            .with_failure(sqlchain::tool_source::TOOL_EXECUTE_SQL, "no such table: sales"),
    );
    let err = chain_with(llm, tools).enter_chain("sales", vec![]).await.unwrap_err();
    match err {
        RunError::Execution(AgentError::ExecutionFailed(msg)) => {
            assert!(msg.contains("no such table"), "{}", msg);
        }
        other => panic!("expected execution failure, got {:?}", other),
    }
}

/// **Scenario**: An LLM that stops answering aborts the run with its error.
#[tokio::test]
async fn llm_failure_aborts_run() {
    let llm = Arc::new(MockLlm::scripted(["Which region?"]));
    let err = mock_chain(llm).enter_chain("sales", vec![]).await.unwrap_err();
    assert!(matches!(err, RunError::Execution(AgentError::ExecutionFailed(_))));
}

/// **Scenario**: A supervisor that keeps sending the run back hits the recursion limit.
#[tokio::test]
async fn endless_gather_loop_hits_recursion_limit() {
    let llm = Arc::new(MockLlm::repeating("data_gather_information"));
    let chain = mock_chain(llm).with_recursion_limit(6);
    let err = chain.enter_chain("sales", vec![]).await.unwrap_err();
    assert!(matches!(err, RunError::Execution(AgentError::RecursionLimit(6))));
}
