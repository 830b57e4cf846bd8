//! Streamed events of a pipeline run.

use std::sync::Arc;

use sqlchain::{MockLlm, PipelineState, StreamEvent, StreamMode};
use tokio_stream::StreamExt;

use super::common::mock_chain;

/// **Scenario**: Updates mode reports each step in execution order.
#[tokio::test]
async fn updates_follow_execution_order() {
    let llm = Arc::new(MockLlm::scripted(["Which region?", "FINISH"]));
    let compiled = mock_chain(llm).compile_chain().unwrap();

    let events: Vec<_> = compiled
        .stream(
            PipelineState::for_user_message("sales", vec![]),
            [StreamMode::Updates],
        )
        .collect()
        .await;

    let nodes: Vec<&str> = events
        .iter()
        .filter_map(|e| match e {
            StreamEvent::Updates { node_id, .. } => Some(node_id.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(nodes, vec!["data_gather_information", "data_gather_supervisor"]);
}

/// **Scenario**: A failing run ends its stream with an Error event.
#[tokio::test]
async fn routing_failure_ends_stream_with_error() {
    let llm = Arc::new(MockLlm::scripted(["Which region?", "nobody"]));
    let compiled = mock_chain(llm).compile_chain().unwrap();

    let events: Vec<_> = compiled
        .stream(
            PipelineState::for_user_message("sales", vec![]),
            [StreamMode::Values],
        )
        .collect()
        .await;

    assert!(matches!(events.first(), Some(StreamEvent::Values(s)) if s.messages.len() == 2));
    match events.last() {
        Some(StreamEvent::Error(msg)) => assert!(msg.contains("nobody")),
        other => panic!("expected error event, got {:?}", other),
    }
}
