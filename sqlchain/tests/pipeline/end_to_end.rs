//! Full runs through `enter` / `SqlChain::enter_chain`.

use std::sync::Arc;

use serde_json::json;
use sqlchain::state::{
    DATA_GATHER_INFORMATION, DATA_PROMPT_GENERATOR, SQL_EXECUTION, SQL_GENERATION,
    SQL_RESULT_FORMATTING,
};
use sqlchain::tool_source::TOOL_EXECUTE_SQL;
use sqlchain::{enter, Message, MockLlm, MockToolSource, PipelineState, FINISH};

use super::common::{
    chain_with, happy_path, mock_chain, FORMATTED, GENERATED_PROMPT, RESULTS_JSON, SQL,
};

/// **Scenario**: A complete request drives every step and returns the formatted results.
///
/// Given: scripted answers for all eight steps  
/// When: enter("I need last quarter's sales by region", compiled, [])  
/// Then: the answer is the formatting step's message and every answer was consumed
#[tokio::test]
async fn full_request_returns_formatted_results() {
    let llm = Arc::new(MockLlm::new(happy_path()));
    let tools = Arc::new(MockToolSource::sql_example());
    let compiled = chain_with(llm.clone(), tools.clone()).compile_chain().unwrap();

    let answer = enter("I need last quarter's sales by region", &compiled, vec![])
        .await
        .unwrap();

    assert_eq!(answer, FORMATTED);
    assert_eq!(llm.remaining(), 0);
    let executed: Vec<_> = tools
        .calls()
        .into_iter()
        .filter(|(name, _)| name == TOOL_EXECUTE_SQL)
        .collect();
    assert_eq!(executed, vec![(TOOL_EXECUTE_SQL.to_string(), json!({"query": SQL}))]);
}

/// **Scenario**: The final state carries every derived field and one message per agent step.
#[tokio::test]
async fn final_state_has_every_derived_field() {
    let llm = Arc::new(MockLlm::new(happy_path()));
    let compiled = mock_chain(llm).compile_chain().unwrap();

    let state = compiled
        .invoke(PipelineState::for_user_message("I need last quarter's sales by region", vec![]))
        .await
        .unwrap();

    let speakers: Vec<&str> = state
        .messages
        .iter()
        .map(|m| match m {
            Message::User { .. } => "Human",
            Message::Agent { name, .. } => name.as_str(),
            other => other.content(),
        })
        .collect();
    assert_eq!(
        speakers,
        vec![
            "Human",
            DATA_GATHER_INFORMATION,
            DATA_PROMPT_GENERATOR,
            SQL_GENERATION,
            SQL_EXECUTION,
            SQL_RESULT_FORMATTING,
        ]
    );
    let requirements = state.data_requirements.expect("requirements parsed");
    assert_eq!(requirements.time_frame, "last quarter");
    assert_eq!(state.generated_prompt, GENERATED_PROMPT);
    assert_eq!(state.sql_query, SQL);
    assert_eq!(
        state.execution_results,
        Some(serde_json::from_str::<serde_json::Value>(RESULTS_JSON).unwrap())
    );
    assert_eq!(state.next.as_deref(), Some(FINISH));
}

/// **Scenario**: Incomplete requirements end the run with the clarifying question.
///
/// Given: the gatherer asks a question and the supervisor answers FINISH  
/// When: the pipeline is entered  
/// Then: the question is the answer and no SQL step ran
#[tokio::test]
async fn clarifying_question_is_returned_on_finish() {
    let question = "Could you tell me which regions you are interested in?";
    let llm = Arc::new(MockLlm::scripted([question, "FINISH"]));
    let chain = mock_chain(llm.clone());

    let answer = chain
        .enter_chain("I need data on customer demographics", vec![])
        .await
        .unwrap();

    assert_eq!(answer, question);
    assert_eq!(llm.calls().len(), 2);
}

/// **Scenario**: The supervisor can send the run back to the gatherer before finishing.
#[tokio::test]
async fn gather_loop_runs_gatherer_twice() {
    let llm = Arc::new(MockLlm::scripted([
        "Which time frame?",
        "data_gather_information",
        "And which regions?",
        "FINISH",
    ]));
    let compiled = mock_chain(llm).compile_chain().unwrap();
    let state = compiled
        .invoke(PipelineState::for_user_message("sales", vec![]))
        .await
        .unwrap();
    assert_eq!(state.messages.len(), 3);
    assert_eq!(state.last_message(), Some("And which regions?"));
}

/// **Scenario**: Chat history reaches the prompts of both the gatherer and its supervisor.
#[tokio::test]
async fn chat_history_is_rendered_into_prompts() {
    let llm = Arc::new(MockLlm::scripted(["Which region?", "FINISH"]));
    let compiled = mock_chain(llm.clone()).compile_chain().unwrap();
    let history = vec![
        "User: I need sales data".to_string(),
        "Assistant: For which period?".to_string(),
    ];

    enter("last quarter", &compiled, history).await.unwrap();

    for call in llm.calls() {
        assert!(call.messages[0]
            .content()
            .contains("User: I need sales data\nAssistant: For which period?"));
    }
}

/// **Scenario**: The prompt supervisor can ask for a rewritten prompt before SQL generation.
#[tokio::test]
async fn prompt_supervisor_can_loop_back() {
    let mut answers = happy_path();
    // after the first data_prompt_generator answer, loop once more
    answers.splice(
        4..4,
        [
            sqlchain::LlmResponse::text("data_prompt_generator"),
            sqlchain::LlmResponse::text(GENERATED_PROMPT),
        ],
    );
    let llm = Arc::new(MockLlm::new(answers));
    let compiled = mock_chain(llm.clone()).compile_chain().unwrap();
    let state = compiled
        .invoke(PipelineState::for_user_message("sales by region", vec![]))
        .await
        .unwrap();
    let generator_turns = state
        .messages
        .iter()
        .filter(|m| matches!(m, Message::Agent { name, .. } if name == DATA_PROMPT_GENERATOR))
        .count();
    assert_eq!(generator_turns, 2);
    assert_eq!(state.last_message(), Some(FORMATTED));
    assert_eq!(llm.remaining(), 0);
}
