//! Shared fixtures: scripted answers for every step of a full run.

use std::sync::Arc;

use serde_json::json;
use sqlchain::tool_source::{TOOL_EXECUTE_SQL, TOOL_FETCH_METADATA};
use sqlchain::{LlmResponse, MockLlm, MockToolSource, SqlChain, ToolSource};

pub const REQUIREMENTS_JSON: &str = r#"{"purpose_of_data": "quarterly review", "specific_data_needs": "sales totals by region", "time_frame": "last quarter", "filters_criteria": "none"}"#;

pub const GENERATED_PROMPT: &str = "Total sales amount per region for last quarter.";

pub const SQL: &str = "SELECT region, SUM(amount) AS total FROM sales GROUP BY region";

pub const RESULTS_JSON: &str =
    r#"{"columns":["region","total"],"rows":[{"region":"EMEA","total":120}],"truncated":false}"#;

pub const FORMATTED: &str = "Sales by region last quarter: EMEA 120.";

/// Answers for one run that goes straight through every step, in call order.
pub fn happy_path() -> Vec<LlmResponse> {
    vec![
        // data_gather_information looks at the schema, then answers
        LlmResponse::tool_call(TOOL_FETCH_METADATA, json!({})),
        LlmResponse::text(REQUIREMENTS_JSON),
        // data_gather_supervisor
        LlmResponse::text("data_prompt_generator"),
        // data_prompt_generator
        LlmResponse::text(GENERATED_PROMPT),
        // data_prompt_supervisor answers through the route function
        LlmResponse::tool_call("route", json!({"next": "sql_generation"})),
        // sql_generation
        LlmResponse::text(format!("```sql\n{}\n```", SQL)),
        // sql_execution runs the query, then reports the result
        LlmResponse::tool_call(TOOL_EXECUTE_SQL, json!({"query": SQL})),
        LlmResponse::text(RESULTS_JSON),
        // sql_result_formatting
        LlmResponse::text(FORMATTED),
        // sql_supervisor
        LlmResponse::text("FINISH"),
    ]
}

pub fn chain_with(llm: Arc<MockLlm>, tools: Arc<dyn ToolSource>) -> SqlChain {
    SqlChain::new(llm, tools)
}

pub fn mock_chain(llm: Arc<MockLlm>) -> SqlChain {
    chain_with(llm, Arc::new(MockToolSource::sql_example()))
}
