//! The pipeline over a real SQLite database (feature `sqlite`).

use std::sync::Arc;

use serde_json::json;
use sqlchain::tool_source::{TOOL_EXECUTE_SQL, TOOL_FETCH_METADATA};
use sqlchain::{LlmResponse, MockLlm, PipelineState, SqliteToolSource};

use super::common::{chain_with, GENERATED_PROMPT, REQUIREMENTS_JSON};

fn sales_db(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let path = dir.path().join("sales.db");
    let conn = rusqlite::Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE sales (id INTEGER PRIMARY KEY, region TEXT, amount INTEGER);
         INSERT INTO sales (region, amount) VALUES ('EMEA', 100), ('EMEA', 20), ('APAC', 7);",
    )
    .unwrap();
    path
}

/// **Scenario**: Execution results in the state are the rows SQLite returned.
///
/// Given: a database with three sales rows and scripted answers  
/// When: the pipeline runs end to end  
/// Then: execution_results holds the tool's JSON, and the formatter saw it in its prompt
#[tokio::test]
async fn execution_results_come_from_sqlite() {
    let dir = tempfile::tempdir().unwrap();
    let tools = Arc::new(SqliteToolSource::new(sales_db(&dir)).unwrap());
    let sql = "SELECT region, SUM(amount) AS total FROM sales GROUP BY region ORDER BY region";

    let llm = Arc::new(MockLlm::new(vec![
        LlmResponse::tool_call(TOOL_FETCH_METADATA, json!({"table_name": "sales"})),
        LlmResponse::text(REQUIREMENTS_JSON),
        LlmResponse::text("data_prompt_generator"),
        LlmResponse::text(GENERATED_PROMPT),
        LlmResponse::text("sql_generation"),
        LlmResponse::text(sql),
        LlmResponse::tool_call(TOOL_EXECUTE_SQL, json!({ "query": sql })),
        // the execution agent echoes what the tool returned
        LlmResponse::text(
            json!({
                "columns": ["region", "total"],
                "rows": [{"region": "APAC", "total": 7}, {"region": "EMEA", "total": 120}],
                "truncated": false
            })
            .to_string(),
        ),
        LlmResponse::text("APAC 7, EMEA 120"),
        LlmResponse::text("FINISH"),
    ]));
    let compiled = chain_with(llm.clone(), tools).compile_chain().unwrap();

    let state = compiled
        .invoke(PipelineState::for_user_message("sales by region", vec![]))
        .await
        .unwrap();

    assert_eq!(state.last_message(), Some("APAC 7, EMEA 120"));
    assert_eq!(state.execution_results.unwrap()["rows"][1]["total"], 120);

    let calls = llm.calls();
    // the observation the execution agent received came from SQLite
    let observation = calls[7].messages.last().unwrap().content().to_string();
    assert!(observation.contains(r#""region":"EMEA","total":120"#), "{}", observation);
    // the gatherer received metadata for the sales table
    let metadata = calls[1].messages.last().unwrap().content().to_string();
    assert!(metadata.contains(r#""table_name":"sales""#), "{}", metadata);
}
