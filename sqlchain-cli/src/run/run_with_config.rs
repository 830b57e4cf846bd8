//! Run the pipeline with given config; does not read .env.
//!
//! Builds `ChatOpenAI` from the API settings and `SqliteToolSource` over `db_path`, then
//! hands both to [`build_chain`](super::build_chain).

use std::sync::Arc;

use async_openai::config::OpenAIConfig;
use sqlchain::{ChatOpenAI, LlmClient, SqliteToolSource, ToolSource};

use crate::config::RunConfig;

use super::{build_chain, Conversation, Error};

fn collaborators(config: &RunConfig) -> Result<(Arc<dyn LlmClient>, Arc<dyn ToolSource>), Error> {
    let openai_config = OpenAIConfig::new()
        .with_api_base(&config.api_base)
        .with_api_key(config.api_key.clone());
    let mut llm = ChatOpenAI::with_config(openai_config, config.model.clone());
    if let Some(t) = config.temperature {
        llm = llm.with_temperature(t);
    }
    if let Some(tc) = config.tool_choice {
        llm = llm.with_tool_choice(tc);
    }

    let tools = SqliteToolSource::new(&config.db_path)
        .map_err(|e| format!("cannot open database '{}': {}", config.db_path, e))?
        .with_row_limit(config.sql_row_limit);

    let llm: Arc<dyn LlmClient> = Arc::new(llm);
    let tools: Arc<dyn ToolSource> = Arc::new(tools);
    Ok((llm, tools))
}

/// A conversation over the pipeline described by `config`.
pub fn conversation_with_config(config: &RunConfig) -> Result<Conversation, Error> {
    if config.verbose {
        eprintln!("{}", config.summary());
    }
    let (llm, tools) = collaborators(config)?;
    Conversation::new(&build_chain(llm, tools, config))
}

/// Run the pipeline once with given config; returns the answer.
pub async fn run_with_config(
    config: &RunConfig,
    user_message: &str,
    history: Vec<String>,
) -> Result<String, Error> {
    let mut conversation = conversation_with_config(config)?.with_history(history);
    conversation.send(user_message).await
}
