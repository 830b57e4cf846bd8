//! Shared run logic: build the pipeline from collaborators and keep a conversation.
//!
//! Used by [`run_with_config`](super::run_with_config) and by tests that inject
//! `MockLlm` / `MockToolSource`.

use std::sync::Arc;

use sqlchain::{enter, CompiledStateGraph, LlmClient, PipelineState, SqlChain, ToolSource};

use crate::config::RunConfig;
use crate::middleware::WithNodeLogging;

use super::Error;

/// Builds the pipeline with the run limits of `config`; node logging when verbose.
pub(crate) fn build_chain(
    llm: Arc<dyn LlmClient>,
    tools: Arc<dyn ToolSource>,
    config: &RunConfig,
) -> SqlChain {
    let mut chain = SqlChain::new(llm, tools).with_recursion_limit(config.recursion_limit);
    if let Some(timeout) = config.node_timeout {
        chain = chain.with_node_timeout(timeout);
    }
    if config.verbose {
        chain = chain.with_node_logging();
    }
    chain
}

/// A multi-turn chat over one compiled pipeline.
///
/// Each `send` runs the pipeline with the turns so far as chat history, then records
/// `User: …` and `Assistant: …` lines for the next turn.
pub struct Conversation {
    compiled: CompiledStateGraph<PipelineState>,
    history: Vec<String>,
}

impl Conversation {
    pub fn new(chain: &SqlChain) -> Result<Self, Error> {
        Ok(Self {
            compiled: chain.compile_chain()?,
            history: Vec::new(),
        })
    }

    /// Starts from earlier turns (e.g. `--history` lines).
    pub fn with_history(mut self, history: Vec<String>) -> Self {
        self.history = history;
        self
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Runs one turn and returns the answer. A failed turn leaves the history untouched.
    pub async fn send(&mut self, message: &str) -> Result<String, Error> {
        let answer = enter(message, &self.compiled, self.history.clone()).await?;
        self.history.push(format!("User: {}", message));
        self.history.push(format!("Assistant: {}", answer));
        Ok(answer)
    }
}
