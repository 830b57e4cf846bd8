//! Run entry points: run with default config, run_with_config, or run_with_options.
//!
//! Re-exports [`run`], [`run_with_config`], [`run_with_options`], [`Conversation`] and [`Error`].

pub use crate::config::Error;

mod common;
mod run_with_config;

use crate::config::{RunConfig, RunOptions};

pub use common::Conversation;
pub(crate) use common::build_chain;
pub use run_with_config::{conversation_with_config, run_with_config};

/// Run the pipeline with config from `.env` / env, returns the answer.
pub async fn run(user_message: &str, history: Vec<String>) -> Result<String, Error> {
    dotenv::dotenv().ok();
    let config = RunConfig::from_env()?;
    run_with_config(&config, user_message, history).await
}

/// Run the pipeline with config from env and optional overrides (e.g. from CLI).
///
/// Loads `.env`, builds `RunConfig` from env, applies `options`, then runs.
pub async fn run_with_options(
    user_message: &str,
    history: Vec<String>,
    options: &RunOptions,
) -> Result<String, Error> {
    dotenv::dotenv().ok();
    let mut config = RunConfig::from_env()?;
    config.apply_options(options);
    run_with_config(&config, user_message, history).await
}
