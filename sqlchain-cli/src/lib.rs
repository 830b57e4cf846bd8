//! sqlchain-cli library: configuration and run logic for the data-requirements → SQL pipeline.
//!
//! Reads OpenAI and database settings from .env, builds `ChatOpenAI` and
//! `SqliteToolSource`, compiles the pipeline and returns the answer.
//!
//! ## Usage
//!
//! ```rust,no_run
//! # async fn demo() -> Result<(), sqlchain_cli::Error> {
//! let answer = sqlchain_cli::run("I need last quarter's sales by region", vec![]).await?;
//! println!("{}", answer);
//! # Ok(())
//! # }
//! ```

mod config;
mod middleware;
mod run;

pub use config::{Error, RunConfig, RunOptions};
pub use middleware::{LoggingMiddleware, WithNodeLogging};
pub use run::{conversation_with_config, run, run_with_config, run_with_options, Conversation};

#[cfg(test)]
mod tests;
